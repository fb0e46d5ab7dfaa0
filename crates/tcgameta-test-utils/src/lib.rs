//! Shared fixtures for tcgameta tests: temp workspaces and GDC-shaped
//! sample/clinical sheets.

use std::path::{Path, PathBuf};

use tcgameta_common::PipelineConfig;
use tempfile::TempDir;

pub const SAMPLE_SHEET_HEADER: &str =
    "File ID\tFile Name\tData Category\tData Type\tProject ID\tCase ID\tSample ID\tSample Type";

pub const CLINICAL_SHEET_HEADER: &str =
    "case_id\tcase_submitter_id\tproject_id\tprimary_gleason_grade\tsecondary_gleason_grade\ttreatment_type";

/// A temp directory holding one run's inputs and output.
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    /// Config reading `sample_sheet.tsv` / `clinical.tsv` and writing
    /// `file_clinical_sheet.csv` inside this workspace.
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.input.file_sheet = self.path("sample_sheet.tsv");
        config.input.clinical_sheet = self.path("clinical.tsv");
        config.output.path = self.path("file_clinical_sheet.csv");
        config
    }

    /// Write both sheets where `config()` expects them.
    pub fn write_sheets(&self, sample: &SampleSheet, clinical: &ClinicalSheet) -> PipelineConfig {
        self.write("sample_sheet.tsv", &sample.to_tsv());
        self.write("clinical.tsv", &clinical.to_tsv());
        self.config()
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.path("file_clinical_sheet.csv")).expect("read output")
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// GDC sample sheet builder; one file per sample.
#[derive(Debug, Default, Clone)]
pub struct SampleSheet {
    rows: Vec<(String, String)>,
}

impl SampleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(mut self, case_id: &str, sample_type: &str) -> Self {
        self.rows.push((case_id.to_string(), sample_type.to_string()));
        self
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::from(SAMPLE_SHEET_HEADER);
        out.push('\n');
        for (n, (case_id, sample_type)) in self.rows.iter().enumerate() {
            let vial = if sample_type.contains("Normal") { "11A" } else { "01A" };
            out.push_str(&format!(
                "file-{n}\tfile-{n}.tsv\tTranscriptome Profiling\tGene Expression Quantification\tTCGA-PRAD\t{case_id}\t{case_id}-{vial}\t{sample_type}\n"
            ));
        }
        out
    }
}

/// GDC clinical export builder.
#[derive(Debug, Default, Clone)]
pub struct ClinicalSheet {
    rows: Vec<[String; 4]>,
}

impl ClinicalSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One clinical row for `case_submitter_id`; the case UUID is derived
    /// from it. Repeat the call for the same case to model one row per
    /// treatment.
    pub fn case(self, case_submitter_id: &str, primary: &str, secondary: &str) -> Self {
        self.treatment(case_submitter_id, primary, secondary, "Radiation Therapy, NOS")
    }

    pub fn treatment(mut self, case_submitter_id: &str, primary: &str, secondary: &str, treatment: &str) -> Self {
        self.rows.push([
            case_submitter_id.to_string(),
            primary.to_string(),
            secondary.to_string(),
            treatment.to_string(),
        ]);
        self
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::from(CLINICAL_SHEET_HEADER);
        out.push('\n');
        for [case, primary, secondary, treatment] in &self.rows {
            out.push_str(&format!(
                "uuid-{case}\t{case}\tTCGA-PRAD\t{primary}\t{secondary}\t{treatment}\n"
            ));
        }
        out
    }
}

/// Parse a written CSV into header + records, all as strings.
pub fn read_records(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open output");
    let header = reader
        .headers()
        .expect("read header")
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.expect("read record").iter().map(str::to_string).collect())
        .collect();
    (header, records)
}
