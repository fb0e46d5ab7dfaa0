//! End-to-end metadata pipeline.
//!
//! Orchestrates one run:
//!   1. Load the sample sheet and the clinical sheet
//!   2. Normalise sample-sheet headers
//!   3. Project the clinical sheet onto the Gleason columns
//!   4. Left-join samples to clinical rows
//!   5. Recode `'--` / `Pattern N` literals everywhere
//!   6. Drop rows with no grade at all
//!   7. Zero the grades of normal-tissue samples
//!   8. Derive `gleason_score`
//!   9. Drop exact duplicate rows
//!   10. Export
//!
//! Any failing step aborts the run; nothing is retried.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tcgameta_common::{PipelineConfig, Result};
use tracing::{field, info, instrument, Span};
use uuid::Uuid;

use crate::dedup::deduplicate;
use crate::export::write_delimited;
use crate::gleason::{derive_score, filter_incomplete, normalise_tissue};
use crate::headers::normalise_headers;
use crate::join::{join_sample_clinical, select_clinical_columns};
use crate::loader::read_delimited;
use crate::recode::recode_values;
use crate::table::Table;
use crate::{CLINICAL_SHEET, SAMPLE_SHEET};

// ── Run summary ───────────────────────────────────────────────────────────────

/// Row counts collected while transforming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub sample_rows: usize,
    pub clinical_rows: usize,
    pub joined_rows: usize,
    pub recoded_cells: usize,
    pub incomplete_rows_dropped: usize,
    pub normal_tissue_rows: usize,
    pub non_numeric_grades: usize,
    pub duplicate_rows_dropped: usize,
    pub output_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub file_sheet: PathBuf,
    pub clinical_sheet: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub stats: TransformStats,
    pub duration_ms: u64,
}

// ── Transform ─────────────────────────────────────────────────────────────────

/// Steps 2–9 over already-loaded tables.
pub fn transform(mut sample: Table, clinical: &Table, config: &PipelineConfig) -> Result<(Table, TransformStats)> {
    let mut stats = TransformStats {
        sample_rows: sample.len(),
        clinical_rows: clinical.len(),
        ..Default::default()
    };

    normalise_headers(&mut sample);

    let clinical = select_clinical_columns(clinical)?;

    let mut table = join_sample_clinical(&sample, &clinical, &config.join)?;
    stats.joined_rows = table.len();
    info!(
        "Joined {} sample rows with {} clinical rows → {} rows",
        stats.sample_rows, stats.clinical_rows, stats.joined_rows
    );

    stats.recoded_cells = recode_values(&mut table);

    stats.incomplete_rows_dropped = filter_incomplete(&mut table)?;
    info!(
        "Dropped {} rows without a Gleason grade, {} remain",
        stats.incomplete_rows_dropped,
        table.len()
    );

    stats.normal_tissue_rows = normalise_tissue(&mut table, &config.tissue.normal_label)?;

    stats.non_numeric_grades = derive_score(&mut table)?;

    stats.duplicate_rows_dropped = deduplicate(&mut table);
    stats.output_rows = table.len();
    info!(
        "Removed {} duplicate rows, {} rows in output",
        stats.duplicate_rows_dropped, stats.output_rows
    );

    Ok((table, stats))
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

/// Runs the full pipeline described by `config` and writes the output file.
#[instrument(
    skip_all,
    fields(
        run_id = field::Empty,
        file_sheet = %config.input.file_sheet.display(),
        clinical_sheet = %config.input.clinical_sheet.display(),
    )
)]
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let t0 = Instant::now();
    Span::current().record("run_id", field::display(run_id));

    let input_delimiter = config.input.delimiter_byte()?;
    let output_delimiter = config.output.delimiter_byte()?;

    info!("Starting metadata pipeline");

    let sample = read_delimited(&config.input.file_sheet, input_delimiter, SAMPLE_SHEET)?;
    let clinical = read_delimited(&config.input.clinical_sheet, input_delimiter, CLINICAL_SHEET)?;

    let (table, stats) = transform(sample, &clinical, config)?;

    write_delimited(&table, &config.output.path, output_delimiter, config.output.write_index)?;

    let duration_ms = t0.elapsed().as_millis() as u64;
    info!(
        "Wrote {} rows to {} in {}ms",
        stats.output_rows,
        config.output.path.display(),
        duration_ms
    );

    Ok(PipelineReport {
        run_id,
        started_at,
        file_sheet: config.input.file_sheet.clone(),
        clinical_sheet: config.input.clinical_sheet.clone(),
        output: config.output.path.clone(),
        stats,
        duration_ms,
    })
}
