//! Command-line arguments and config resolution.
//! Flags override the config file, which overrides the built-in defaults.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tcgameta_common::PipelineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "tcgameta",
    version,
    about = "Join a GDC sample sheet with its clinical export and derive Gleason scores"
)]
pub struct Cli {
    /// Config file (TOML, or YAML by extension). Defaults to $TCGAMETA_CONFIG, then ./tcgameta.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GDC sample sheet (tab-separated)
    #[arg(long)]
    pub file_sheet: Option<PathBuf>,

    /// GDC clinical.tsv (tab-separated)
    #[arg(long)]
    pub clinical_sheet: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Load the config named by `--config` (or the default lookup) and
    /// apply path flags on top.
    pub fn resolve_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::load().context("Failed to load configuration")?,
        };

        if let Some(path) = &self.file_sheet {
            config.input.file_sheet = path.clone();
        }
        if let Some(path) = &self.clinical_sheet {
            config.input.clinical_sheet = path.clone();
        }
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcgameta_test_utils::TempWorkspace;

    #[test]
    fn test_flags_override_config_file() {
        let ws = TempWorkspace::new();
        let config_path = ws.write(
            "run.toml",
            "[input]\nfile_sheet = \"from_file.tsv\"\nclinical_sheet = \"clinical_from_file.tsv\"\n",
        );

        let cli = Cli::try_parse_from([
            "tcgameta",
            "--config",
            config_path.to_str().unwrap(),
            "--file-sheet",
            "from_flag.tsv",
            "-o",
            "out.csv",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.input.file_sheet, PathBuf::from("from_flag.tsv"));
        assert_eq!(config.input.clinical_sheet, PathBuf::from("clinical_from_file.tsv"));
        assert_eq!(config.output.path, PathBuf::from("out.csv"));
        assert!(!cli.json);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let ws = TempWorkspace::new();
        let missing = ws.path("nope.toml");
        let cli = Cli::try_parse_from(["tcgameta", "--config", missing.to_str().unwrap()]).unwrap();
        let err = cli.resolve_config().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::try_parse_from(["tcgameta", "--json"]).unwrap();
        assert!(cli.json);
        assert!(cli.config.is_none());
    }
}
