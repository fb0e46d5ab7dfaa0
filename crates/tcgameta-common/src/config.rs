//! Run configuration for the metadata pipeline.
//!
//! Reads `tcgameta.toml` from the current directory, or the file named by
//! the `TCGAMETA_CONFIG` env var. Files ending in `.yaml`/`.yml` are parsed
//! as YAML. Every field has a default matching the layout of a GDC cart
//! download, so an absent default file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TcgaMetaError};

pub const CONFIG_ENV_VAR: &str = "TCGAMETA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "tcgameta.toml";

/// Complete pipeline run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub join: JoinConfig,
    #[serde(default)]
    pub tissue: TissueConfig,
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// GDC sample sheet (one row per file/sample).
    #[serde(default = "default_file_sheet")]
    pub file_sheet: PathBuf,
    /// GDC clinical export (`clinical.tsv` from a cart download).
    #[serde(default = "default_clinical_sheet")]
    pub clinical_sheet: PathBuf,
    #[serde(default = "default_input_delimiter")]
    pub delimiter: String,
}

fn default_file_sheet() -> PathBuf { PathBuf::from("./tcga_data/gdc_sample_sheet.2024-06-11.tsv") }
fn default_clinical_sheet() -> PathBuf { PathBuf::from("./tcga_data/clinical.cart.2024-06-11/clinical.tsv") }
fn default_input_delimiter() -> String { "\t".to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file_sheet: default_file_sheet(),
            clinical_sheet: default_clinical_sheet(),
            delimiter: default_input_delimiter(),
        }
    }
}

impl InputConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        single_byte(&self.delimiter, "input.delimiter")
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_output_delimiter")]
    pub delimiter: String,
    /// Write the row index as the first (unnamed) column.
    #[serde(default = "bool_true")]
    pub write_index: bool,
}

fn default_output_path() -> PathBuf { PathBuf::from("./file_clinical_sheet.csv") }
fn default_output_delimiter() -> String { ",".to_string() }
fn bool_true() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            delimiter: default_output_delimiter(),
            write_index: bool_true(),
        }
    }
}

impl OutputConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        single_byte(&self.delimiter, "output.delimiter")
    }
}

// ── Join ──────────────────────────────────────────────────────────────────────

/// Suffixes appended to column names present on both sides of the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfig {
    #[serde(default = "default_left_suffix")]
    pub left_suffix: String,
    #[serde(default = "default_right_suffix")]
    pub right_suffix: String,
}

fn default_left_suffix() -> String { "_x".to_string() }
fn default_right_suffix() -> String { "_y".to_string() }

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            left_suffix: default_left_suffix(),
            right_suffix: default_right_suffix(),
        }
    }
}

// ── Tissue ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueConfig {
    /// `sample_type` value whose grades are forced to zero.
    #[serde(default = "default_normal_label")]
    pub normal_label: String,
}

fn default_normal_label() -> String { "Solid Tissue Normal".to_string() }

impl Default for TissueConfig {
    fn default() -> Self {
        Self { normal_label: default_normal_label() }
    }
}

fn single_byte(raw: &str, field: &str) -> Result<u8> {
    match raw.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(TcgaMetaError::Config(format!(
            "{field} must be a single ASCII character, got {raw:?}"
        ))),
    }
}

impl PipelineConfig {
    /// Load configuration.
    /// Checks TCGAMETA_CONFIG env var first, then `tcgameta.toml` in the
    /// current directory. Falls back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TcgaMetaError::Config(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        debug!("Loading configuration from {:?}", path);

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)
            .map_err(|e| TcgaMetaError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(content)
            .map_err(|e| TcgaMetaError::Config(format!("Invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot: delimiters and join suffixes.
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;
        self.output.delimiter_byte()?;
        if self.join.left_suffix == self.join.right_suffix {
            return Err(TcgaMetaError::Config(format!(
                "join suffixes must differ, both are {:?}",
                self.join.left_suffix
            )));
        }
        Ok(())
    }
}
