//! tcgameta-pipeline — GDC sample/clinical metadata cleaning.
//!
//! Joins a GDC sample sheet to the clinical export of the same cart,
//! turns Gleason pattern labels into numeric grades, drops samples without
//! any grade, zeroes normal-tissue grades, adds `gleason_score` and writes
//! one cleaned CSV.
//!
//! ```rust,no_run
//! use tcgameta_common::PipelineConfig;
//! use tcgameta_pipeline::run_pipeline;
//!
//! fn main() -> tcgameta_common::Result<()> {
//!     let report = run_pipeline(&PipelineConfig::load()?)?;
//!     println!("{} rows written to {}", report.stats.output_rows, report.output.display());
//!     Ok(())
//! }
//! ```

pub mod table;
pub mod loader;
pub mod headers;
pub mod join;
pub mod recode;
pub mod gleason;
pub mod dedup;
pub mod export;
pub mod pipeline;

pub use pipeline::{run_pipeline, transform, PipelineReport, TransformStats};
pub use table::{Cell, Row, Table};

/// Table names used in error messages.
pub const SAMPLE_SHEET: &str = "sample sheet";
pub const CLINICAL_SHEET: &str = "clinical sheet";

pub const CASE_ID: &str = "case_id";
pub const CASE_SUBMITTER_ID: &str = "case_submitter_id";
pub const SAMPLE_TYPE: &str = "sample_type";
pub const PRIMARY_GRADE: &str = "primary_gleason_grade";
pub const SECONDARY_GRADE: &str = "secondary_gleason_grade";
pub const GLEASON_SCORE: &str = "gleason_score";

/// Clinical columns kept for the join, in output order.
pub const CLINICAL_COLUMNS: [&str; 4] = [CASE_ID, CASE_SUBMITTER_ID, PRIMARY_GRADE, SECONDARY_GRADE];
