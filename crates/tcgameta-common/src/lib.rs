//! tcgameta-common — Shared error taxonomy and run configuration used across all tcgameta crates.

pub mod error;
pub mod config;

// Re-export commonly used types
pub use error::{Result, TcgaMetaError};
pub use config::{InputConfig, JoinConfig, OutputConfig, PipelineConfig, TissueConfig};
