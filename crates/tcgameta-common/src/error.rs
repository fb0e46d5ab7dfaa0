use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TcgaMetaError {
    #[error("Failed to read {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Failed to write {}: {reason}", .path.display())]
    FileWrite { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TcgaMetaError {
    pub fn file_read(path: &Path, reason: impl ToString) -> Self {
        TcgaMetaError::FileRead {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_column(table: &str, column: &str) -> Self {
        TcgaMetaError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn file_write(path: &Path, reason: impl ToString) -> Self {
        TcgaMetaError::FileWrite {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TcgaMetaError>;
