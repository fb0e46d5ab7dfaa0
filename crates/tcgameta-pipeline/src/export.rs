//! Delimited writer for the cleaned table.

use std::path::Path;

use tcgameta_common::{Result, TcgaMetaError};
use tracing::debug;

use crate::table::Table;

/// Write `table` to `path`. With `write_index`, the first column holds each
/// row's index label under an empty header. Nulls are written as empty
/// fields; fields are quoted only when needed.
pub fn write_delimited(table: &Table, path: &Path, delimiter: u8, write_index: bool) -> Result<()> {
    debug!("Writing {} rows to {:?}", table.len(), path);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| TcgaMetaError::file_write(path, e))?;

    let mut header: Vec<&str> = Vec::with_capacity(table.columns().len() + 1);
    if write_index {
        header.push("");
    }
    header.extend(table.columns().iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| TcgaMetaError::file_write(path, e))?;

    for row in table.rows() {
        let mut record: Vec<String> = Vec::with_capacity(row.cells.len() + 1);
        if write_index {
            record.push(row.index.to_string());
        }
        record.extend(row.cells.iter().map(|cell| cell.render()));
        writer
            .write_record(&record)
            .map_err(|e| TcgaMetaError::file_write(path, e))?;
    }

    writer.flush().map_err(|e| TcgaMetaError::file_write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_index_column_and_rendering() {
        let mut t = Table::from_rows(
            "joined table",
            vec!["case_id".into(), "sample_type".into(), "gleason_score".into()],
            vec![
                vec!["C1".into(), "Primary Tumor".into(), Cell::Float(7.0)],
                vec!["C2".into(), "Tumor, recurrent".into(), Cell::Null],
                vec!["C3".into(), "Primary Tumor".into(), Cell::Float(9.0)],
            ],
        );
        t.retain_rows(|r| r.index != 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_delimited(&t, &path, b',', true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            ",case_id,sample_type,gleason_score\n\
             1,C2,\"Tumor, recurrent\",\n\
             2,C3,Primary Tumor,9.0\n"
        );
    }

    #[test]
    fn test_without_index() {
        let t = Table::from_rows("t", vec!["a".into()], vec![vec![Cell::Int(1)]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_delimited(&t, &path, b',', false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn test_unwritable_path() {
        let t = Table::new("t", vec!["a".into()]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let err = write_delimited(&t, &path, b',', true).unwrap_err();
        assert!(matches!(err, TcgaMetaError::FileWrite { .. }));
    }
}
