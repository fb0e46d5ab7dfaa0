//! Delimited sheet loader.
//!
//! Reads a header row plus records with the `csv` crate, maps the standard
//! missing-value markers to `Cell::Null`, and infers a type per column:
//! integer when every value is an integer and nothing is missing, float when
//! every value is numeric, text otherwise.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tcgameta_common::{Result, TcgaMetaError};
use tracing::debug;

use crate::table::{Cell, Table};

/// Field values read as missing. `'--` is deliberately absent: GDC writes
/// it for unreported clinical fields and it is recoded after the join.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

/// Load a delimited file into a `Table` named `table_name`.
///
/// Missing, unreadable or malformed files (no header, a record wider than
/// the header, invalid UTF-8) fail with `FileRead`. Records narrower than
/// the header are padded with nulls.
pub fn read_delimited(path: &Path, delimiter: u8, table_name: &str) -> Result<Table> {
    debug!("Loading {} from {:?}", table_name, path);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TcgaMetaError::file_read(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| TcgaMetaError::file_read(path, e))?
        .clone();
    if headers.is_empty() {
        return Err(TcgaMetaError::file_read(path, "no header row"));
    }

    let columns = dedupe_headers(headers.iter());
    let width = columns.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TcgaMetaError::file_read(path, e))?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(TcgaMetaError::file_read(
                path,
                format!("line {line}: expected {width} fields, saw {}", record.len()),
            ));
        }
        raw_rows.push(record.iter().map(missing_to_none).collect());
    }

    let kinds: Vec<ColumnKind> = (0..width)
        .map(|col| infer_kind(raw_rows.iter().map(|row| row.get(col).and_then(|v| v.as_deref()))))
        .collect();

    let mut table = Table::new(table_name, columns);
    for raw in raw_rows {
        let cells = raw
            .into_iter()
            .zip(&kinds)
            .map(|(value, kind)| to_cell(value, *kind))
            .collect();
        table.push_row(cells);
    }

    debug!(
        "Loaded {}: {} rows x {} columns",
        table_name,
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

fn missing_to_none(field: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

fn infer_kind<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    let mut saw_missing = false;
    let mut saw_value = false;
    let mut all_int = true;

    for value in values {
        match value {
            None => saw_missing = true,
            Some(s) => {
                saw_value = true;
                if all_int && s.parse::<i64>().is_err() {
                    all_int = false;
                }
                if !all_int && s.parse::<f64>().is_err() {
                    return ColumnKind::Text;
                }
            }
        }
    }

    match (saw_value, all_int && !saw_missing) {
        (false, _) => ColumnKind::Text,
        (true, true) => ColumnKind::Int,
        (true, false) => ColumnKind::Float,
    }
}

fn to_cell(value: Option<String>, kind: ColumnKind) -> Cell {
    let Some(s) = value else {
        return Cell::Null;
    };
    match kind {
        ColumnKind::Int => s.parse::<i64>().map_or_else(|_| Cell::Text(s), Cell::Int),
        ColumnKind::Float => s.parse::<f64>().map_or_else(|_| Cell::Text(s), Cell::Float),
        ColumnKind::Text => Cell::Text(s),
    }
}

/// Repeated header names become `name`, `name.1`, `name.2`, …
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let headers: Vec<&str> = headers.collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.to_string();
        if taken.contains(&name) {
            let count = counts.entry(header).or_insert(0);
            loop {
                *count += 1;
                name = format!("{header}.{count}");
                if !taken.contains(&name) {
                    break;
                }
            }
        }
        taken.insert(name.clone());
        columns.push(name);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_infers_column_types() {
        let file = write_temp(
            "id\tsize\tratio\tlabel\tsparse\n\
             a\t10\t0.5\tx\t\n\
             b\t20\t2\ty\t7\n",
        );
        let table = read_delimited(file.path(), b'\t', "sheet").unwrap();
        assert_eq!(table.get(0, "id"), Some(&Cell::text("a")));
        assert!(matches!(table.get(0, "size"), Some(Cell::Int(10))));
        assert!(matches!(table.get(1, "ratio"), Some(Cell::Float(f)) if *f == 2.0));
        // integers with a gap become floats
        assert!(matches!(table.get(0, "sparse"), Some(Cell::Null)));
        assert!(matches!(table.get(1, "sparse"), Some(Cell::Float(f)) if *f == 7.0));
    }

    #[test]
    fn test_missing_markers_but_not_gdc_sentinel() {
        let file = write_temp("a\tb\tc\nNA\t'--\tnull\n");
        let table = read_delimited(file.path(), b'\t', "sheet").unwrap();
        assert_eq!(table.get(0, "a"), Some(&Cell::Null));
        assert_eq!(table.get(0, "b"), Some(&Cell::text("'--")));
        assert_eq!(table.get(0, "c"), Some(&Cell::Null));
    }

    #[test]
    fn test_short_rows_padded() {
        let file = write_temp("a\tb\tc\n1\t2\n");
        let table = read_delimited(file.path(), b'\t', "sheet").unwrap();
        assert_eq!(table.get(0, "c"), Some(&Cell::Null));
    }

    #[test]
    fn test_wide_row_is_malformed() {
        let file = write_temp("a\tb\n1\t2\n3\t4\t5\n");
        let err = read_delimited(file.path(), b'\t', "sheet").unwrap_err();
        assert!(matches!(err, TcgaMetaError::FileRead { .. }));
        assert!(err.to_string().contains("expected 2 fields, saw 3"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_delimited(&dir.path().join("absent.tsv"), b'\t', "sheet").unwrap_err();
        assert!(matches!(err, TcgaMetaError::FileRead { .. }));
    }

    #[test]
    fn test_empty_file() {
        let file = write_temp("");
        let err = read_delimited(file.path(), b'\t', "sheet").unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let file = write_temp("case_id\tsample_type\n");
        let table = read_delimited(file.path(), b'\t', "sheet").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_duplicate_headers_mangled() {
        let columns = dedupe_headers(["a", "b", "a", "a", "a.1"].into_iter());
        assert_eq!(columns, vec!["a", "b", "a.1", "a.2", "a.1.1"]);
    }

    #[test]
    fn test_quoted_fields() {
        let file = write_temp("a\tb\n\"x\ty\"\tz\n");
        let table = read_delimited(file.path(), b'\t', "sheet").unwrap();
        assert_eq!(table.get(0, "a"), Some(&Cell::text("x\ty")));
    }
}
