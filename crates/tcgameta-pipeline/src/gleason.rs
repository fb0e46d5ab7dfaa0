//! Gleason grade filtering, normal-tissue correction and score derivation.
//!
//! Step order matters: `filter_incomplete` must run before
//! `normalise_tissue`. A normal-tissue sample whose grades were both
//! missing is dropped, never zero-filled.

use tcgameta_common::Result;
use tracing::warn;

use crate::table::{Cell, Table};
use crate::{GLEASON_SCORE, PRIMARY_GRADE, SAMPLE_TYPE, SECONDARY_GRADE};

/// Keep rows with at least one non-null grade. Returns the number dropped.
pub fn filter_incomplete(table: &mut Table) -> Result<usize> {
    let primary = table.require_column(PRIMARY_GRADE)?;
    let secondary = table.require_column(SECONDARY_GRADE)?;

    let before = table.len();
    table.retain_rows(|row| !row.cells[primary].is_null() || !row.cells[secondary].is_null());
    Ok(before - table.len())
}

/// Force both grades to 0 on rows whose `sample_type` equals
/// `normal_label`. Returns the number of rows overwritten.
pub fn normalise_tissue(table: &mut Table, normal_label: &str) -> Result<usize> {
    let sample_type = table.require_column(SAMPLE_TYPE)?;
    let primary = table.require_column(PRIMARY_GRADE)?;
    let secondary = table.require_column(SECONDARY_GRADE)?;

    let mut overwritten = 0;
    for row in table.rows_mut() {
        if row.cells[sample_type].as_str() == Some(normal_label) {
            row.cells[primary] = Cell::Float(0.0);
            row.cells[secondary] = Cell::Float(0.0);
            overwritten += 1;
        }
    }
    Ok(overwritten)
}

/// Sum of two grades. Null if either is null; `None` if either is
/// non-numeric text.
pub fn add_grades(primary: &Cell, secondary: &Cell) -> Option<Cell> {
    match (primary, secondary) {
        (Cell::Null, _) | (_, Cell::Null) => Some(Cell::Null),
        (Cell::Int(a), Cell::Int(b)) => Some(
            a.checked_add(*b)
                .map_or_else(|| Cell::Float(*a as f64 + *b as f64), Cell::Int),
        ),
        _ => {
            let a = primary.as_f64()?;
            let b = secondary.as_f64()?;
            Some(Cell::Float(a + b))
        }
    }
}

/// Append `gleason_score = primary + secondary`. Rows with a non-numeric
/// grade get a null score; their count is returned.
pub fn derive_score(table: &mut Table) -> Result<usize> {
    let primary = table.require_column(PRIMARY_GRADE)?;
    let secondary = table.require_column(SECONDARY_GRADE)?;

    let mut non_numeric = 0;
    let scores: Vec<Cell> = table
        .rows()
        .iter()
        .map(|row| {
            add_grades(&row.cells[primary], &row.cells[secondary]).unwrap_or_else(|| {
                non_numeric += 1;
                Cell::Null
            })
        })
        .collect();

    if non_numeric > 0 {
        warn!(
            "{} rows have a non-numeric Gleason grade; their {} is left empty",
            non_numeric, GLEASON_SCORE
        );
    }

    table.append_column(GLEASON_SCORE, scores);
    Ok(non_numeric)
}
