//! Global literal recoding of GDC clinical values.
//!
//! GDC exports write `'--` for unreported fields and `Pattern N` for
//! Gleason patterns. Every text cell of the table is checked against the
//! lookup, regardless of which column it sits in.

use crate::table::{Cell, Table};

/// GDC "not reported" sentinel.
pub const GDC_MISSING: &str = "'--";

/// Literal → replacement. `None` means the cell becomes null.
pub const GRADE_RECODES: &[(&str, Option<f64>)] = &[
    (GDC_MISSING, None),
    ("Pattern 2", Some(2.0)),
    ("Pattern 3", Some(3.0)),
    ("Pattern 4", Some(4.0)),
    ("Pattern 5", Some(5.0)),
];

/// Replacement for a single cell, if its value is in the lookup.
pub fn recode_cell(cell: &Cell) -> Option<Cell> {
    let text = cell.as_str()?;
    GRADE_RECODES
        .iter()
        .find(|(literal, _)| *literal == text)
        .map(|(_, replacement)| replacement.map_or(Cell::Null, Cell::Float))
}

/// Apply the lookup to every cell. Returns the number of cells replaced.
pub fn recode_values(table: &mut Table) -> usize {
    let mut replaced = 0;
    for row in table.rows_mut() {
        for cell in row.cells.iter_mut() {
            if let Some(new_cell) = recode_cell(cell) {
                *cell = new_cell;
                replaced += 1;
            }
        }
    }
    replaced
}
