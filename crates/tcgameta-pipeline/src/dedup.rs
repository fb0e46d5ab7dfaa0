//! Exact-duplicate row removal.

use std::collections::HashSet;

use crate::table::{Cell, Table};

/// Drop rows whose cells exactly repeat an earlier row, keeping the first
/// occurrence and the original order. Index labels are not compared; nulls
/// compare equal. Returns the number of rows dropped.
pub fn deduplicate(table: &mut Table) -> usize {
    let rows = table.take_rows();
    let before = rows.len();

    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(before);
    let kept: Vec<_> = rows
        .into_iter()
        .filter(|row| seen.insert(row.cells.clone()))
        .collect();

    let dropped = before - kept.len();
    table.set_rows(kept);
    dropped
}
