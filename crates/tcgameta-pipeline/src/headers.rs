//! Column-name normalisation for the GDC sample sheet
//! (`Case ID` → `case_id`, `Sample Type` → `sample_type`).

use crate::table::Table;

/// Spaces become underscores, then the name is lowercased.
pub fn normalise_header(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

pub fn normalise_headers(table: &mut Table) {
    table.rename_columns(normalise_header);
}
