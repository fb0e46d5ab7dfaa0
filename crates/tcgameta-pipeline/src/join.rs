//! Clinical projection and the sample ⟕ clinical left join.

use std::collections::{HashMap, HashSet};

use tcgameta_common::{JoinConfig, Result};

use crate::table::{Cell, Row, Table};
use crate::{CASE_ID, CASE_SUBMITTER_ID, CLINICAL_COLUMNS};

/// Name given to the table produced by the join.
pub const JOINED_TABLE: &str = "joined table";

/// Project the clinical sheet onto the four columns the pipeline needs.
pub fn select_clinical_columns(clinical: &Table) -> Result<Table> {
    clinical.select(&CLINICAL_COLUMNS)
}

/// Left join of sample rows to clinical rows on
/// `sample.case_id == clinical.case_submitter_id`.
pub fn join_sample_clinical(sample: &Table, clinical: &Table, suffixes: &JoinConfig) -> Result<Table> {
    left_join(sample, clinical, CASE_ID, CASE_SUBMITTER_ID, suffixes)
}

/// Left outer join.
///
/// Every left row appears once per matching right row (in right order), or
/// once with nulls on the right when nothing matches. Null keys match each
/// other. Column names present on both sides get `left_suffix` /
/// `right_suffix`, except a key column shared by name, which is kept once.
/// Result rows are labelled 0..n.
pub fn left_join(
    left: &Table,
    right: &Table,
    left_on: &str,
    right_on: &str,
    suffixes: &JoinConfig,
) -> Result<Table> {
    let left_key = left.require_column(left_on)?;
    let right_key = right.require_column(right_on)?;

    let shared_key = left_on == right_on;
    let right_kept: Vec<usize> = (0..right.columns().len())
        .filter(|&i| !(shared_key && i == right_key))
        .collect();

    let left_names: HashSet<&str> = left.columns().iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = right_kept
        .iter()
        .map(|&i| right.columns()[i].as_str())
        .collect();

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|name| {
            if right_names.contains(name.as_str()) {
                format!("{name}{}", suffixes.left_suffix)
            } else {
                name.clone()
            }
        })
        .collect();
    columns.extend(right_kept.iter().map(|&i| {
        let name = &right.columns()[i];
        if left_names.contains(name.as_str()) {
            format!("{name}{}", suffixes.right_suffix)
        } else {
            name.clone()
        }
    }));

    let mut matches: HashMap<&Cell, Vec<&Row>> = HashMap::new();
    for row in right.rows() {
        matches.entry(&row.cells[right_key]).or_default().push(row);
    }

    let nulls = vec![Cell::Null; right_kept.len()];
    let mut rows = Vec::with_capacity(left.len());
    for left_row in left.rows() {
        match matches.get(&left_row.cells[left_key]) {
            Some(right_rows) => {
                for right_row in right_rows {
                    let mut cells = left_row.cells.clone();
                    cells.extend(right_kept.iter().map(|&i| right_row.cells[i].clone()));
                    rows.push(Row { index: rows.len(), cells });
                }
            }
            None => {
                let mut cells = left_row.cells.clone();
                cells.extend(nulls.iter().cloned());
                rows.push(Row { index: rows.len(), cells });
            }
        }
    }

    Ok(Table::with_labelled_rows(JOINED_TABLE, columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PRIMARY_GRADE, SAMPLE_TYPE, SECONDARY_GRADE};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        Table::from_rows(
            "sample sheet",
            cols(&["case_id", SAMPLE_TYPE]),
            vec![
                vec!["C1".into(), "Primary Tumor".into()],
                vec!["C2".into(), "Solid Tissue Normal".into()],
                vec!["C3".into(), "Primary Tumor".into()],
            ],
        )
    }

    fn clinical() -> Table {
        Table::from_rows(
            "clinical sheet",
            cols(&CLINICAL_COLUMNS),
            vec![
                vec!["u1".into(), "C1".into(), "Pattern 3".into(), "Pattern 4".into()],
                vec!["u2".into(), "C2".into(), "'--".into(), "'--".into()],
                vec!["u1b".into(), "C1".into(), "Pattern 4".into(), "Pattern 3".into()],
            ],
        )
    }

    #[test]
    fn test_projection_requires_all_four_columns() {
        let table = Table::new("clinical sheet", cols(&["case_id", "case_submitter_id", "primary_gleason_grade"]));
        let err = select_clinical_columns(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing column 'secondary_gleason_grade' in clinical sheet"
        );
    }

    #[test]
    fn test_projection_drops_extra_columns() {
        let table = Table::from_rows(
            "clinical sheet",
            cols(&["project_id", "secondary_gleason_grade", "case_submitter_id", "primary_gleason_grade", "case_id"]),
            vec![vec!["TCGA-PRAD".into(), "Pattern 4".into(), "C1".into(), "Pattern 3".into(), "u1".into()]],
        );
        let projected = select_clinical_columns(&table).unwrap();
        assert_eq!(projected.columns(), &CLINICAL_COLUMNS);
        assert_eq!(projected.get(0, CASE_ID), Some(&Cell::text("u1")));
    }

    #[test]
    fn test_left_join_fans_out_and_keeps_unmatched() {
        let joined = join_sample_clinical(&sample(), &clinical(), &JoinConfig::default()).unwrap();
        assert_eq!(
            joined.columns(),
            &["case_id_x", "sample_type", "case_id_y", "case_submitter_id", PRIMARY_GRADE, SECONDARY_GRADE]
        );
        // C1 matches twice, C2 once, C3 not at all
        assert_eq!(joined.len(), 4);
        let case_ids: Vec<String> = joined.rows().iter().map(|r| r.cells[0].render()).collect();
        assert_eq!(case_ids, vec!["C1", "C1", "C2", "C3"]);
        assert_eq!(joined.get(1, "case_id_y"), Some(&Cell::text("u1b")));
        assert_eq!(joined.get(3, PRIMARY_GRADE), Some(&Cell::Null));
        assert_eq!(joined.get(3, "case_submitter_id"), Some(&Cell::Null));

        let labels: Vec<usize> = joined.rows().iter().map(|r| r.index).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_left_join_requires_left_key() {
        let left = Table::new("sample sheet", cols(&["sample_id"]));
        let err = join_sample_clinical(&left, &clinical(), &JoinConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing column 'case_id' in sample sheet");
    }

    #[test]
    fn test_shared_key_name_kept_once() {
        let left = Table::from_rows("l", cols(&["k", "v"]), vec![vec![1i64.into(), "a".into()]]);
        let right = Table::from_rows("r", cols(&["k", "v"]), vec![vec![1.0f64.into(), "b".into()]]);
        let joined = left_join(&left, &right, "k", "k", &JoinConfig::default()).unwrap();
        assert_eq!(joined.columns(), &["k", "v_x", "v_y"]);
        // integer key matches float key
        assert_eq!(joined.get(0, "v_y"), Some(&Cell::text("b")));
    }

    #[test]
    fn test_null_keys_match_each_other() {
        let left = Table::from_rows("l", cols(&["k"]), vec![vec![Cell::Null]]);
        let right = Table::from_rows("r", cols(&["j", "v"]), vec![vec![Cell::Null, "hit".into()]]);
        let joined = left_join(&left, &right, "k", "j", &JoinConfig::default()).unwrap();
        assert_eq!(joined.get(0, "v"), Some(&Cell::text("hit")));
    }
}
