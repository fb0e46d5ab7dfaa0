//! In-memory table model shared by every pipeline step.
//!
//! A `Table` is a list of named columns and a list of rows. Each `Row`
//! carries its cells plus an index label: the row's position in the table
//! it was created in. Filtering and deduplication keep labels intact, so
//! the exported index shows where a surviving row came from.

use std::hash::{Hash, Hasher};

use tcgameta_common::{Result, TcgaMetaError};

/// A single table value. `Null` is the only missing-value representation.
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell; `None` for nulls and text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Null | Cell::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell as it appears in a delimited output file.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format_float(*f),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Shortest round-trip form of a float, always with a fractional part or
/// exponent (`3.0`, `0.25`, `1e+16`, `1.5e-05`). NaN renders empty.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return scientific(value);
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn scientific(value: f64) -> String {
    // Rust prints `1e16` / `1.5e-5`; widen the exponent to a signed two digits.
    let raw = format!("{value:e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

// Integers and integral floats compare (and hash) alike so that a numeric
// join key matches regardless of how each sheet's column was inferred.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Cell::Int(_), Cell::Float(_)) | (Cell::Float(_), Cell::Int(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Cell::Null => 0u8.hash(state),
            Cell::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Cell::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    1u8.hash(state);
                    (*f as i64).hash(state);
                } else {
                    2u8.hash(state);
                    let bits = if f.is_nan() { f64::NAN.to_bits() } else { f.to_bits() };
                    bits.hash(state);
                }
            }
            Cell::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

/// One table row: its index label and one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Empty table. `name` identifies the table in error messages.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from raw row cells, labelling rows 0..n.
    pub fn from_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(name, columns);
        for cells in rows {
            table.push_row(cells);
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row labelled with the next position. Short rows are padded
    /// with nulls; long rows are truncated to the column count.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Null);
        let index = self.rows.len();
        self.rows.push(Row { index, cells });
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Position of `column`, or `MissingColumn` naming this table.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| TcgaMetaError::missing_column(&self.name, column))
    }

    /// Value at (`row`, `column`), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r.cells[col])
    }

    pub fn rename_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        for column in &mut self.columns {
            *column = f(column);
        }
    }

    /// Project onto `columns`, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Table> {
        let positions = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                index: row.index,
                cells: positions.iter().map(|&p| row.cells[p].clone()).collect(),
            })
            .collect();

        Ok(Table {
            name: self.name.clone(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Append a column. `values` must hold one cell per row.
    pub fn append_column(&mut self, column: impl Into<String>, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(column.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.cells.push(value);
        }
    }

    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(f);
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub(crate) fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    pub(crate) fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Build a table whose rows are already labelled.
    pub(crate) fn with_labelled_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }
}
