//! Tabular sources: in-memory tables, CSV/TSV and JSON lines readers.

use std::collections::HashMap;
use std::io::{BufRead, Read};

use crate::VocabError;
use crate::cell::{Cell, infer_column, parse_cell};

/// Row/column access to a table with named columns.
pub trait TabularSource {
    /// Column names, in column order.
    fn headers(&self) -> &[String];

    /// All values of one column, in row order.
    fn column(&self, index: usize) -> Vec<Cell>;

    /// Index of the column named `name`.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers().iter().position(|h| h == name)
    }
}

/// An in-memory table. Short rows read as missing values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, C>(&mut self, row: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row<I, C>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.push_row(row);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Re-type every column numerically where possible.
    fn infer_types(&mut self) {
        for index in 0..self.headers.len() {
            let column = infer_column(self.column(index));
            for (row, cell) in self.rows.iter_mut().zip(column) {
                if index < row.len() {
                    row[index] = cell;
                }
            }
        }
    }
}

impl TabularSource for Table {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn column(&self, index: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(Cell::Null))
            .collect()
    }
}

/// Read delimited text with a header row.
///
/// Missing-value markers (`""`, `NA`, `null`, ...) become [`Cell::Null`];
/// numeric columns are typed as integers or floats.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table, VocabError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut table = Table::new(csv_reader.headers()?.iter());
    for record in csv_reader.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_cell));
    }
    table.infer_types();

    tracing::debug!(
        columns = table.headers.len(),
        rows = table.row_count(),
        "read delimited table"
    );
    Ok(table)
}

/// Read comma-separated text with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, VocabError> {
    read_delimited(reader, b',')
}

/// Read one JSON object per line.
///
/// Columns are the union of keys in first-seen order; absent keys read as
/// missing. Blank lines are skipped.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Table, VocabError> {
    let mut headers: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<(usize, Cell)>> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        let value: serde_json::Value = serde_json::from_str(&line)
            .map_err(|source| VocabError::Json { line: line_no, source })?;
        let serde_json::Value::Object(object) = value else {
            return Err(VocabError::NotAnObject { line: line_no });
        };

        let mut row = Vec::with_capacity(object.len());
        for (key, value) in object {
            let column = *index.entry(key.clone()).or_insert_with(|| {
                headers.push(key);
                headers.len() - 1
            });
            row.push((column, json_cell(value)));
        }
        rows.push(row);
    }

    let mut table = Table::new(headers);
    let width = table.headers.len();
    for row in rows {
        let mut cells = vec![Cell::Null; width];
        for (column, cell) in row {
            cells[column] = cell;
        }
        table.push_row(cells);
    }
    table.infer_types();

    tracing::debug!(
        columns = width,
        rows = table.row_count(),
        "read JSON lines table"
    );
    Ok(table)
}

fn json_cell(value: serde_json::Value) -> Cell {
    use serde_json::Value;
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) if !n.is_f64() => Cell::Integer(i),
            (_, Some(x)) if n.is_f64() => Cell::Float(x),
            _ => Cell::Text(n.to_string()),
        },
        Value::String(s) => Cell::Text(s),
        other => Cell::Text(other.to_string()),
    }
}
