//! Table cells and their string forms.

use std::fmt;

/// Strings a dataframe reader treats as missing values.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single value in a tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    /// Integers print in decimal, floats always carry a fractional part or
    /// an exponent (`3.0`, `1e+16`), booleans print as `true`/`false`, and
    /// missing values print as `nan`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Float(x) => f.write_str(&float_repr(*x)),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => f.write_str("nan"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = x.abs();
    if abs >= 1e16 || (abs != 0.0 && abs < 1e-4) {
        let formatted = format!("{x:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Build a cell from raw delimited text, without column context.
pub fn parse_cell(raw: &str) -> Cell {
    if NA_VALUES.contains(&raw) {
        Cell::Null
    } else {
        Cell::Text(raw.to_string())
    }
}

/// Give a column a single numeric type, the way a dataframe reader would.
///
/// - every non-null value is an integer and nothing is missing → integers
/// - every non-null value is numeric → floats (integers with gaps become floats)
/// - anything else → unchanged
pub fn infer_column(cells: Vec<Cell>) -> Vec<Cell> {
    let mut all_int = true;
    let mut all_numeric = true;
    let mut any_value = false;

    for cell in &cells {
        match cell {
            Cell::Null => all_int = false,
            Cell::Integer(_) => any_value = true,
            Cell::Float(_) => {
                any_value = true;
                all_int = false;
            }
            Cell::Text(s) => {
                any_value = true;
                if s.parse::<i64>().is_err() {
                    all_int = false;
                    if s.trim().parse::<f64>().is_err() {
                        all_numeric = false;
                    }
                }
            }
            Cell::Bool(_) => {
                any_value = true;
                all_int = false;
                all_numeric = false;
            }
        }
    }

    if !any_value || !all_numeric {
        return cells;
    }

    cells
        .into_iter()
        .map(|cell| match cell {
            Cell::Text(s) if all_int => s.parse().map(Cell::Integer).unwrap_or(Cell::Text(s)),
            Cell::Text(s) => s
                .trim()
                .parse()
                .map(Cell::Float)
                .unwrap_or(Cell::Text(s)),
            Cell::Integer(n) if !all_int => Cell::Float(n as f64),
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[Cell]) -> Vec<String> {
        cells.iter().map(Cell::to_string).collect()
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::from("Bull").to_string(), "Bull");
        assert_eq!(Cell::Integer(42).to_string(), "42");
        assert_eq!(Cell::Float(3.0).to_string(), "3.0");
        assert_eq!(Cell::Float(2.5).to_string(), "2.5");
        assert_eq!(Cell::Float(1e16).to_string(), "1e+16");
        assert_eq!(Cell::Float(0.00001).to_string(), "1e-05");
        assert_eq!(Cell::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::Null.to_string(), "nan");
    }

    #[test]
    fn test_parse_cell_missing_values() {
        assert_eq!(parse_cell(""), Cell::Null);
        assert_eq!(parse_cell("N/A"), Cell::Null);
        assert_eq!(parse_cell("null"), Cell::Null);
        assert_eq!(parse_cell("equity"), Cell::from("equity"));
    }

    #[test]
    fn test_integer_column() {
        let cells = infer_column(vec![parse_cell("007"), parse_cell("12")]);
        assert_eq!(strings(&cells), ["7", "12"]);
    }

    #[test]
    fn test_integer_column_with_gap_becomes_float() {
        let cells = infer_column(vec![parse_cell("1"), parse_cell(""), parse_cell("3")]);
        assert_eq!(strings(&cells), ["1.0", "nan", "3.0"]);
    }

    #[test]
    fn test_mixed_numeric_column() {
        let cells = infer_column(vec![parse_cell("1"), parse_cell("2.50")]);
        assert_eq!(strings(&cells), ["1.0", "2.5"]);
    }

    #[test]
    fn test_text_column_unchanged() {
        let cells = infer_column(vec![parse_cell("10"), parse_cell("revenue"), parse_cell("")]);
        assert_eq!(strings(&cells), ["10", "revenue", "nan"]);
    }

    #[test]
    fn test_all_null_column() {
        let cells = infer_column(vec![Cell::Null, Cell::Null]);
        assert_eq!(strings(&cells), ["nan", "nan"]);
    }
}
