//! Vocabulary loading from tabular sources.
//!
//! A vocabulary is one column of a table: every value is stringified and
//! lower-cased, in row order, with duplicates kept.
//!
//! # Sources
//!
//! - **CSV / TSV**: [`read_csv`], [`read_delimited`]
//! - **JSON lines**: [`read_json_lines`]
//! - **In memory**: [`Table`]
//!
//! [`load_path`] picks a reader from the file extension.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use counterfactual_core::Vocabulary;

pub mod cell;
pub mod table;

pub use cell::Cell;
pub use table::{Table, TabularSource, read_csv, read_delimited, read_json_lines};

/// Errors from loading a vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    #[error("column '{column}' not found (available columns: {})", available.join(", "))]
    Schema {
        column: String,
        available: Vec<String>,
    },
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line} is not a JSON object")]
    NotAnObject { line: usize },
}

/// File formats [`load_path`] understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    JsonLines,
}

impl SourceFormat {
    /// Guess from a file extension; anything unrecognized is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("tsv") | Some("tab") => SourceFormat::Tsv,
            Some("jsonl") | Some("ndjson") => SourceFormat::JsonLines,
            _ => SourceFormat::Csv,
        }
    }
}

/// Extract `column` from `source` as a normalized vocabulary.
///
/// Fails with [`VocabError::Schema`] if the column does not exist. An empty
/// column gives an empty vocabulary, which is not an error here.
///
/// # Example
///
/// ```
/// use counterfactual_vocab::{Cell, Table, load};
///
/// let table = Table::new(["word"])
///     .with_row([Cell::from("Bullish")])
///     .with_row([Cell::Integer(10)]);
/// let vocab = load(&table, "word").unwrap();
/// assert_eq!(vocab.entries(), ["bullish", "10"]);
/// ```
pub fn load<T: TabularSource + ?Sized>(source: &T, column: &str) -> Result<Vocabulary, VocabError> {
    let index = source
        .column_index(column)
        .ok_or_else(|| VocabError::Schema {
            column: column.to_string(),
            available: source.headers().to_vec(),
        })?;

    let vocab: Vocabulary = source
        .column(index)
        .iter()
        .map(Cell::to_string)
        .collect();

    if vocab.is_empty() {
        tracing::warn!(column, "vocabulary column has no rows");
    } else {
        tracing::debug!(
            column,
            entries = vocab.len(),
            distinct = vocab.distinct_len(),
            "loaded vocabulary"
        );
    }
    Ok(vocab)
}

/// Read a table from `path` in the given format.
pub fn read_path(path: &Path, format: SourceFormat) -> Result<Table, VocabError> {
    let file = File::open(path).map_err(|source| VocabError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    match format {
        SourceFormat::Csv => read_delimited(reader, b','),
        SourceFormat::Tsv => read_delimited(reader, b'\t'),
        SourceFormat::JsonLines => read_json_lines(reader),
    }
}

/// Load `column` from the file at `path`, choosing the reader by extension.
pub fn load_path(path: &Path, column: &str) -> Result<Vocabulary, VocabError> {
    let table = read_path(path, SourceFormat::from_path(path))?;
    load(&table, column)
}
