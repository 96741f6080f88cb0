//! Counterfactual sentence generation for text-classifier robustness testing.
//!
//! Given a sentence and a domain vocabulary, the engine produces variants in
//! which every token found in the vocabulary is swapped for another vocabulary
//! word. Tokenization is pluggable through the [`Tokenizer`] trait; the default
//! implementation lives in `counterfactual-parsing`.

use std::path::PathBuf;

pub mod config;
pub mod engine;
pub mod tokenizer;
pub mod vocabulary;

pub use config::{Config, DEFAULT_COLUMN, SegmenterKind};
pub use engine::{Counterfactual, CounterfactualEngine, Substitution, matching_positions};
pub use tokenizer::{Token, TokenKind, Tokenizer, join_tokens};
pub use vocabulary::Vocabulary;

/// Errors from counterfactual generation.
#[derive(Debug, thiserror::Error)]
pub enum CounterfactualError {
    #[error("vocabulary is empty; random substitution needs at least one entry")]
    EmptyVocabulary,
}

/// Errors from loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
