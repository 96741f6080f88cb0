//! Generation settings and their TOML file form.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default name of the vocabulary column.
pub const DEFAULT_COLUMN: &str = "word";

/// Which word segmenter the tokenizer should run before alphanumeric splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// Penn Treebank conventions: punctuation and clitics become separate units.
    #[default]
    Treebank,
    /// Plain whitespace split.
    Whitespace,
}

impl SegmenterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmenterKind::Treebank => "treebank",
            SegmenterKind::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for SegmenterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmenterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "treebank" => Ok(SegmenterKind::Treebank),
            "whitespace" => Ok(SegmenterKind::Whitespace),
            other => Err(format!(
                "unknown segmenter '{other}' (expected 'treebank' or 'whitespace')"
            )),
        }
    }
}

/// Settings for a generation run.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides:
///
/// ```toml
/// vocab_path = "data/finance_terms.csv"
/// column = "term"
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Vocabulary file to load when none is given on the command line.
    pub vocab_path: Option<PathBuf>,
    /// Column holding the candidate words.
    pub column: String,
    /// Seed for random mode. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Number of random counterfactuals per sentence.
    pub count: usize,
    pub segmenter: SegmenterKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocab_path: None,
            column: DEFAULT_COLUMN.to_string(),
            seed: None,
            count: 1,
            segmenter: SegmenterKind::default(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// `<config_dir>/counterfactual/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("counterfactual").join("config.toml"))
    }

    /// Load the default config file if it exists, otherwise return defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Build a random generator from the configured seed.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
