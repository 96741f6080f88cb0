//! Alphanumeric run extraction and the default sentence tokenizer.

use once_cell::sync::Lazy;
use regex::Regex;

use counterfactual_core::{SegmenterKind, Token, TokenKind, Tokenizer};

use crate::segment::{TreebankSegmenter, WhitespaceSegmenter, WordSegmenter};

/// Maximal runs of ASCII letters or ASCII digits. Anything else separates runs.
static ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+|[0-9]+").unwrap());

/// Extract letter runs and digit runs from each unit, in order.
///
/// `"Q3"` gives `Q` and `3`; a unit with no letters or digits gives nothing.
pub fn split_alpha_numeric<I, S>(units: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    for unit in units {
        for m in ALNUM_RUN.find_iter(unit.as_ref()) {
            let kind = if m.as_str().starts_with(|c: char| c.is_ascii_digit()) {
                TokenKind::Numeric
            } else {
                TokenKind::Alpha
            };
            tokens.push(Token::new(m.as_str(), kind));
        }
    }
    tokens
}

/// Word segmentation followed by alphanumeric splitting.
///
/// # Example
///
/// ```
/// use counterfactual_core::Tokenizer;
/// use counterfactual_parsing::AlnumTokenizer;
///
/// let tokenizer = AlnumTokenizer::treebank();
/// let words: Vec<String> = tokenizer
///     .tokenize("I like Q3 apple.")
///     .into_iter()
///     .map(|t| t.into_string())
///     .collect();
/// assert_eq!(words, ["I", "like", "Q", "3", "apple"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlnumTokenizer<S = TreebankSegmenter> {
    segmenter: S,
}

impl AlnumTokenizer {
    pub fn treebank() -> Self {
        Self::new(TreebankSegmenter)
    }
}

impl AlnumTokenizer<WhitespaceSegmenter> {
    pub fn whitespace() -> Self {
        Self::new(WhitespaceSegmenter)
    }
}

impl<S: WordSegmenter> AlnumTokenizer<S> {
    pub fn new(segmenter: S) -> Self {
        Self { segmenter }
    }

    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }
}

impl<S: WordSegmenter> Tokenizer for AlnumTokenizer<S> {
    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        split_alpha_numeric(self.segmenter.segment(sentence))
    }
}

/// Tokenize with the default Treebank segmenter.
pub fn tokenize(sentence: &str) -> Vec<Token> {
    AlnumTokenizer::treebank().tokenize(sentence)
}

/// Build a boxed tokenizer for a configured segmenter.
pub fn tokenizer_for(kind: SegmenterKind) -> Box<dyn Tokenizer> {
    match kind {
        SegmenterKind::Treebank => Box::new(AlnumTokenizer::treebank()),
        SegmenterKind::Whitespace => Box::new(AlnumTokenizer::whitespace()),
    }
}
