//! Tokenizer trait and the token type it produces.
//!
//! The engine never segments text itself. Callers build a [`Tokenizer`] once
//! (for example `counterfactual_parsing::AlnumTokenizer`) and hand it to
//! [`CounterfactualEngine::new`](crate::CounterfactualEngine::new).

use serde::Serialize;

/// Whether a token is a run of letters or a run of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Alpha,
    Numeric,
}

/// A maximal run of letters or digits taken from a sentence.
///
/// The original casing is kept; vocabulary matching uses [`Token::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn alpha(text: impl Into<String>) -> Self {
        Self::new(text, TokenKind::Alpha)
    }

    pub fn numeric(text: impl Into<String>) -> Self {
        Self::new(text, TokenKind::Numeric)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Lower-cased form used for vocabulary lookups.
    pub fn normalized(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Trait for sentence tokenizers.
///
/// Implementations must be deterministic: the same sentence always yields the
/// same token sequence. An empty or punctuation-only sentence yields no tokens.
pub trait Tokenizer: Send + Sync {
    /// Split a sentence into an ordered sequence of tokens.
    fn tokenize(&self, sentence: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        (**self).tokenize(sentence)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        (**self).tokenize(sentence)
    }
}

/// Join token texts with single spaces.
pub fn join_tokens<S: AsRef<str>>(words: &[S]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_lowercases() {
        let token = Token::alpha("Revenue");
        assert_eq!(token.normalized(), "revenue");
        assert_eq!(token.as_str(), "Revenue");
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(join_tokens(&["I", "like", "Q", "3"]), "I like Q 3");
        assert_eq!(join_tokens::<&str>(&[]), "");
    }

    #[test]
    fn test_boxed_tokenizer_delegates() {
        struct Fixed;
        impl Tokenizer for Fixed {
            fn tokenize(&self, _sentence: &str) -> Vec<Token> {
                vec![Token::numeric("42")]
            }
        }

        let boxed: Box<dyn Tokenizer> = Box::new(Fixed);
        assert_eq!(boxed.tokenize("anything"), vec![Token::numeric("42")]);
    }
}
