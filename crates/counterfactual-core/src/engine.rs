//! Counterfactual generation over a tokenized sentence.
//!
//! Two strategies share the same matching rule (a token matches when its
//! lower-cased form is in the [`Vocabulary`]):
//!
//! - **Random**: every matching position gets its own draw from the vocabulary
//!   entries other than the token itself, so duplicated entries weigh more.
//! - **Enumeration**: one sentence per vocabulary entry, with that entry placed
//!   at every matching position.
//!
//! A sentence with no tokens is returned unchanged by both strategies.

use serde::Serialize;

use crate::tokenizer::{Token, Tokenizer, join_tokens};
use crate::vocabulary::Vocabulary;
use crate::CounterfactualError;

/// One replaced token inside a generated sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// Index into the token sequence.
    pub position: usize,
    pub original: String,
    pub replacement: String,
}

/// A generated sentence and the substitutions that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counterfactual {
    pub text: String,
    pub substitutions: Vec<Substitution>,
}

impl Counterfactual {
    /// A result that is the input sentence verbatim.
    pub fn unchanged(sentence: &str) -> Self {
        Self {
            text: sentence.to_string(),
            substitutions: Vec::new(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.substitutions.is_empty()
    }
}

/// Indices of tokens whose lower-cased form is in the vocabulary.
pub fn matching_positions(tokens: &[Token], vocabulary: &Vocabulary) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| vocabulary.contains(token.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Generates counterfactual sentences with an injected tokenizer.
///
/// # Example
///
/// ```
/// use counterfactual_core::{CounterfactualEngine, Token, Tokenizer, Vocabulary};
///
/// struct Words;
/// impl Tokenizer for Words {
///     fn tokenize(&self, sentence: &str) -> Vec<Token> {
///         sentence.split_whitespace().map(Token::alpha).collect()
///     }
/// }
///
/// let engine = CounterfactualEngine::new(Words);
/// let vocab = Vocabulary::new(["profit", "loss"]);
///
/// assert_eq!(
///     engine.generate_all("Quarterly profit rose", &vocab),
///     vec!["Quarterly profit rose", "Quarterly loss rose"],
/// );
///
/// let mut rng = fastrand::Rng::with_seed(3);
/// assert_eq!(
///     engine.generate_random("Quarterly profit rose", &vocab, &mut rng).unwrap(),
///     "Quarterly loss rose",
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CounterfactualEngine<T> {
    tokenizer: T,
}

impl<T: Tokenizer> CounterfactualEngine<T> {
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn tokenize(&self, sentence: &str) -> Vec<Token> {
        self.tokenizer.tokenize(sentence)
    }

    /// Replace every matching token with a random different vocabulary value.
    ///
    /// Returns the sentence unchanged when it has no tokens. Fails with
    /// [`CounterfactualError::EmptyVocabulary`] when there are tokens but
    /// nothing to sample from. A matching token whose only vocabulary value is
    /// itself is kept as-is.
    pub fn random_counterfactual(
        &self,
        sentence: &str,
        vocabulary: &Vocabulary,
        rng: &mut fastrand::Rng,
    ) -> Result<Counterfactual, CounterfactualError> {
        let tokens = self.tokenizer.tokenize(sentence);
        self.random_from_tokens(sentence, &tokens, vocabulary, rng)
    }

    /// [`random_counterfactual`](Self::random_counterfactual) over tokens the
    /// caller already produced for `sentence`.
    pub fn random_from_tokens(
        &self,
        sentence: &str,
        tokens: &[Token],
        vocabulary: &Vocabulary,
        rng: &mut fastrand::Rng,
    ) -> Result<Counterfactual, CounterfactualError> {
        if tokens.is_empty() {
            return Ok(Counterfactual::unchanged(sentence));
        }
        if vocabulary.is_empty() {
            return Err(CounterfactualError::EmptyVocabulary);
        }

        let mut words: Vec<&str> = Vec::with_capacity(tokens.len());
        let mut substitutions = Vec::new();

        for (position, token) in tokens.iter().enumerate() {
            if !vocabulary.contains(token.as_str()) {
                words.push(token.as_str());
                continue;
            }
            match vocabulary.sample_excluding(token.as_str(), rng) {
                Some(replacement) => {
                    substitutions.push(Substitution {
                        position,
                        original: token.as_str().to_string(),
                        replacement: replacement.to_string(),
                    });
                    words.push(replacement);
                }
                None => {
                    tracing::debug!(
                        token = token.as_str(),
                        "no distinct replacement in vocabulary, keeping token"
                    );
                    words.push(token.as_str());
                }
            }
        }

        Ok(Counterfactual {
            text: join_tokens(&words),
            substitutions,
        })
    }

    /// Text-only form of [`random_counterfactual`](Self::random_counterfactual).
    pub fn generate_random(
        &self,
        sentence: &str,
        vocabulary: &Vocabulary,
        rng: &mut fastrand::Rng,
    ) -> Result<String, CounterfactualError> {
        self.random_counterfactual(sentence, vocabulary, rng)
            .map(|cf| cf.text)
    }

    /// One counterfactual per vocabulary entry, in vocabulary order.
    ///
    /// Every matching token in a given output is replaced by the same entry.
    /// A sentence with no tokens yields a single unchanged result; an empty
    /// vocabulary yields no results.
    pub fn enumerate_counterfactuals(
        &self,
        sentence: &str,
        vocabulary: &Vocabulary,
    ) -> Vec<Counterfactual> {
        let tokens = self.tokenizer.tokenize(sentence);
        self.enumerate_from_tokens(sentence, &tokens, vocabulary)
    }

    /// [`enumerate_counterfactuals`](Self::enumerate_counterfactuals) over
    /// tokens the caller already produced for `sentence`.
    pub fn enumerate_from_tokens(
        &self,
        sentence: &str,
        tokens: &[Token],
        vocabulary: &Vocabulary,
    ) -> Vec<Counterfactual> {
        if tokens.is_empty() {
            return vec![Counterfactual::unchanged(sentence)];
        }

        let positions = matching_positions(tokens, vocabulary);
        tracing::debug!(
            tokens = tokens.len(),
            matches = positions.len(),
            entries = vocabulary.len(),
            "enumerating counterfactuals"
        );

        let mut words: Vec<&str> = tokens.iter().map(Token::as_str).collect();
        vocabulary
            .iter()
            .map(|candidate| {
                for &i in &positions {
                    words[i] = candidate.as_str();
                }
                Counterfactual {
                    text: join_tokens(&words),
                    substitutions: positions
                        .iter()
                        .map(|&i| Substitution {
                            position: i,
                            original: tokens[i].as_str().to_string(),
                            replacement: candidate.clone(),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Text-only form of [`enumerate_counterfactuals`](Self::enumerate_counterfactuals).
    pub fn generate_all(&self, sentence: &str, vocabulary: &Vocabulary) -> Vec<String> {
        self.enumerate_counterfactuals(sentence, vocabulary)
            .into_iter()
            .map(|cf| cf.text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenKind;

    /// Splits on anything that is not an ASCII letter or digit, and splits
    /// letter/digit boundaries. Enough to exercise the engine without the
    /// treebank rules.
    struct MockTokenizer;

    impl Tokenizer for MockTokenizer {
        fn tokenize(&self, sentence: &str) -> Vec<Token> {
            let mut tokens = Vec::new();
            let mut current = String::new();
            let mut kind = None;
            for c in sentence.chars() {
                let next = if c.is_ascii_alphabetic() {
                    Some(TokenKind::Alpha)
                } else if c.is_ascii_digit() {
                    Some(TokenKind::Numeric)
                } else {
                    None
                };
                if next != kind && !current.is_empty() {
                    tokens.push(Token::new(std::mem::take(&mut current), kind.unwrap()));
                }
                if next.is_some() {
                    current.push(c);
                }
                kind = next;
            }
            if let Some(kind) = kind {
                if !current.is_empty() {
                    tokens.push(Token::new(current, kind));
                }
            }
            tokens
        }
    }

    fn engine() -> CounterfactualEngine<MockTokenizer> {
        CounterfactualEngine::new(MockTokenizer)
    }

    #[test]
    fn test_enumeration_example() {
        let vocab = Vocabulary::new(["apple", "banana", "q3"]);
        let out = engine().generate_all("I like Q3 apple", &vocab);
        assert_eq!(
            out,
            vec!["I like Q 3 apple", "I like Q 3 banana", "I like Q 3 q3"]
        );
    }

    #[test]
    fn test_empty_sentence_returns_original() {
        let vocab = Vocabulary::new(["x", "y"]);
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(engine().generate_random("", &vocab, &mut rng).unwrap(), "");
        assert_eq!(engine().generate_all("", &vocab), vec![""]);
    }

    #[test]
    fn test_punctuation_only_returns_original() {
        let vocab = Vocabulary::new(["x", "y"]);
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(
            engine().generate_random(" ?! ... ", &vocab, &mut rng).unwrap(),
            " ?! ... "
        );
        assert_eq!(engine().generate_all("--", &vocab), vec!["--"]);
    }

    #[test]
    fn test_single_entry_vocabulary_terminates() {
        let vocab = Vocabulary::new(["x"]);
        let mut rng = fastrand::Rng::with_seed(5);
        let cf = engine().random_counterfactual("x", &vocab, &mut rng).unwrap();
        assert_eq!(cf.text, "x");
        assert!(cf.is_unchanged());
    }

    #[test]
    fn test_random_requires_vocabulary() {
        let vocab = Vocabulary::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let err = engine()
            .generate_random("shares fell", &vocab, &mut rng)
            .unwrap_err();
        assert!(matches!(err, CounterfactualError::EmptyVocabulary));
    }

    #[test]
    fn test_empty_tokens_win_over_empty_vocabulary() {
        let vocab = Vocabulary::default();
        let mut rng = fastrand::Rng::with_seed(5);
        assert_eq!(engine().generate_random("...", &vocab, &mut rng).unwrap(), "...");
    }

    #[test]
    fn test_enumeration_empty_vocabulary_is_empty() {
        let vocab = Vocabulary::default();
        assert!(engine().generate_all("shares fell", &vocab).is_empty());
    }

    #[test]
    fn test_random_replacements_are_members_and_differ() {
        let vocab = Vocabulary::new(["rose", "fell", "surged", "Fell"]);
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..200 {
            let cf = engine()
                .random_counterfactual("Shares ROSE 5 percent, then fell.", &vocab, &mut rng)
                .unwrap();
            let words: Vec<&str> = cf.text.split(' ').collect();
            assert_eq!(words.len(), 6);
            assert_eq!(words[0], "Shares");
            assert_eq!(words[2], "5");
            assert_eq!(words[3], "percent");
            assert_eq!(words[4], "then");
            for (i, original) in [(1, "rose"), (5, "fell")] {
                assert!(vocab.contains(words[i]));
                assert_ne!(words[i], original);
            }
            assert_eq!(cf.substitutions.len(), 2);
            assert_eq!(cf.substitutions[0].position, 1);
            assert_eq!(cf.substitutions[0].original, "ROSE");
        }
    }

    #[test]
    fn test_random_draws_per_position() {
        // With two matching positions and several alternatives, a fixed seed
        // sequence should eventually give different replacements per position.
        let vocab = Vocabulary::new(["a", "b", "c", "d", "e", "f"]);
        let mut rng = fastrand::Rng::with_seed(1234);
        let differs = (0..100).any(|_| {
            let out = engine().generate_random("a a", &vocab, &mut rng).unwrap();
            let parts: Vec<&str> = out.split(' ').collect();
            parts[0] != parts[1]
        });
        assert!(differs);
    }

    #[test]
    fn test_random_is_deterministic_for_seed() {
        let vocab = Vocabulary::new(["bull", "bear", "flat", "volatile"]);
        let run = |seed| {
            let mut rng = fastrand::Rng::with_seed(seed);
            engine()
                .generate_random("bull market turned bear", &vocab, &mut rng)
                .unwrap()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_enumeration_uses_same_entry_everywhere() {
        let vocab = Vocabulary::new(["gain", "loss", "gain"]);
        let out = engine().enumerate_counterfactuals("Gain after loss: 2 pct", &vocab);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].text, "gain after gain 2 pct");
        assert_eq!(out[1].text, "loss after loss 2 pct");
        assert_eq!(out[2].text, out[0].text);
        assert_eq!(out[1].substitutions.len(), 2);
        assert!(out[1].substitutions.iter().all(|s| s.replacement == "loss"));
    }

    #[test]
    fn test_enumeration_without_matches_repeats_sentence() {
        let vocab = Vocabulary::new(["alpha", "beta"]);
        let out = engine().generate_all("Nothing matches here.", &vocab);
        assert_eq!(out, vec!["Nothing matches here", "Nothing matches here"]);
    }

    #[test]
    fn test_from_tokens_skips_tokenizer() {
        // Tokens that the mock tokenizer would never produce for this text
        let tokens = vec![Token::alpha("profit"), Token::numeric("7")];
        let vocab = Vocabulary::new(["profit", "loss"]);

        let out = engine().enumerate_from_tokens("unrelated text", &tokens, &vocab);
        let texts: Vec<&str> = out.iter().map(|cf| cf.text.as_str()).collect();
        assert_eq!(texts, ["profit 7", "loss 7"]);

        let mut rng = fastrand::Rng::with_seed(9);
        let cf = engine()
            .random_from_tokens("unrelated text", &tokens, &vocab, &mut rng)
            .unwrap();
        assert_eq!(cf.text, "loss 7");
        assert_eq!(cf.substitutions[0].original, "profit");
    }

    #[test]
    fn test_from_tokens_matches_sentence_form() {
        let vocab = Vocabulary::new(["gain", "loss", "flat"]);
        let sentence = "Gain turned to loss in Q4";
        let tokens = engine().tokenize(sentence);

        assert_eq!(
            engine().enumerate_from_tokens(sentence, &tokens, &vocab),
            engine().enumerate_counterfactuals(sentence, &vocab)
        );

        let mut a = fastrand::Rng::with_seed(31);
        let mut b = fastrand::Rng::with_seed(31);
        assert_eq!(
            engine().random_from_tokens(sentence, &tokens, &vocab, &mut a).unwrap(),
            engine().random_counterfactual(sentence, &vocab, &mut b).unwrap()
        );
    }

    #[test]
    fn test_from_tokens_empty_is_unchanged() {
        let vocab = Vocabulary::default();
        let mut rng = fastrand::Rng::with_seed(1);
        let cf = engine().random_from_tokens("--", &[], &vocab, &mut rng).unwrap();
        assert_eq!(cf, Counterfactual::unchanged("--"));
        assert_eq!(
            engine().enumerate_from_tokens("--", &[], &vocab),
            vec![Counterfactual::unchanged("--")]
        );
    }

    #[test]
    fn test_random_weights_duplicate_entries() {
        let vocab = Vocabulary::new(["cut", "hike", "hike", "hike", "hold"]);
        let mut rng = fastrand::Rng::with_seed(404);
        let hikes = (0..4000)
            .filter(|_| engine().generate_random("cut", &vocab, &mut rng).unwrap() == "hike")
            .count();
        let share = hikes as f64 / 4000.0;
        assert!((0.70..0.80).contains(&share), "share of hike was {share}");
    }

    #[test]
    fn test_matching_positions() {
        let tokens = MockTokenizer.tokenize("EPS beat by 3 cents");
        let vocab = Vocabulary::new(["eps", "cents", "3"]);
        assert_eq!(matching_positions(&tokens, &vocab), vec![0, 3, 4]);
    }
}
