//! Sentence tokenization for counterfactual generation.
//!
//! Tokenizing is two steps:
//!
//! 1. [`WordSegmenter`] splits a sentence into word units
//!    ([`TreebankSegmenter`] by default, [`WhitespaceSegmenter`] as a simpler
//!    alternative).
//! 2. [`split_alpha_numeric`] pulls maximal letter runs and digit runs out of
//!    every unit, dropping everything else.
//!
//! [`AlnumTokenizer`] combines both and implements
//! [`counterfactual_core::Tokenizer`].

pub mod alnum;
pub mod segment;

pub use alnum::{AlnumTokenizer, split_alpha_numeric, tokenize, tokenizer_for};
pub use segment::{
    TreebankSegmenter, WhitespaceSegmenter, WordSegmenter, split_sentences, word_units,
};
