//! Normalized substitution vocabulary.
//!
//! A [`Vocabulary`] keeps two views of the same word list:
//!
//! - **Entries**: every value in source order, duplicates included. Enumeration
//!   walks this list, so duplicates produce duplicate output sentences.
//! - **Distinct values**: first-occurrence order with a per-value count. Random
//!   sampling walks these counts, so a value listed twice is drawn twice as
//!   often as a value listed once.

use std::collections::HashMap;

/// An ordered, lower-cased list of words eligible for substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<String>,
    distinct: Vec<String>,
    counts: Vec<usize>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from raw values, lower-casing each one.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for word in words {
            vocab.push(word.as_ref());
        }
        vocab
    }

    fn push(&mut self, word: &str) {
        let word = word.to_lowercase();
        match self.positions.get(&word) {
            Some(&index) => self.counts[index] += 1,
            None => {
                self.positions.insert(word.clone(), self.distinct.len());
                self.distinct.push(word.clone());
                self.counts.push(1);
            }
        }
        self.entries.push(word);
    }

    /// Check if a word is in the vocabulary.
    ///
    /// The lookup is case-insensitive.
    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(&word.to_lowercase())
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct values.
    pub fn distinct_len(&self) -> usize {
        self.distinct.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Distinct values in first-occurrence order.
    pub fn distinct(&self) -> &[String] {
        &self.distinct
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// Draw an entry other than `word`, weighted by how often each value
    /// occurs.
    ///
    /// Equivalent to picking uniformly among the entries that differ from
    /// `word`, without a retry loop. `word` is compared case-insensitively.
    /// Returns `None` when no other value exists (empty vocabulary, or every
    /// entry equals `word`).
    pub fn sample_excluding(&self, word: &str, rng: &mut fastrand::Rng) -> Option<&str> {
        let excluded = self.positions.get(&word.to_lowercase()).copied();
        let skipped = excluded.map_or(0, |index| self.counts[index]);
        let candidates = self.entries.len() - skipped;
        if candidates == 0 {
            return None;
        }

        let mut remaining = rng.usize(..candidates);
        for (index, (value, &count)) in self.distinct.iter().zip(&self.counts).enumerate() {
            if Some(index) == excluded {
                continue;
            }
            if remaining < count {
                return Some(value.as_str());
            }
            remaining -= count;
        }
        None
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
