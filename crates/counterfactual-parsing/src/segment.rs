//! Word segmentation: sentence → word units.
//!
//! [`TreebankSegmenter`] follows the Penn Treebank conventions used by common
//! NLP word tokenizers:
//!
//! 0. The text is cut into sentences after terminal punctuation followed by
//!    whitespace; the remaining steps run per sentence.
//! 1. Opening quotes, punctuation, brackets and `--` are padded with spaces so
//!    they become their own units.
//! 2. Closing quotes and clitics (`'s`, `'m`, `'d`, `'ll`, `'re`, `'ve`, `n't`)
//!    are split off the preceding word.
//! 3. Fused forms are split (`cannot` → `can not`, `gonna` → `gon na`, ...).
//! 4. The padded text is split on whitespace.
//!
//! Clitic splitting is the only step that moves a boundary inside a run of
//! letters (`don't` → `do` `n't`), so it is the step that shapes the final
//! alphanumeric tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trait for splitting a sentence into word units.
///
/// Units may contain punctuation; alphanumeric runs are extracted afterwards.
pub trait WordSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode whitespace only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl WordSegmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Penn Treebank style word segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreebankSegmenter;

impl WordSegmenter for TreebankSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        word_units(text)
    }
}

type Rule = (Regex, &'static str);

fn rules(specs: &[(&str, &'static str)]) -> Vec<Rule> {
    specs
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
        .collect()
}

fn apply(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, (re, replacement)| {
        re.replace_all(&acc, *replacement).into_owned()
    })
}

static STARTING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r"([«“‘„]|`+)", " ${1} "),
        (r#"^""#, "``"),
        (r"(``)", " ${1} "),
        (r#"([ (\[{<])("|'')"#, "${1} `` "),
    ])
});

static PUNCTUATION: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} "),
        (r"([:,])([^\d])", " ${1} ${2}"),
        (r"([:,])$", " ${1} "),
        (r"\.{2,}", " ${0} "),
        (r"[;@#$%&]", " ${0} "),
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} "),
        (r"[?!]", " ${0} "),
        (r"([^'])' ", "${1} ' "),
        (r"\*", " ${0} "),
    ])
});

static BRACKETS: Lazy<Vec<Rule>> = Lazy::new(|| rules(&[(r"[\]\[(){}<>]", " ${0} ")]));

static DOUBLE_DASHES: Lazy<Vec<Rule>> = Lazy::new(|| rules(&[(r"--", " -- ")]));

static ENDING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r"([»”’])", " ${1} "),
        (r"''", " '' "),
        (r#"""#, " '' "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ])
});

static CONTRACTIONS: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(mor)('n)\b", " ${1} ${2} "),
        (r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
        (r"(?i) ('t)(is)\b", " ${1} ${2} "),
        (r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ])
});

/// Terminal punctuation, optional closing quotes or brackets, then whitespace.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.?!]+["')\]}»”’]*\s+"#).unwrap());

/// Cut text into sentences, keeping each sentence's terminal punctuation.
///
/// A boundary needs whitespace after the punctuation, so decimals (`3.5`)
/// and runs like `?!` at the very end stay intact.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        sentences.push(&text[start..m.end()]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Split text into Treebank word units.
///
/// # Example
///
/// ```
/// use counterfactual_parsing::word_units;
///
/// assert_eq!(
///     word_units("Revenue didn't beat Q3 estimates."),
///     vec!["Revenue", "did", "n't", "beat", "Q3", "estimates", "."],
/// );
/// ```
pub fn word_units(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .flat_map(sentence_units)
        .collect()
}

fn sentence_units(sentence: &str) -> Vec<String> {
    let text = apply(&STARTING_QUOTES, sentence.to_string());
    let text = apply(&PUNCTUATION, text);
    let text = apply(&BRACKETS, text);
    let text = apply(&DOUBLE_DASHES, text);

    let padded = format!(" {text} ");
    let text = apply(&ENDING_QUOTES, padded);
    let text = apply(&CONTRACTIONS, text);

    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(text: &str) -> Vec<String> {
        word_units(text)
    }

    #[test]
    fn test_empty() {
        assert!(units("").is_empty());
        assert!(units("   \t\n").is_empty());
    }

    #[test]
    fn test_final_period_split() {
        assert_eq!(units("Stocks fell."), vec!["Stocks", "fell", "."]);
    }

    #[test]
    fn test_comma_and_colon() {
        assert_eq!(
            units("Net income: up, again"),
            vec!["Net", "income", ":", "up", ",", "again"]
        );
        // Separators between digits stay inside the number
        assert_eq!(units("1,000 shares"), vec!["1,000", "shares"]);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(units("up 5% & $3"), vec!["up", "5", "%", "&", "$", "3"]);
    }

    #[test]
    fn test_question_and_exclamation() {
        assert_eq!(units("Really?!"), vec!["Really", "?", "!"]);
    }

    #[test]
    fn test_brackets_and_dashes() {
        assert_eq!(
            units("(EBITDA) rose--sharply"),
            vec!["(", "EBITDA", ")", "rose", "--", "sharply"]
        );
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            units("\"Strong\" quarter"),
            vec!["``", "Strong", "''", "quarter"]
        );
    }

    #[test]
    fn test_clitics() {
        assert_eq!(units("don't"), vec!["do", "n't"]);
        assert_eq!(units("I'm here"), vec!["I", "'m", "here"]);
        assert_eq!(units("firm's profit"), vec!["firm", "'s", "profit"]);
        assert_eq!(units("they'll sell"), vec!["they", "'ll", "sell"]);
        assert_eq!(units("WON'T"), vec!["WO", "N'T"]);
    }

    #[test]
    fn test_clitic_before_inner_period() {
        assert_eq!(
            units("Sales didn't. Costs rose."),
            vec!["Sales", "did", "n't", ".", "Costs", "rose", "."]
        );
        assert_eq!(
            units("It's up. They're out! We'll see"),
            vec!["It", "'s", "up", ".", "They", "'re", "out", "!", "We", "'ll", "see"]
        );
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Sales fell. Costs rose 3.5%? Yes!"),
            vec!["Sales fell. ", "Costs rose 3.5%? ", "Yes!"]
        );
        assert_eq!(split_sentences("He said \"no.\" Then left"), vec!["He said \"no.\" ", "Then left"]);
        assert!(split_sentences("").is_empty());
        assert_eq!(split_sentences("no boundary"), vec!["no boundary"]);
    }

    #[test]
    fn test_fused_forms() {
        assert_eq!(units("cannot"), vec!["can", "not"]);
        assert_eq!(units("gonna rally"), vec!["gon", "na", "rally"]);
        assert_eq!(units("Gimme"), vec!["Gim", "me"]);
        assert_eq!(units("wanna buy"), vec!["wan", "na", "buy"]);
    }

    #[test]
    fn test_ellipsis() {
        assert_eq!(units("wait... what"), vec!["wait", "...", "what"]);
    }

    #[test]
    fn test_whitespace_segmenter() {
        assert_eq!(
            WhitespaceSegmenter.segment("don't  stop."),
            vec!["don't", "stop."]
        );
    }
}
