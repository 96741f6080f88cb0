use std::io::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

use counterfactual_core::{Counterfactual, Token};

/// Whether to emit ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(self) -> bool {
        self.0
    }
}

/// Output format for every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable lines
    Text,
    /// One JSON object per input sentence
    Json,
}

#[derive(Serialize)]
struct SentenceRecord<'a> {
    sentence: &'a str,
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    counterfactuals: Option<&'a [Counterfactual]>,
}

/// Print a vocabulary summary line (to stderr in practice).
pub fn print_vocab_summary(
    w: &mut dyn Write,
    source: &str,
    column: &str,
    entries: usize,
    distinct: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} entries ({} distinct) from {} [{}]",
            "Vocabulary:".bold(),
            entries,
            distinct,
            source.cyan(),
            column
        )
    } else {
        writeln!(
            w,
            "Vocabulary: {} entries ({} distinct) from {} [{}]",
            entries, distinct, source, column
        )
    }
}

/// Render a counterfactual, highlighting replaced words when colors are on.
fn render(tokens: &[Token], cf: &Counterfactual, color: ColorMode) -> String {
    if !color.enabled() || cf.substitutions.is_empty() {
        return cf.text.clone();
    }

    let mut words: Vec<String> = tokens.iter().map(|t| t.as_str().to_string()).collect();
    for sub in &cf.substitutions {
        if let Some(word) = words.get_mut(sub.position) {
            *word = sub.replacement.green().bold().to_string();
        }
    }
    words.join(" ")
}

/// Print the counterfactuals generated for one sentence.
pub fn print_counterfactuals(
    w: &mut dyn Write,
    sentence: &str,
    tokens: &[Token],
    counterfactuals: &[Counterfactual],
    format: Format,
    color: ColorMode,
) -> std::io::Result<()> {
    match format {
        Format::Json => {
            let record = SentenceRecord {
                sentence,
                tokens,
                counterfactuals: Some(counterfactuals),
            };
            writeln!(w, "{}", serde_json::to_string(&record)?)
        }
        Format::Text => {
            if color.enabled() {
                writeln!(w, "{} {}", ">".dimmed(), sentence.dimmed())?;
            } else {
                writeln!(w, "> {}", sentence)?;
            }
            if counterfactuals.is_empty() {
                writeln!(w, "  (no counterfactuals)")?;
            }
            for cf in counterfactuals {
                writeln!(w, "  {}", render(tokens, cf, color))?;
            }
            Ok(())
        }
    }
}

/// Print the token sequence of one sentence.
pub fn print_tokens(
    w: &mut dyn Write,
    sentence: &str,
    tokens: &[Token],
    format: Format,
    color: ColorMode,
) -> std::io::Result<()> {
    match format {
        Format::Json => {
            let record = SentenceRecord {
                sentence,
                tokens,
                counterfactuals: None,
            };
            writeln!(w, "{}", serde_json::to_string(&record)?)
        }
        Format::Text => {
            let joined = tokens
                .iter()
                .map(Token::as_str)
                .collect::<Vec<_>>()
                .join(" | ");
            if color.enabled() {
                writeln!(w, "{} {}", format!("[{}]", tokens.len()).yellow(), joined)
            } else {
                writeln!(w, "[{}] {}", tokens.len(), joined)
            }
        }
    }
}

/// Print final counts (to stderr in practice).
pub fn print_summary(
    w: &mut dyn Write,
    sentences: usize,
    generated: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("{} sentence(s), {} counterfactual(s)", sentences, generated);
    if color.enabled() {
        writeln!(w, "{}", msg.bold())
    } else {
        writeln!(w, "{}", msg)
    }
}
