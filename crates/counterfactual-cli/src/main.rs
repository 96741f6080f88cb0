use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use counterfactual_core::{Config, CounterfactualEngine, SegmenterKind, Tokenizer, Vocabulary};

mod output;
mod settings;

use output::{ColorMode, Format};
use settings::Overrides;

/// Counterfactual sentence generator - swap domain words to stress-test text classifiers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to output file (default: stdout)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace each vocabulary word with a random different vocabulary word
    Random {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        vocab: VocabArgs,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Number of random counterfactuals per sentence
        #[arg(long)]
        count: Option<usize>,
    },
    /// Produce one counterfactual per vocabulary entry
    Enumerate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        vocab: VocabArgs,
    },
    /// Show the token sequence used for matching
    Tokenize {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Sentences to process
    sentences: Vec<String>,

    /// Read sentences from a file, one per line ('-' for stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Word segmenter used before alphanumeric splitting (treebank, whitespace)
    #[arg(long)]
    segmenter: Option<SegmenterKind>,
}

#[derive(clap::Args, Debug)]
struct VocabArgs {
    /// Vocabulary file (.csv, .tsv, .jsonl)
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// Column holding the vocabulary words
    #[arg(long)]
    column: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let use_color = !args.no_color && args.output.is_none() && std::io::stdout().is_terminal();
    let color = ColorMode(use_color);
    let status_color = ColorMode(!args.no_color && std::io::stderr().is_terminal());

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = args.output {
        let file = std::fs::File::create(output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        Box::new(std::io::BufWriter::new(file))
    } else {
        Box::new(std::io::stdout().lock())
    };

    match args.command {
        Command::Random {
            input,
            vocab,
            seed,
            count,
        } => {
            let config = settings::resolve(
                args.config.as_deref(),
                Overrides {
                    vocab_path: vocab.vocab,
                    column: vocab.column,
                    seed,
                    count,
                    segmenter: input.segmenter,
                },
            )?;
            let sentences = read_sentences(&input, std::io::stdin().lock())?;
            let vocabulary = load_vocabulary(&config, &mut std::io::stderr(), status_color)?;
            let engine = CounterfactualEngine::new(counterfactual_parsing::tokenizer_for(config.segmenter));
            let mut rng = config.rng();

            let mut generated = 0;
            for sentence in &sentences {
                let tokens = engine.tokenize(sentence);
                let mut results = Vec::with_capacity(config.count);
                for _ in 0..config.count {
                    let cf = engine
                        .random_from_tokens(sentence, &tokens, &vocabulary, &mut rng)
                        .with_context(|| format!("failed to generate for: {sentence}"))?;
                    results.push(cf);
                }
                generated += results.len();
                output::print_counterfactuals(&mut writer, sentence, &tokens, &results, args.format, color)?;
            }
            finish(&mut writer, sentences.len(), generated, args.format, status_color)?;
        }
        Command::Enumerate { input, vocab } => {
            let config = settings::resolve(
                args.config.as_deref(),
                Overrides {
                    vocab_path: vocab.vocab,
                    column: vocab.column,
                    segmenter: input.segmenter,
                    ..Overrides::default()
                },
            )?;
            let sentences = read_sentences(&input, std::io::stdin().lock())?;
            let vocabulary = load_vocabulary(&config, &mut std::io::stderr(), status_color)?;
            let engine = CounterfactualEngine::new(counterfactual_parsing::tokenizer_for(config.segmenter));

            let mut generated = 0;
            for sentence in &sentences {
                let tokens = engine.tokenize(sentence);
                let results = engine.enumerate_from_tokens(sentence, &tokens, &vocabulary);
                generated += results.len();
                output::print_counterfactuals(&mut writer, sentence, &tokens, &results, args.format, color)?;
            }
            finish(&mut writer, sentences.len(), generated, args.format, status_color)?;
        }
        Command::Tokenize { input } => {
            let config = settings::resolve(
                args.config.as_deref(),
                Overrides {
                    segmenter: input.segmenter,
                    ..Overrides::default()
                },
            )?;
            let sentences = read_sentences(&input, std::io::stdin().lock())?;
            let tokenizer = counterfactual_parsing::tokenizer_for(config.segmenter);
            for sentence in &sentences {
                let tokens = tokenizer.tokenize(sentence);
                output::print_tokens(&mut writer, sentence, &tokens, args.format, color)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Sentences from positional arguments, or from `--input` (one per line,
/// `-` reads `stdin`).
fn read_sentences(input: &InputArgs, stdin: impl BufRead) -> anyhow::Result<Vec<String>> {
    let sentences = match input.input {
        Some(ref path) if path.as_os_str() == "-" => read_lines(stdin)
            .context("failed to read sentences from stdin")?,
        Some(ref path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            read_lines(std::io::BufReader::new(file))
                .with_context(|| format!("failed to read sentences from {}", path.display()))?
        }
        None => input.sentences.clone(),
    };

    if sentences.is_empty() {
        anyhow::bail!("No sentences given. Pass them as arguments or use --input FILE.");
    }
    Ok(sentences)
}

fn read_lines(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    reader.lines().collect()
}

fn load_vocabulary(
    config: &Config,
    status: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<Vocabulary> {
    let Some(ref path) = config.vocab_path else {
        anyhow::bail!(
            "No vocabulary file given. Use --vocab FILE, set {}, or add vocab_path to the config file.",
            settings::ENV_VOCAB
        );
    };

    let vocabulary = counterfactual_vocab::load_path(path, &config.column)
        .with_context(|| format!("failed to load vocabulary from {}", path.display()))?;

    output::print_vocab_summary(
        status,
        &path.display().to_string(),
        &config.column,
        vocabulary.len(),
        vocabulary.distinct_len(),
        color,
    )?;
    Ok(vocabulary)
}

fn finish(
    writer: &mut dyn Write,
    sentences: usize,
    generated: usize,
    format: Format,
    color: ColorMode,
) -> anyhow::Result<()> {
    writer.flush()?;
    if format == Format::Text {
        output::print_summary(&mut std::io::stderr(), sentences, generated, color)?;
    }
    Ok(())
}
