//! Resolve generation settings: CLI flags > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use counterfactual_core::{Config, SegmenterKind};

pub const ENV_VOCAB: &str = "COUNTERFACTUAL_VOCAB";
pub const ENV_COLUMN: &str = "COUNTERFACTUAL_COLUMN";
pub const ENV_SEED: &str = "COUNTERFACTUAL_SEED";
pub const ENV_SEGMENTER: &str = "COUNTERFACTUAL_SEGMENTER";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub vocab_path: Option<PathBuf>,
    pub column: Option<String>,
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub segmenter: Option<SegmenterKind>,
}

/// Load the base config: an explicit `--config` file must exist, the default
/// file is optional.
pub fn base_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Config::load_default().context("failed to load default config file"),
    }
}

/// Apply environment variables on top of `config`.
///
/// `lookup` is `std::env::var` in the binary and a map in tests.
pub fn apply_env(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    if let Some(path) = lookup(ENV_VOCAB) {
        config.vocab_path = Some(PathBuf::from(path));
    }
    if let Some(column) = lookup(ENV_COLUMN) {
        config.column = column;
    }
    if let Some(seed) = lookup(ENV_SEED) {
        config.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("{ENV_SEED} must be an unsigned integer, got '{seed}'"))?,
        );
    }
    if let Some(segmenter) = lookup(ENV_SEGMENTER) {
        config.segmenter = segmenter
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{ENV_SEGMENTER}: {e}"))?;
    }
    Ok(config)
}

/// Apply command-line values on top of `config`.
pub fn apply_overrides(mut config: Config, overrides: Overrides) -> Config {
    if let Some(path) = overrides.vocab_path {
        config.vocab_path = Some(path);
    }
    if let Some(column) = overrides.column {
        config.column = column;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(count) = overrides.count {
        config.count = count;
    }
    if let Some(segmenter) = overrides.segmenter {
        config.segmenter = segmenter;
    }
    config
}

/// Full resolution chain used by `main`.
pub fn resolve(config_path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Config> {
    let config = base_config(config_path)?;
    let config = apply_env(config, |key| std::env::var(key).ok())?;
    let config = apply_overrides(config, overrides);
    tracing::debug!(?config, "resolved settings");
    Ok(config)
}
