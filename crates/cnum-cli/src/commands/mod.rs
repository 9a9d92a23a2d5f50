//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod repl;
pub mod replace;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tokio::io::AsyncReadExt;
use tracing::debug;

use cnum_core::models::config::CnumConfig;

/// Output format for extraction results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// One numeral per line
    Text,
}

impl OutputFormat {
    /// Format named in the config file, falling back to text.
    pub fn from_config(config: &CnumConfig) -> Self {
        OutputFormat::from_str(&config.output.default_format, true)
            .unwrap_or(OutputFormat::Text)
    }
}

/// Load the config from `--config`, then the default location, then defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CnumConfig> {
    if let Some(path) = config_path {
        return Ok(CnumConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(CnumConfig::from_file(&default_path)?)
    } else {
        Ok(CnumConfig::default())
    }
}

/// Text given on the command line, read from `input`, or read from stdin.
pub async fn read_input(text: Option<String>, input: Option<&PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = input {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        return Ok(tokio::fs::read_to_string(path).await?);
    }

    let mut buffer = String::new();
    tokio::io::stdin().read_to_string(&mut buffer).await?;
    Ok(buffer)
}
