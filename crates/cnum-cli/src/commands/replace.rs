//! Replace command - rewrite a text with Arabic numerals.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use cnum_core::NumeralExtractor;

/// Arguments for the replace command.
#[derive(Args)]
pub struct ReplaceArgs {
    /// Text to rewrite (default: --input or stdin)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ReplaceArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let text = super::read_input(args.text, args.input.as_ref()).await?;

    let extractor = NumeralExtractor::from_config(&config.extraction);
    let report = extractor.extract(&text)?;
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }

    let replaced = cnum_core::splice(&text, &report.matches)?;
    info!("Replaced {} numerals", report.matches.len());

    if let Some(output_path) = &args.output {
        fs::write(output_path, &replaced)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else if replaced.ends_with('\n') {
        print!("{}", replaced);
    } else {
        println!("{}", replaced);
    }

    Ok(())
}
