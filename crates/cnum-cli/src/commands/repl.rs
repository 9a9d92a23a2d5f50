//! Interactive loop: one line in, its numerals and replacement out.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use cnum_core::NumeralExtractor;

const PROMPT: &str = "> ";

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let extractor = NumeralExtractor::from_config(&config.extraction);
    let separator = config.output.separator.as_str();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if line == "exit" {
            break;
        }

        let report = extractor.extract(line)?;
        for diagnostic in &report.diagnostics {
            warn!("{}", diagnostic);
        }

        let shown = report.display_strings();
        println!("{} {}", style(shown.len()).cyan(), shown.join(separator));
        println!("{}", cnum_core::splice(line, &report.matches)?);
        debug!("Line processed in {}ms", report.processing_time_ms);

        prompt()?;
    }

    Ok(())
}

fn prompt() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()?;
    Ok(())
}
