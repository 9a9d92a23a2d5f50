//! Extract command - list the numerals found in a text.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use cnum_core::{Diagnostic, ExtractionReport, NumeralExtractor, NumeralMatch};

use super::OutputFormat;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text to scan (default: --input or stdin)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include rejected compositions in the output
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    matches: &'a [NumeralMatch],
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a [Diagnostic]>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let text = super::read_input(args.text, args.input.as_ref()).await?;

    let extractor = NumeralExtractor::from_config(&config.extraction);
    let report = extractor.extract(&text)?;
    info!(
        "Found {} numerals in {}ms",
        report.matches.len(),
        report.processing_time_ms
    );

    let format = args.format.unwrap_or_else(|| OutputFormat::from_config(&config));
    let output = match format {
        OutputFormat::Json => format_json(&report, args.diagnostics)?,
        OutputFormat::Csv => format_csv(&report.matches)?,
        OutputFormat::Text => format_text(&report, args.diagnostics),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_json(report: &ExtractionReport, diagnostics: bool) -> anyhow::Result<String> {
    let output = JsonOutput {
        matches: &report.matches,
        diagnostics: diagnostics.then_some(report.diagnostics.as_slice()),
    };
    Ok(serde_json::to_string_pretty(&output)? + "\n")
}

fn format_csv(matches: &[NumeralMatch]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["begin", "end", "value", "decimal", "negative", "display"])?;

    for numeral in matches {
        wtr.write_record([
            &numeral.begin.to_string(),
            &numeral.end.to_string(),
            &numeral.value.to_string(),
            &numeral.decimal,
            &numeral.negative.to_string(),
            &numeral.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ExtractionReport, diagnostics: bool) -> String {
    let mut output = String::new();

    for numeral in &report.matches {
        output.push_str(&format!("{}..{}\t{}\n", numeral.begin, numeral.end, numeral));
    }

    if diagnostics {
        for diagnostic in &report.diagnostics {
            output.push_str(&format!("# {}\n", diagnostic));
        }
    }

    output
}
