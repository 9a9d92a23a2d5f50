//! Batch command - replace numerals in every file matching a pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cnum_core::NumeralExtractor;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input as <name>.arabic.<ext>)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    matches: Option<usize>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("=>-"),
    );

    let extractor = NumeralExtractor::from_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor, args.output_dir.as_deref());
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(count) => results.push(ProcessResult {
                path,
                matches: Some(count),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        matches: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let successful = results.len() - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Rewrite one file, returning the number of numerals replaced.
fn process_single_file(
    path: &Path,
    extractor: &NumeralExtractor,
    output_dir: Option<&Path>,
) -> anyhow::Result<usize> {
    let text = fs::read_to_string(path)?;
    let report = extractor.extract(&text)?;
    let replaced = cnum_core::splice(&text, &report.matches)?;

    let output_path = output_path(path, output_dir)?;
    fs::write(&output_path, replaced)?;
    debug!(
        "Wrote {} replacements to {}",
        report.matches.len(),
        output_path.display()
    );

    Ok(report.matches.len())
}

fn output_path(path: &Path, output_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;

    Ok(match output_dir {
        Some(dir) => dir.join(file_name),
        None => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            let name = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{}.arabic.{}", stem, ext),
                None => format!("{}.arabic", stem),
            };
            path.with_file_name(name)
        }
    })
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "status", "matches", "processing_time_ms", "error"])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (status, matches) = match result.matches {
            Some(count) => ("success", count.to_string()),
            None => ("error", String::new()),
        };

        wtr.write_record([
            filename,
            status,
            &matches,
            &result.processing_time_ms.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_path_next_to_input() {
        let path = output_path(Path::new("notes/day.txt"), None).unwrap();
        assert_eq!(path, PathBuf::from("notes/day.arabic.txt"));
    }

    #[test]
    fn test_output_path_in_directory() {
        let path = output_path(Path::new("notes/day.txt"), Some(Path::new("out"))).unwrap();
        assert_eq!(path, PathBuf::from("out/day.txt"));
    }
}
