//! CLI application for Chinese numeral extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, repl, replace};

/// Chinese numerals - find numerals like 三百五十 in text and convert them to 350
#[derive(Parser)]
#[command(name = "cnum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read lines from stdin and convert them interactively (default)
    Repl,

    /// List the numerals found in a text
    Extract(extract::ExtractArgs),

    /// Replace the numerals in a text with Arabic numerals
    Replace(replace::ReplaceArgs),

    /// Replace numerals in multiple files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl::run(config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Replace(args) => replace::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
