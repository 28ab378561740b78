use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textsum_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "textsum")]
#[command(author, version, about = "Summarize dialogues with a pretrained seq2seq model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/textsum/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a dialogue
    Predict {
        /// Dialogue text; read from stdin when omitted or "-"
        text: Option<String>,
        /// Echo the dialogue and summary to stdout
        #[arg(short = 'e', long)]
        echo: bool,
    },
    /// Load the tokenizer and model and report what was found
    Check,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Show the fixed generation parameters
    Params,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    // init must work even when the existing file does not parse
    let config = match cli.command {
        Commands::Init { .. } => AppConfig::default(),
        _ => AppConfig::load_from(&config_path)?,
    };

    // Logs go to stderr so stdout only carries summaries
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Predict { text, echo } => commands::predict::run(&config, text.as_deref(), echo),
        Commands::Check => commands::check::run(&config),
        Commands::Init { force } => commands::init::run(&config_path, force),
        Commands::Params => commands::params::run(),
    }
}
