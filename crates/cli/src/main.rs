//! Voyager CLI — the main entry point.
//!
//! Commands:
//! - `init`      — Write a default config
//! - `chat`      — Interactive chat or single-message mode
//! - `simulate`  — Replay scripted conversations and save a report
//! - `doctor`    — Diagnose configuration and connectivity

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "voyager",
    about = "Voyager — a conversational travel assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration to ~/.voyager/config.toml
    Init,

    /// Chat with the travel assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Run the built-in conversation set and save a JSON report
    Simulate {
        /// Directory for the report files
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Also ask the model to review the conversations
        #[arg(long)]
        analyze: bool,
    },

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing (stderr, so streamed answers on stdout stay clean)
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Simulate { out, analyze } => commands::simulate::run(out, analyze).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
