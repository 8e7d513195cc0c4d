//! Cek Fakta CLI: the main entry point.
//!
//! Commands:
//! - `chat`       : Interactive console or single-message mode
//! - `serve`      : Start the web chat
//! - `search`     : Run one web search and print the results
//! - `ping-model` : Send one prompt to the model and print the reply
//! - `doctor`     : Check configuration and credentials

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cekfakta",
    about = "Cek Fakta — asisten cek fakta klaim medis",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask questions about medical claims in the console
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the web chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single web search against the trusted-source engine
    Search {
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Send one prompt to the model and print the reply
    PingModel {
        /// Prompt to send (defaults to a short question about cortisol)
        prompt: Option<String>,
    },

    /// Check configuration and credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Search { query } => commands::search::run(&query.join(" ")).await?,
        Commands::PingModel { prompt } => commands::ping_model::run(prompt).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
