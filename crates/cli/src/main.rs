//! Switch Bot CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config directory
//! - `ask`      — Single request or interactive session
//! - `serve`    — Start the HTTP gateway
//! - `history`  — List, delete or export recorded exchanges
//! - `status`   — Show effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "switchbot",
    about = "Switch Bot — CLI commands for Cisco, Juniper and HPE switches",
    version,
    author
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
    /// Initialize configuration
    Onboard,

    /// Ask for switch configuration commands
    #[command(after_help = commands::ask::TEMPLATES_HELP)]
    Ask {
        /// Send a single request instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Session to continue (a fresh one is created if omitted)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage recorded exchanges
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },

    /// Show effective configuration
    Status,
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
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Ask { message, session } => commands::ask::run(message, session).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::History { action } => commands::history::run(action).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
