//! `switchbot history` — Inspect and manage recorded exchanges.

use clap::Subcommand;
use std::path::PathBuf;
use switchbot_config::AppConfig;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List records, newest first
    List {
        /// Show at most this many records
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete one record
    Delete {
        /// Record id
        id: String,
    },

    /// Export one record as PDF
    Export {
        /// Record id
        id: String,

        /// Output file (defaults to switch_config_<id>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let assistant = switchbot_gateway::build_assistant(&config)?;

    match action {
        HistoryAction::List { limit } => {
            let records = assistant.list_history().await;
            if records.is_empty() {
                println!("  No history yet.");
                return Ok(());
            }
            println!("  {} record(s) in {}", records.len(), config.history_path().display());
            println!();
            for record in records.iter().take(limit) {
                let preview: String = record.query.chars().take(60).collect();
                println!(
                    "  {}  {:<8} {}  {}",
                    record.id,
                    record.brand.as_str(),
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    preview
                );
            }
        }

        HistoryAction::Delete { id } => {
            if assistant.delete_history(&id).await? {
                println!("  ✅ Deleted {id}");
            } else {
                return Err(format!("No history record with id {id}").into());
            }
        }

        HistoryAction::Export { id, output } => {
            let bytes = switchbot_export::export_pdf(assistant.ledger(), &id).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(switchbot_export::file_name(&id)));
            tokio::fs::write(&path, &bytes).await?;
            println!("  ✅ Wrote {} ({} bytes)", path.display(), bytes.len());
        }
    }

    Ok(())
}
