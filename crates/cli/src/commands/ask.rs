//! `switchbot ask` — Single-request or interactive mode.

use std::io::Write;
use switchbot_config::AppConfig;
use switchbot_core::error::AskError;
use switchbot_engine::{AskOutcome, Assistant};
use tokio::io::{AsyncBufReadExt, BufReader};

pub const TEMPLATES_HELP: &str = "\
Quick requests:
  create 10 vlans with 1 port each cisco
  secure unused ports cisco
  configure trunk with all vlans cisco
  enable ssh with authentication cisco
  create a 2-port link aggregation cisco";

pub async fn run(
    message: Option<String>,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  WARNING: No API key configured.");
        eprintln!("  Set OPENAI_API_KEY (or SWITCHBOT_API_KEY), or add it to:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
    }

    let assistant = switchbot_gateway::build_assistant(&config)?;
    let session = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if let Some(msg) = message {
        eprint!("  Generating...");
        let result = assistant.ask(&msg, &session).await;
        eprint!("\r               \r");
        println!("{}", render(result?));
        return Ok(());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      Switch Bot — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:    {} ({})", config.effective_model(), config.default_provider);
    println!("  Session:  {session}");
    println!("  Brands:   Cisco IOS, Juniper JunOS, HPE Aruba");
    println!();
    println!("  Name a brand in your request, or keep the one from your last answer.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    interactive(&assistant, &session).await?;

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

async fn interactive(assistant: &Assistant, session: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        let result = assistant.ask(line, session).await;
        eprint!("\r     \r");

        match result {
            Ok(outcome) => {
                println!();
                for out in render(outcome).lines() {
                    println!("  {out}");
                }
                println!();
            }
            Err(AskError::EmptyQuery) => continue,
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    Ok(())
}

/// Human-readable rendering of one answer.
fn render(outcome: AskOutcome) -> String {
    let mut out = format!("[{}]\n{}", outcome.brand, outcome.answer);
    for warning in &outcome.warnings {
        out.push('\n');
        out.push_str(warning);
    }
    out.push_str(&format!("\n(record {})", outcome.record_id));
    out
}
