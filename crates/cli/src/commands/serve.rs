//! `switchbot serve` — Start the HTTP API server.

use switchbot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🔌 Switch Bot Gateway");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {} ({})", config.effective_model(), config.default_provider);
    println!("   History:   {}", config.history_path().display());
    if !config.has_api_key() {
        println!("   ⚠️  No API key configured; requests will report an invalid key.");
    }

    switchbot_gateway::start(config).await?;

    Ok(())
}
