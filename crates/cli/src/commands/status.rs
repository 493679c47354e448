//! `switchbot status` — Show effective configuration and provider reachability.

use switchbot_config::AppConfig;
use switchbot_core::error::ProviderError;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🔌 Switch Bot Status");
    println!("====================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.effective_model());
    println!("  Temperature:  {}", config.generator.temperature);
    println!("  Max tokens:   {}", config.generator.max_tokens);
    println!("  Session:      {} turns kept, {} sent", config.session.max_turns, config.session.context_window);
    println!("  History:      {} (max {})", config.history_path().display(), config.history.max_records);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });

    let router = switchbot_providers::router::build_from_config(&config);
    let reachability = match router.default() {
        Some(provider) => describe_health(provider.health_check().await),
        None => "not configured".to_string(),
    };
    println!("  Reachable:    {reachability}");

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `switchbot onboard` first");
    }

    Ok(())
}

fn describe_health(result: Result<bool, ProviderError>) -> String {
    match result {
        Ok(true) => "yes".into(),
        Ok(false) => "endpoint answered with an error (check the API key)".into(),
        Err(e) => format!("no ({e})"),
    }
}
