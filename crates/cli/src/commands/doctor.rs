//! `cekfakta doctor`: Check configuration and credentials.

use cekfakta_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Cek Fakta Doctor — Pemeriksaan Konfigurasi");
    println!("=============================================\n");

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file: {}", config_path.display());
    } else {
        println!("  ℹ️  No config file at {} (using defaults + environment)", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Ok(());
        }
    };

    let lines = report(&config);
    let issues = lines.iter().filter(|(ok, _)| !ok).count();
    for (ok, line) in &lines {
        println!("  {} {line}", if *ok { "✅" } else { "❌" });
    }

    if config.model.api_key.is_some() {
        match cekfakta_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Model endpoint reachable"),
                Ok(false) => println!("  ⚠️  Model endpoint answered but reported unhealthy"),
                Err(e) => println!("  ⚠️  Model endpoint check failed: {e}"),
            },
            Err(e) => println!("  ⚠️  Could not build provider: {e}"),
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// One `(ok, message)` line per credential plus the effective settings.
fn report(config: &AppConfig) -> Vec<(bool, String)> {
    let mut lines = Vec::new();

    lines.push(match config.require_model_key() {
        Ok(_) => (true, format!("Model key configured (model: {})", config.model.model)),
        Err(e) => (false, e.to_string()),
    });
    lines.push(match config.require_search_credentials() {
        Ok(_) => (
            true,
            format!("Search credentials configured ({} results per query)", config.search.num_results),
        ),
        Err(e) => (false, e.to_string()),
    });
    lines.push((
        true,
        format!("Agent cycle limit: {}", config.agent.max_iterations),
    ));

    lines
}
