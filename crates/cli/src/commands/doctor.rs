//! `voyager doctor` — Diagnose configuration and connectivity.

use voyager_config::AppConfig;
use voyager_core::tool::ToolKind;
use voyager_tools::ToolRegistry;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Voyager Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults. Run `voyager init` to create one");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (provider: {}, model: {})", config.provider, config.model);
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running other checks.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key: set GROQ_API_KEY or VOYAGER_API_KEY");
        issues += 1;
    }

    match voyager_providers::build_from_config(&config) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  ❌ Provider '{}' rejected the health check", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Provider not usable: {e}");
            issues += 1;
        }
    }

    let tools = ToolRegistry::from_config(&config.tools);
    for kind in ToolKind::ALL {
        if !tools.supports(kind) {
            println!("  ➖ {kind} lookup disabled");
        } else if kind == ToolKind::Weather && config.tools.openweather_api_key.is_none() {
            println!("  ✅ weather lookup enabled (mock data, no OPENWEATHER_API_KEY)");
        } else {
            println!("  ✅ {kind} lookup enabled");
        }
    }

    if config.trace.enabled {
        println!("  ✅ Traces exported to {}", config.trace_dir().display());
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
