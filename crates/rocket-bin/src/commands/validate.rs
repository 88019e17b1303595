// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use rocket_config::GateConfig;
use rocket_core::LegacySessionPolicy;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::commands::print_json;
use crate::error::BinResult;

/// Reports the loaded configuration and any warnings.
///
/// The configuration has already been loaded and validated at startup, so
/// reaching this command means it is valid.
pub fn validate(cli: &Cli, config: &GateConfig, args: ValidateArgs) -> BinResult<()> {
    let source = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let warnings = collect_warnings(config);

    let mut shown = config.clone();
    shown.demo.password = "***".to_string();

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", source);
            println!();
            println!("Summary:");
            println!("  API:             {}", config.api.base_url);
            println!("  Session storage: {}", config.session.storage_dir.display());
            println!("  Lifetime:        {} days", config.session.lifetime_days);
            println!("  Watchdog:        every {}s", config.session.watchdog_interval_secs);
            println!("  Legacy sessions: {}", config.session.legacy_sessions.as_str());
            println!(
                "  Demo account:    {}",
                if config.demo.enabled { "enabled" } else { "disabled" }
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                print_json(&shown)?;
            }
        }
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "valid": true,
                "config_path": source,
                "warnings": warnings,
                "config": if args.show_config { Some(&shown) } else { None },
            }))?;
        }
    }

    Ok(())
}

fn collect_warnings(config: &GateConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.demo.enabled {
        warnings.push(format!(
            "Demo account {} is enabled and bypasses the API",
            config.demo.email
        ));
    }
    if config.api.base_url.starts_with("http://") && !is_local(&config.api.base_url) {
        warnings.push("API base URL does not use TLS".to_string());
    }
    if config.session.legacy_sessions == LegacySessionPolicy::Accept {
        warnings.push("Stored sessions without an expiry are accepted".to_string());
    }

    warnings
}

fn is_local(url: &str) -> bool {
    let host = url.trim_start_matches("http://");
    host.starts_with("localhost") || host.starts_with("127.0.0.1")
}
