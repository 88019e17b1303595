// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `watch` command.

use rocket_config::GateConfig;
use tracing::info;

use crate::cli::WatchArgs;
use crate::error::{BinError, BinResult};
use crate::shell::{Shell, WatchExit};
use crate::shutdown::ShutdownCoordinator;

/// Runs the session watchdog until the session ends or Ctrl+C.
pub async fn watch(mut config: GateConfig, args: WatchArgs) -> BinResult<()> {
    apply_interval(&mut config, args.interval)?;

    let shell = Shell::from_config(config)?;
    shell.start();

    info!(
        interval_secs = shell.config().session.watchdog_interval_secs,
        "Watching session"
    );

    let shutdown = ShutdownCoordinator::new();
    match shell.watch(&shutdown).await {
        WatchExit::NotLoggedIn => println!("No active session"),
        WatchExit::LoggedOut => println!("Session ended, redirected to {}", shell.current_view()),
        WatchExit::Shutdown => println!("Stopped watching"),
    }
    Ok(())
}

/// Applies `--interval`, which is bounded like the configured interval.
fn apply_interval(config: &mut GateConfig, interval: Option<u64>) -> BinResult<()> {
    let Some(interval) = interval else {
        return Ok(());
    };
    config.session.watchdog_interval_secs = interval;
    config.session.validate().map_err(|e| {
        BinError::config(format!("invalid watch interval {}: {}", interval, e))
    })
}
