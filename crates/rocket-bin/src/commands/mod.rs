// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! Every command except `validate` and `version` builds a [`Shell`] over the
//! persisted session, so state carries over between invocations.

mod dashboard;
mod login;
mod logout;
mod mutate;
mod open;
mod status;
mod validate;
mod version;
mod watch;

pub use dashboard::dashboard;
pub use login::login;
pub use logout::logout;
pub use mutate::{create, delete, update};
pub use open::open;
pub use status::status;
pub use validate::validate;
pub use version::version;
pub use watch::watch;

use rocket_config::GateConfig;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::shell::Shell;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli, config: GateConfig) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Login(args) => login::login(&open_shell(config)?, args).await,
        Commands::Logout => logout::logout(&open_shell(config)?),
        Commands::Status(args) => status::status(&open_shell(config)?, args),
        Commands::Open(args) => open::open(&open_shell(config)?, args).await,
        Commands::Create(args) => mutate::create(&open_shell(config)?, args).await,
        Commands::Update(args) => mutate::update(&open_shell(config)?, args).await,
        Commands::Delete(args) => mutate::delete(&open_shell(config)?, args).await,
        Commands::Dashboard(args) => dashboard::dashboard(&open_shell(config)?, args).await,
        Commands::Watch(args) => watch::watch(config, args).await,
        Commands::Validate(args) => validate::validate(&cli, &config, args),
        Commands::Version => version::version(&cli),
    }
}

fn open_shell(config: GateConfig) -> BinResult<Shell> {
    let shell = Shell::from_config(config)?;
    shell.start();
    Ok(shell)
}

/// Prints `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> BinResult<()> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| crate::error::BinError::runtime(format!("JSON output failed: {}", e)))?;
    println!("{}", output);
    Ok(())
}
