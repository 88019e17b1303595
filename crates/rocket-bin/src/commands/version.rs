// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Displays component versions.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Rocket CRM session gate");
    println!();
    println!("Version Information:");
    println!("  rocket-bin:     {}", env!("CARGO_PKG_VERSION"));
    println!("  rocket-core:    {}", rocket_core::VERSION);
    println!("  rocket-session: {}", rocket_session::VERSION);
    println!("  rocket-auth:    {}", rocket_auth::VERSION);
    println!("  rocket-config:  {}", rocket_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
