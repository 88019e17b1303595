// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `login` command.

use rocket_auth::{Credentials, LoginKind};

use crate::cli::LoginArgs;
use crate::error::BinResult;
use crate::shell::Shell;

/// Signs in and persists the session.
pub async fn login(shell: &Shell, args: LoginArgs) -> BinResult<()> {
    let credentials = Credentials::new(args.email, args.password);
    let outcome = shell.login(&credentials).await?;

    let via = match outcome.kind {
        LoginKind::Demo => " (demo account)",
        LoginKind::Api => "",
    };
    let expires = chrono::DateTime::from_timestamp_millis(outcome.expires_at)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("✓ Logged in as {}{}", outcome.user.display_name(), via);
    println!("  Role:    {}", outcome.user.role().unwrap_or("none"));
    println!("  Expires: {}", expires);
    println!("  View:    {}", shell.current_view());
    Ok(())
}
