// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `status` command.

use crate::cli::{OutputFormat, StatusArgs};
use crate::commands::print_json;
use crate::error::BinResult;
use crate::shell::Shell;

/// Shows the current session and reachable views.
pub fn status(shell: &Shell, args: StatusArgs) -> BinResult<()> {
    let status = shell.status();

    match args.format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Text => {
            let Some(user) = status.user.as_ref().filter(|_| status.logged_in) else {
                println!("Not logged in");
                println!("  View: {}", status.current_view);
                return Ok(());
            };

            println!(
                "Logged in as {} <{}>",
                user.display_name(),
                user.email.as_deref().unwrap_or("-")
            );
            println!("  Role:    {}", user.role().unwrap_or("none"));
            match status.expires_at {
                Some(at) => println!("  Expires: {}", at.format("%Y-%m-%d %H:%M UTC")),
                None => println!("  Expires: never (legacy session)"),
            }
            println!("  View:    {}", status.current_view);
            println!("  Menu:    {}", status.menu.join(", "));
        }
    }
    Ok(())
}
