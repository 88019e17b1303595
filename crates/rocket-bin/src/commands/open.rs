// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `open` command.

use rocket_auth::View;

use crate::cli::{OpenArgs, OutputFormat};
use crate::commands::print_json;
use crate::error::{BinError, BinResult};
use crate::shell::Shell;

/// Navigates to a view through the route guard and lists its items.
pub async fn open(shell: &Shell, args: OpenArgs) -> BinResult<()> {
    let view = View::parse(&args.view)
        .ok_or_else(|| BinError::runtime(format!("Unknown view: {}", args.view)))?;

    let items = shell.open(view).await?;

    match args.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "view": view.path(),
            "items": items,
        }))?,
        OutputFormat::Text => {
            println!("{} ({} items)", view, items.len());
            for item in &items {
                println!("  {}", item);
            }
        }
    }
    Ok(())
}
