// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `dashboard` command.

use crate::cli::{OutputArgs, OutputFormat};
use crate::commands::print_json;
use crate::error::BinResult;
use crate::shell::Shell;

/// Shows project, lead and inventory counts.
pub async fn dashboard(shell: &Shell, args: OutputArgs) -> BinResult<()> {
    let summary = shell.dashboard().await?;

    match args.format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            println!("Dashboard");
            println!("  Projects:  {}", summary.projects);
            println!("  Leads:     {}", summary.leads);
            println!("  Inventory: {}", summary.inventory);
        }
    }
    Ok(())
}
