// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `create`, `update` and `delete` commands.

use anyhow::Context;
use serde_json::Value;

use rocket_auth::{Mutation, View};

use crate::cli::{CreateArgs, DeleteArgs, OutputFormat, UpdateArgs};
use crate::commands::print_json;
use crate::error::{BinError, BinResult};
use crate::shell::Shell;

/// Adds an item and prints the reloaded collection.
pub async fn create(shell: &Shell, args: CreateArgs) -> BinResult<()> {
    let mutation = Mutation::Create(parse_data(&args.data)?);
    run(shell, &args.view, mutation, args.format).await
}

/// Changes an item and prints the reloaded collection.
pub async fn update(shell: &Shell, args: UpdateArgs) -> BinResult<()> {
    let mutation = Mutation::Update {
        id: args.id,
        changes: parse_data(&args.data)?,
    };
    run(shell, &args.view, mutation, args.format).await
}

/// Removes an item and prints the reloaded collection.
pub async fn delete(shell: &Shell, args: DeleteArgs) -> BinResult<()> {
    let mutation = Mutation::Delete { id: args.id };
    run(shell, &args.view, mutation, args.format).await
}

async fn run(shell: &Shell, view: &str, mutation: Mutation, format: OutputFormat) -> BinResult<()> {
    let view =
        View::parse(view).ok_or_else(|| BinError::runtime(format!("Unknown view: {}", view)))?;

    let outcome = shell.mutate(view, mutation).await?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Text => {
            println!(
                "{} {}: done, {} items after reload",
                outcome.operation,
                outcome.collection,
                outcome.items.len()
            );
            for item in &outcome.items {
                println!("  {}", item);
            }
        }
    }
    Ok(())
}

/// Parses `--data`, which must be a JSON object.
fn parse_data(data: &str) -> anyhow::Result<Value> {
    let value: Value = serde_json::from_str(data).context("invalid --data JSON")?;
    anyhow::ensure!(value.is_object(), "--data must be a JSON object");
    Ok(value)
}
