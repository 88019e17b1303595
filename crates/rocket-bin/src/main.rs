// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `rocket` binary entry point.

use rocket_bin::cli::Cli;
use rocket_bin::error::{report_error_and_exit, BinError};
use rocket_bin::{commands, logging};
use rocket_config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let config = match ConfigLoader::new().load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => report_error_and_exit(BinError::from(e)),
    };

    logging::init_logging(
        cli.effective_log_level(config.logging.level.as_str()),
        cli.effective_log_format(config.logging.format),
    );

    if let Err(e) = commands::execute(cli, config).await {
        report_error_and_exit(e);
    }
}
