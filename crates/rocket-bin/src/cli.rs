// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `login`: Sign in (demo account or API)
//! - `logout`: End the session
//! - `status`: Show the session and reachable views (default)
//! - `open`: Navigate to a view through the route guard
//! - `create` / `update` / `delete`: Modify a collection and reload it
//! - `dashboard`: Show collection counts
//! - `watch`: Keep the session watchdog running until logout or Ctrl+C
//! - `validate`: Validate the configuration
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rocket_config::LogFormat as ConfigLogFormat;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Rocket CRM session and access gate.
#[derive(Parser, Debug)]
#[command(
    name = "rocket",
    author = "Sylvex <contact@sylvex.io>",
    version = rocket_core::VERSION,
    about = "Session and access-control gate for the Rocket CRM dashboard",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (defaults are used when omitted)
    #[arg(short, long, env = "ROCKET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and persist the session
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the current session
    ///
    /// This is the default command when no subcommand is specified.
    Status(StatusArgs),

    /// Navigate to a view
    ///
    /// The route guard decides whether the view opens or redirects.
    /// Collection views list their items when allowed.
    Open(OpenArgs),

    /// Add an item to a view's collection
    Create(CreateArgs),

    /// Change an item in a view's collection
    Update(UpdateArgs),

    /// Remove an item from a view's collection
    Delete(DeleteArgs),

    /// Show project, lead and inventory counts
    Dashboard(OutputArgs),

    /// Run the session watchdog in the foreground
    ///
    /// Exits when the session ends or on Ctrl+C.
    Watch(WatchArgs),

    /// Validate the configuration
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "ROCKET_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `status` command.
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `open` command.
#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// View name or route path (e.g. `leads` or `/leads`)
    pub view: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `create` command.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// View name or route path
    pub view: String,

    /// Item fields as a JSON object
    #[arg(short, long)]
    pub data: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `update` command.
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// View name or route path
    pub view: String,

    /// Item id
    pub id: String,

    /// Fields to change as a JSON object
    #[arg(short, long)]
    pub data: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `delete` command.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// View name or route path
    pub view: String,

    /// Item id
    pub id: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output-only arguments.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `watch` command.
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Override the re-check interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<ConfigLogFormat> for LogFormat {
    fn from(format: ConfigLogFormat) -> Self {
        match format {
            ConfigLogFormat::Text => LogFormat::Text,
            ConfigLogFormat::Json => LogFormat::Json,
            ConfigLogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Status`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Status(StatusArgs::default()))
    }

    /// Get the effective log level, falling back to `configured`.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Get the effective log format, falling back to `configured`.
    pub fn effective_log_format(&self, configured: ConfigLogFormat) -> LogFormat {
        self.log_format.unwrap_or_else(|| configured.into())
    }
}

// =============================================================================
// Tests
// =============================================================================
