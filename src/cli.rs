// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `cycledag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cycledag",
    version,
    about = "Assemble a cyclic forecast suite definition for an external workflow scheduler.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Cycledag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Cycledag.toml")]
    pub config: String,

    /// Where to write the suite definition.
    ///
    /// Default: `<suite name>.def` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    /// Suite name; overrides `general.case`.
    #[arg(long, value_name = "NAME")]
    pub suite_name: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CYCLEDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse, validate and assemble, print a summary, but write nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
