// src/lib.rs

pub mod cli;
pub mod config;
pub mod cycle;
pub mod dag;
pub mod definition;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod suite;
pub mod types;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::dag::validate_triggers;
use crate::definition::write_definition;
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::suite::{Suite, SuiteAssembler, TaskRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - cycle enumeration and suite assembly
/// - trigger validation
/// - writing the definition (skipped with `--dry-run`)
///
/// Nothing is written unless every step succeeds.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let suite_name = args
        .suite_name
        .clone()
        .unwrap_or_else(|| cfg.suite_name().to_string());

    let registry = TaskRegistry::standard();
    let suite = build_suite(&cfg, &registry, &suite_name)?;

    if args.dry_run {
        print_dry_run(&cfg, &suite);
        return Ok(());
    }

    let output = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{suite_name}.def")));
    write_definition(&RealFileSystem, &output, &suite.tree)?;
    info!(suite = %suite_name, output = %output.display(), "suite definition ready");
    Ok(())
}

/// Assemble and validate a suite without touching the filesystem.
pub fn build_suite(cfg: &ConfigFile, registry: &TaskRegistry, suite_name: &str) -> Result<Suite> {
    let suite = SuiteAssembler::new(cfg, registry)
        .with_suite_name(suite_name)
        .build()?;
    validate_triggers(&suite.tree)?;
    Ok(suite)
}

/// Simple dry-run output: print cycles and node counts.
fn print_dry_run(cfg: &ConfigFile, suite: &Suite) {
    println!("cycledag dry-run");
    println!("  suite = {}", suite.tree.node(suite.tree.root()).name);
    println!("  start = {}", cfg.start());
    println!("  end = {}", cfg.end());
    println!("  nature scheme = {:?}", cfg.assim.nature.scheme);
    println!("  nodes = {}", suite.tree.len());
    println!(
        "  unique start hours = {:?}",
        suite
            .unique_offsets
            .iter()
            .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
            .collect::<Vec<_>>()
    );
    println!();

    println!("cycles ({}):", suite.cycles.len());
    for cycle in &suite.cycles {
        println!(
            "  - {}  fcint={}m  ll={}m",
            cycle.basetime.format("%Y-%m-%d %H:%M"),
            cycle.interval.num_minutes(),
            cycle.lead.num_minutes()
        );
    }

    debug!("dry-run complete (nothing written)");
}
