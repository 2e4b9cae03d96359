//! Command-line interface module for fragsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Loading settings and installing the log file
//! - Provisioning the destination tree, then sorting files into it
//! - Dry runs that only report where files would go

use crate::config::{ConfigError, Settings};
use crate::file_category::{Category, CategoryMapping};
use crate::file_organizer::{FileSorter, OrganizeError, SortReport};
use crate::logging::{self, Journal, LoggingError};
use crate::output::OutputFormatter;
use crate::provisioner::{self, ProvisionReport};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort files into per-fragment, per-category folders.
#[derive(Debug, Parser)]
#[command(name = "fragsort", version, about)]
pub struct Cli {
    /// Settings file. Defaults to ./setting.toml, then
    /// ~/.config/fragsort/setting.toml.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show where files would go without creating or moving anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCommand {
    /// Provision the tree and move files.
    Sort {
        /// If true, report placements without making changes.
        dry_run: bool,
    },
}

impl From<&Cli> for SortCommand {
    fn from(cli: &Cli) -> Self {
        SortCommand::Sort {
            dry_run: cli.dry_run,
        }
    }
}

/// Any failure that ends a run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Loads settings, installs the log file if enabled, and runs `command`.
pub fn run_cli(command: SortCommand, config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = Settings::load(config_path)?;
    if settings.customize.logging {
        logging::init_file_logging(&settings.customize.log_file)?;
    }
    run_with_settings(command, &settings)
}

/// Runs `command` with settings that are already loaded.
///
/// Nothing on disk changes until both roots have been validated.
pub fn run_with_settings(command: SortCommand, settings: &Settings) -> Result<(), CliError> {
    let journal = Journal::new(settings.customize.logging);
    settings.validate_directories(&journal)?;

    if !settings.main_setting.extensions.is_empty() {
        journal.debug(format_args!(
            "Ignoring configured extensions {:?}; the built-in table decides categories",
            settings.main_setting.extensions
        ));
    }

    let sorter = FileSorter::new(
        settings.destination(),
        settings.fragments().to_vec(),
        CategoryMapping::default(),
    )
    .associative(settings.customize.associative)
    .with_journal(journal);

    match command {
        SortCommand::Sort { dry_run: true } => dry_run(&sorter, settings),
        SortCommand::Sort { dry_run: false } => {
            let provisioned = provision_tree(settings, &journal)?;
            OutputFormatter::info(&format!(
                "Destination ready: {} created, {} already present",
                provisioned.created.len(),
                provisioned.existing.len()
            ));
            let report = sort_files(&sorter, settings.source())?;
            OutputFormatter::summary_table(&report);
            OutputFormatter::success("Sorting complete");
            Ok(())
        }
    }
}

/// Creates every bucket, and its category folders when they are enabled.
pub fn provision_tree(settings: &Settings, journal: &Journal) -> Result<ProvisionReport, OrganizeError> {
    if settings.customize.associative {
        provisioner::provision(
            settings.destination(),
            settings.fragments(),
            &Category::MAPPED,
            journal,
        )
    } else {
        provisioner::provision_buckets(settings.destination(), settings.fragments(), journal)
    }
}

fn sort_files(sorter: &FileSorter, source: &Path) -> Result<SortReport, OrganizeError> {
    OutputFormatter::info(&format!("Sorting contents of: {}", source.display()));
    let spinner = OutputFormatter::create_spinner();

    let result = sorter.run_with(source, |record| {
        spinner.set_message(record.placement.display_name());
        spinner.inc(1);
    });

    spinner.finish_and_clear();
    result
}

fn dry_run(sorter: &FileSorter, settings: &Settings) -> Result<(), CliError> {
    OutputFormatter::info(&format!(
        "DRY RUN: Analyzing contents of: {}",
        settings.source().display()
    ));

    let plan = sorter.plan(settings.source())?;
    if plan.is_empty() {
        OutputFormatter::warning("No files match the configured name fragments.");
        return Ok(());
    }

    for (_, placement) in &plan {
        OutputFormatter::dry_run_line(placement, settings.destination());
    }
    OutputFormatter::success(&format!(
        "Dry run complete. {} file(s) would move. Nothing was modified.",
        plan.len()
    ));
    Ok(())
}
