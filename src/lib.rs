//! fragsort - sort files into folders by name fragment and file type
//!
//! Files whose name contains one of the configured fragments are moved into a
//! bucket named after the first matching fragment, then into a category folder
//! chosen from their extension. The destination tree is provisioned up front
//! and settings come from a TOML file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod provisioner;

pub use config::{ConfigError, Settings};
pub use file_category::{Category, CategoryMapping};
pub use file_organizer::{FileSorter, OrganizeError, Placement, SortReport};
pub use logging::Journal;
pub use provisioner::{ProvisionReport, provision};

pub use cli::{Cli, CliError, SortCommand, run_cli};
