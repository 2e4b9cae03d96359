//! Console output for the command-line front end.
//!
//! Colored status lines, the spinner shown while files move, and the summary
//! table printed at the end of a run. Log file output is separate; see
//! [`crate::logging`].

use crate::file_organizer::{Placement, SortReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a spinner that counts moved files.
    pub fn create_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} moved {msg}") {
            spinner.set_style(style);
        }
        spinner
    }

    /// Prints a dry-run line for one planned move.
    pub fn dry_run_line(placement: &Placement, destination: &Path) {
        println!(
            "{} {} → {}",
            "[DRY RUN]".yellow(),
            placement.display_name(),
            placement.target_dir(destination).display()
        );
    }

    /// Prints a table of moved files per destination folder.
    pub fn summary_table(report: &SortReport) {
        Self::header(&format!(
            "SUMMARY ({})",
            report.started_at.format("%Y-%m-%d %H:%M:%S")
        ));

        let counts = folder_counts(report.moved.iter().map(|record| &record.placement));
        let width = counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6);

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for (folder, count) in &counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Moved".bold(),
            report.moved.len().to_string().green().bold(),
            plural(report.moved.len()),
            width = width
        );
        println!(
            "{:<width$} | {} {}",
            "Skipped".bold(),
            report.unmatched.len(),
            plural(report.unmatched.len()),
            width = width
        );
    }
}

/// Counts placements per `fragment/Category` folder, sorted by folder name.
pub fn folder_counts<'a>(placements: impl Iterator<Item = &'a Placement>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for placement in placements {
        let folder = match placement.category {
            Some(category) => format!("{}/{}", placement.fragment, category),
            None => placement.fragment.clone(),
        };
        *counts.entry(folder).or_insert(0) += 1;
    }
    counts
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;

    fn placement(fragment: &str, category: Option<Category>) -> Placement {
        Placement {
            fragment: fragment.to_string(),
            category,
            file_name: "x".into(),
        }
    }

    #[test]
    fn test_folder_counts_groups_by_bucket_and_category() {
        let placements = [
            placement("photo", Some(Category::Image)),
            placement("photo", Some(Category::Image)),
            placement("photo", Some(Category::Other)),
            placement("invoice", None),
        ];

        let counts = folder_counts(placements.iter());

        assert_eq!(counts.get("photo/Image"), Some(&2));
        assert_eq!(counts.get("photo/Other"), Some(&1));
        assert_eq!(counts.get("invoice"), Some(&1));
        assert_eq!(counts.keys().next().map(String::as_str), Some("invoice"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "file");
        assert_eq!(plural(0), "files");
        assert_eq!(plural(3), "files");
    }
}
