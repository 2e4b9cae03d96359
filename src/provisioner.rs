//! Creation of the destination tree before any file is moved.
//!
//! Each fragment gets a bucket directory under the destination root. With
//! category folders on, every bucket also gets one folder per category plus
//! `Other`. Existing directories are left as they are.

use crate::file_category::Category;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::logging::Journal;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories touched while provisioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
}

impl ProvisionReport {
    fn record(&mut self, path: PathBuf, created: bool) {
        if created {
            self.created.push(path);
        } else {
            self.existing.push(path);
        }
    }
}

/// Ensures `destination/<fragment>/<category>` exists for every fragment and
/// every category in `categories`, plus `destination/<fragment>/Other`.
///
/// # Errors
///
/// Stops at the first directory that cannot be created. Directories created
/// before the failure are kept.
///
/// # Examples
///
/// ```no_run
/// use fragsort::file_category::Category;
/// use fragsort::logging::Journal;
/// use fragsort::provisioner::provision;
/// use std::path::Path;
///
/// let fragments = vec!["invoice".to_string()];
/// provision(Path::new("/sorted"), &fragments, &Category::MAPPED, &Journal::disabled())?;
/// # Ok::<(), fragsort::file_organizer::OrganizeError>(())
/// ```
pub fn provision(
    destination: &Path,
    fragments: &[String],
    categories: &[Category],
    journal: &Journal,
) -> OrganizeResult<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for fragment in fragments {
        let bucket = destination.join(fragment);
        ensure_dir(&bucket, &mut report, journal)?;

        for category in categories.iter().filter(|c| **c != Category::Other) {
            ensure_dir(&bucket.join(category.dir_name()), &mut report, journal)?;
        }
        ensure_dir(&bucket.join(Category::Other.dir_name()), &mut report, journal)?;
    }

    Ok(report)
}

/// Ensures only the bucket directories exist, for runs without category
/// folders.
pub fn provision_buckets(
    destination: &Path,
    fragments: &[String],
    journal: &Journal,
) -> OrganizeResult<ProvisionReport> {
    let mut report = ProvisionReport::default();
    for fragment in fragments {
        ensure_dir(&destination.join(fragment), &mut report, journal)?;
    }
    Ok(report)
}

fn ensure_dir(path: &Path, report: &mut ProvisionReport, journal: &Journal) -> OrganizeResult<()> {
    if path.exists() {
        journal.info(format_args!("Directory {} already exists", path.display()));
        report.record(path.to_path_buf(), false);
        return Ok(());
    }

    fs::create_dir(path).map_err(|source| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })?;
    journal.info(format_args!("Created directory {}", path.display()));
    report.record(path.to_path_buf(), true);
    Ok(())
}
