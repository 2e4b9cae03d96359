//! Classification and placement of files into fragment buckets.
//!
//! A file is matched against the configured name fragments in order; the first
//! fragment contained in its stem picks the bucket and its extension picks the
//! category folder. Files that match no fragment stay where they are.

use crate::file_category::{Category, CategoryMapping};
use crate::logging::Journal;
use chrono::{DateTime, Local};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while provisioning folders or moving files.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// Failed to create a bucket or category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to list the source directory or one of its entries.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// A file with the same name is already at the destination.
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Splits a file name into stem and extension at the last dot.
///
/// The extension keeps its dot. Leading dots never start an extension, so
/// `.bashrc` has no extension.
///
/// # Examples
///
/// ```
/// use fragsort::file_organizer::split_name;
///
/// assert_eq!(split_name("photo1.jpg"), ("photo1", ".jpg"));
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name("README"), ("README", ""));
/// assert_eq!(split_name(".bashrc"), (".bashrc", ""));
/// ```
pub fn split_name(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(index) => name.split_at(leading_dots + index),
        None => (name, ""),
    }
}

/// Where a file belongs, relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The fragment that matched first.
    pub fragment: String,
    /// `None` when category folders are disabled.
    pub category: Option<Category>,
    /// The name exactly as found on disk.
    pub file_name: OsString,
}

impl Placement {
    /// Directory the file moves into.
    pub fn target_dir(&self, destination: &Path) -> PathBuf {
        let bucket = destination.join(&self.fragment);
        match self.category {
            Some(category) => bucket.join(category.dir_name()),
            None => bucket,
        }
    }

    /// Full path of the file after the move.
    pub fn target_path(&self, destination: &Path) -> PathBuf {
        self.target_dir(destination).join(&self.file_name)
    }

    /// The file name for display, with invalid UTF-8 replaced.
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }
}

/// A completed move.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub placement: Placement,
}

/// Outcome of one sorting pass over the source directory.
#[derive(Debug, Clone)]
pub struct SortReport {
    pub started_at: DateTime<Local>,
    pub moved: Vec<MoveRecord>,
    /// Names of regular files that matched no fragment.
    pub unmatched: Vec<String>,
}

impl SortReport {
    fn new() -> Self {
        Self {
            started_at: Local::now(),
            moved: Vec::new(),
            unmatched: Vec::new(),
        }
    }
}

/// Decides placements and moves files from a source directory into the
/// destination tree.
///
/// The sorter never creates directories; run the provisioner first.
#[derive(Debug, Clone)]
pub struct FileSorter {
    destination: PathBuf,
    fragments: Vec<String>,
    mapping: CategoryMapping,
    associative: bool,
    journal: Journal,
}

impl FileSorter {
    /// Creates a sorter that uses category folders and does not log.
    pub fn new(
        destination: impl Into<PathBuf>,
        fragments: Vec<String>,
        mapping: CategoryMapping,
    ) -> Self {
        Self {
            destination: destination.into(),
            fragments,
            mapping,
            associative: true,
            journal: Journal::disabled(),
        }
    }

    /// Sets whether files go into category folders inside their bucket.
    pub fn associative(mut self, associative: bool) -> Self {
        self.associative = associative;
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Returns the first configured fragment contained in `stem`.
    pub fn match_fragment(&self, stem: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|fragment| stem.contains(fragment.as_str()))
            .map(String::as_str)
    }

    /// Decides where a file with this name belongs, without touching disk.
    ///
    /// Matching works on the name with invalid UTF-8 replaced; the placement
    /// keeps the original name.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragsort::file_category::{Category, CategoryMapping};
    /// use fragsort::file_organizer::FileSorter;
    ///
    /// let sorter = FileSorter::new(
    ///     "/sorted",
    ///     vec!["report".to_string(), "reportfinal".to_string()],
    ///     CategoryMapping::default(),
    /// );
    /// let placement = sorter.classify("reportfinal_v2.pdf").unwrap();
    /// assert_eq!(placement.fragment, "report");
    /// assert_eq!(placement.category, Some(Category::Documentation));
    /// assert!(sorter.classify("holiday.jpg").is_none());
    /// ```
    pub fn classify(&self, file_name: impl AsRef<OsStr>) -> Option<Placement> {
        let file_name = file_name.as_ref();
        let lossy = file_name.to_string_lossy();
        let (stem, extension) = split_name(&lossy);
        let fragment = self.match_fragment(stem)?;
        let category = self
            .associative
            .then(|| self.mapping.categorize(extension));

        Some(Placement {
            fragment: fragment.to_string(),
            category,
            file_name: file_name.to_os_string(),
        })
    }

    /// Lists the placement of every matching file in `source` without moving
    /// anything.
    pub fn plan(&self, source: &Path) -> OrganizeResult<Vec<(PathBuf, Placement)>> {
        Ok(regular_files(source)?
            .into_iter()
            .filter_map(|path| {
                let placement = self.classify(path.file_name()?)?;
                Some((path, placement))
            })
            .collect())
    }

    /// Moves every matching file in `source` into the destination tree.
    ///
    /// # Errors
    ///
    /// Stops at the first failure. Files moved before it stay moved.
    pub fn run(&self, source: &Path) -> OrganizeResult<SortReport> {
        self.run_with(source, |_| {})
    }

    /// Like [`FileSorter::run`], calling `on_move` after each completed move.
    pub fn run_with<F>(&self, source: &Path, mut on_move: F) -> OrganizeResult<SortReport>
    where
        F: FnMut(&MoveRecord),
    {
        let mut report = SortReport::new();

        for path in regular_files(source)? {
            let Some(name) = path.file_name() else {
                continue;
            };
            let Some(placement) = self.classify(name) else {
                let file_name = name.to_string_lossy().into_owned();
                self.journal
                    .debug(format_args!("No fragment matches {}", file_name));
                report.unmatched.push(file_name);
                continue;
            };

            let new_path = placement.target_path(&self.destination);
            move_file(&path, &new_path)?;
            self.journal
                .info(format_args!("Moved file {}", placement.display_name()));

            let record = MoveRecord {
                original_path: path,
                new_path,
                placement,
            };
            on_move(&record);
            report.moved.push(record);
        }

        Ok(report)
    }
}

/// Regular files directly under `dir`, sorted by name. Symlinks count when
/// they point at a regular file.
fn regular_files(dir: &Path) -> OrganizeResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| OrganizeError::ReadDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| OrganizeError::ReadDirFailed {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Renames `from` to `to`, copying across filesystems when a rename cannot.
///
/// The parent of `to` must already exist and `to` itself must not.
fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    if to.exists() {
        return Err(OrganizeError::DestinationExists(to.to_path_buf()));
    }

    let failure = |source: io::Error| OrganizeError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(failure)?;
            fs::remove_file(from).map_err(failure)
        }
        Err(e) => Err(failure(e)),
    }
}
