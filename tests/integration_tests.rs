use fragsort::cli::{SortCommand, run_with_settings};
use fragsort::config::{ConfigError, Settings};
use fragsort::file_category::{Category, CategoryMapping};
use fragsort::file_organizer::FileSorter;
use fragsort::logging::Journal;
use fragsort::provisioner::provision;
use fragsort::CliError;
/// Integration tests for fragsort
///
/// These tests run whole sorting passes against temporary source and
/// destination directories.
///
/// Test categories:
/// 1. Provisioning the destination tree
/// 2. Sorting by fragment and category
/// 3. Configuration driven runs
/// 4. Edge cases and error scenarios
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A source and a destination directory with helpers for building files and
/// checking where they end up.
struct TestFixture {
    source: TempDir,
    destination: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        TestFixture {
            source: TempDir::new().expect("Failed to create source directory"),
            destination: TempDir::new().expect("Failed to create destination directory"),
        }
    }

    fn source(&self) -> &Path {
        self.source.path()
    }

    fn destination(&self) -> &Path {
        self.destination.path()
    }

    /// Create a file with content in the source directory.
    fn create_file(&self, name: &str, content: &str) {
        let mut file = File::create(self.source().join(name)).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name);
        }
    }

    fn create_subdir(&self, name: &str) -> PathBuf {
        let path = self.source().join(name);
        fs::create_dir(&path).expect("Failed to create subdirectory");
        path
    }

    /// Settings pointing at this fixture.
    fn settings(&self, fragments: &str, associative: bool) -> Settings {
        format!(
            "[main_setting]\nmove_from = '{}'\nmove_to = '{}'\nname_fragment = \"{}\"\n\n[customize]\nassociative = {}\n",
            self.source().display(),
            self.destination().display(),
            fragments,
            associative
        )
        .parse()
        .expect("Fixture settings should parse")
    }

    fn sort(&self, fragments: &str) {
        run_with_settings(
            SortCommand::Sort { dry_run: false },
            &self.settings(fragments, true),
        )
        .expect("Sorting should succeed");
    }

    fn assert_sorted(&self, rel_path: &str) {
        let path = self.destination().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_in_source(&self, name: &str) {
        let path = self.source().join(name);
        assert!(path.is_file(), "File should remain: {}", path.display());
    }

    fn assert_not_in_source(&self, name: &str) {
        let path = self.source().join(name);
        assert!(!path.exists(), "File should have moved: {}", path.display());
    }

    /// All files under the destination, relative to it, sorted.
    fn destination_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        Self::walk_dir(self.destination(), self.destination(), &mut files);
        files.sort();
        files
    }

    fn walk_dir(root: &Path, dir: &Path, files: &mut Vec<String>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let relative = path.strip_prefix(root).expect("path under root");
                    files.push(relative.to_string_lossy().replace('\\', "/"));
                } else if path.is_dir() {
                    Self::walk_dir(root, &path, files);
                }
            }
        }
    }
}

// ============================================================================
// Test Suite 1: Provisioning
// ============================================================================

#[test]
fn test_provisioned_tree_layout() {
    let fixture = TestFixture::new();
    fixture.sort("invoice, photo");

    for bucket in ["invoice", "photo"] {
        for folder in ["Image", "Audio", "Video", "Text", "Documentation", "Other"] {
            let path = fixture.destination().join(bucket).join(folder);
            assert!(path.is_dir(), "Directory should exist: {}", path.display());
        }
    }
}

#[test]
fn test_sorting_twice_is_harmless() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo1.jpg"]);
    fixture.sort("photo");

    fixture.create_files(&["photo2.jpg"]);
    fixture.sort("photo");

    assert_eq!(
        fixture.destination_files(),
        vec!["photo/Image/photo1.jpg", "photo/Image/photo2.jpg"]
    );
}

#[test]
fn test_flat_layout_skips_category_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo1.jpg", "photo2.xyz"]);

    run_with_settings(
        SortCommand::Sort { dry_run: false },
        &fixture.settings("photo", false),
    )
    .unwrap();

    assert_eq!(
        fixture.destination_files(),
        vec!["photo/photo1.jpg", "photo/photo2.xyz"]
    );
    assert!(!fixture.destination().join("photo/Other").exists());
}

// ============================================================================
// Test Suite 2: Sorting
// ============================================================================

#[test]
fn test_single_photo_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo1.jpg"]);

    fixture.sort("photo");

    fixture.assert_sorted("photo/Image/photo1.jpg");
    fixture.assert_not_in_source("photo1.jpg");
}

#[test]
fn test_unmatched_files_stay_untouched() {
    let fixture = TestFixture::new();
    fixture.create_file("holiday.jpg", "original content");

    fixture.sort("photo");

    fixture.assert_in_source("holiday.jpg");
    assert_eq!(
        fs::read_to_string(fixture.source().join("holiday.jpg")).unwrap(),
        "original content"
    );
    assert!(fixture.destination_files().is_empty());
}

#[test]
fn test_first_configured_fragment_wins() {
    let fixture = TestFixture::new();
    fixture.create_files(&["reportfinal_v2.pdf"]);

    fixture.sort("report, reportfinal");

    fixture.assert_sorted("report/Documentation/reportfinal_v2.pdf");
    assert!(
        fixture
            .destination()
            .join("reportfinal/Documentation")
            .read_dir()
            .unwrap()
            .next()
            .is_none()
    );
}

#[test]
fn test_categories_by_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "trip.jpg",
        "trip.mp3",
        "trip.mp4",
        "trip.txt",
        "trip.docx",
        "trip.xyz",
        "trip",
        "trip2.JPG",
    ]);

    fixture.sort("trip");

    assert_eq!(
        fixture.destination_files(),
        vec![
            "trip/Audio/trip.mp3",
            "trip/Documentation/trip.docx",
            "trip/Image/trip.jpg",
            "trip/Other/trip",
            "trip/Other/trip.xyz",
            "trip/Other/trip2.JPG",
            "trip/Text/trip.txt",
            "trip/Video/trip.mp4",
        ]
    );
}

#[test]
fn test_mixed_fragments() {
    let fixture = TestFixture::new();
    fixture.create_files(&["invoice_march.pdf", "photo_beach.png", "readme.md"]);

    fixture.sort("invoice, photo");

    fixture.assert_sorted("invoice/Documentation/invoice_march.pdf");
    fixture.assert_sorted("photo/Image/photo_beach.png");
    fixture.assert_in_source("readme.md");
}

#[test]
fn test_subdirectories_are_ignored() {
    let fixture = TestFixture::new();
    let nested = fixture.create_subdir("nested");
    fs::write(nested.join("photo_inside.jpg"), "x").unwrap();
    let matching_dir = fixture.create_subdir("photo_album");

    fixture.sort("photo");

    assert!(nested.join("photo_inside.jpg").is_file());
    assert!(matching_dir.is_dir());
    assert!(fixture.destination_files().is_empty());
}

#[test]
fn test_hidden_file_stem_includes_leading_dot() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".photo"]);

    fixture.sort("photo");

    fixture.assert_sorted("photo/Other/.photo");
}

// ============================================================================
// Test Suite 3: Configuration driven runs
// ============================================================================

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo1.jpg"]);

    run_with_settings(
        SortCommand::Sort { dry_run: true },
        &fixture.settings("photo", true),
    )
    .unwrap();

    fixture.assert_in_source("photo1.jpg");
    assert!(!fixture.destination().join("photo").exists());
}

#[test]
fn test_run_from_settings_file() {
    let fixture = TestFixture::new();
    fixture.create_files(&["scan_photo.tiff"]);
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("setting.toml");
    fs::write(
        &config_path,
        format!(
            "[main_setting]\nmove_from = '{}'\nmove_to = '{}'\nname_fragment = [\"photo\"]\nextensions = \".tiff\"\n\n[customize]\nassociative = 1\nlogging = 0\n",
            fixture.source().display(),
            fixture.destination().display()
        ),
    )
    .unwrap();

    let settings = Settings::load(Some(&config_path)).unwrap();
    run_with_settings(SortCommand::Sort { dry_run: false }, &settings).unwrap();

    fixture.assert_sorted("photo/Image/scan_photo.tiff");
}

// ============================================================================
// Test Suite 4: Errors
// ============================================================================

#[test]
fn test_missing_input_directory_aborts_before_changes() {
    let fixture = TestFixture::new();
    let mut settings = fixture.settings("photo", true);
    settings.main_setting.move_from = fixture.source().join("gone");

    let result = run_with_settings(SortCommand::Sort { dry_run: false }, &settings);

    assert!(matches!(
        result,
        Err(CliError::Config(ConfigError::MissingDirectory { .. }))
    ));
    assert!(!fixture.destination().join("photo").exists());
}

#[test]
fn test_missing_output_directory_is_reported() {
    let fixture = TestFixture::new();
    let mut settings = fixture.settings("photo", true);
    settings.main_setting.move_to = fixture.destination().join("gone");

    let err = run_with_settings(SortCommand::Sort { dry_run: false }, &settings).unwrap_err();

    assert!(err.to_string().contains("Missing output directory"));
}

#[test]
fn test_move_without_provisioning_fails() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo1.jpg"]);

    let sorter = FileSorter::new(
        fixture.destination(),
        vec!["photo".to_string()],
        CategoryMapping::default(),
    );

    assert!(sorter.run(fixture.source()).is_err());
    fixture.assert_in_source("photo1.jpg");
}

#[test]
fn test_collision_stops_the_run() {
    let fixture = TestFixture::new();
    let fragments = vec!["photo".to_string()];
    provision(
        fixture.destination(),
        &fragments,
        &Category::MAPPED,
        &Journal::disabled(),
    )
    .unwrap();
    fs::write(fixture.destination().join("photo/Image/photo1.jpg"), "old").unwrap();
    fixture.create_files(&["photo1.jpg"]);

    let result = run_with_settings(
        SortCommand::Sort { dry_run: false },
        &fixture.settings("photo", true),
    );

    assert!(matches!(result, Err(CliError::Organize(_))));
    fixture.assert_in_source("photo1.jpg");
    assert_eq!(
        fs::read_to_string(fixture.destination().join("photo/Image/photo1.jpg")).unwrap(),
        "old"
    );
}
