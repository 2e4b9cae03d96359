//! Extension-based file categorization.
//!
//! Every category has a folder under each fragment bucket. The mapping from
//! extensions to categories is a fixed table: extension lists are paired
//! positionally with the category labels in [`Category::MAPPED`].
//!
//! # Examples
//!
//! ```
//! use fragsort::file_category::{Category, CategoryMapping};
//!
//! let mapping = CategoryMapping::default();
//! assert_eq!(mapping.categorize(".jpg"), Category::Image);
//! assert_eq!(mapping.categorize(".mp3"), Category::Audio);
//! assert_eq!(mapping.categorize(".xyz"), Category::Other);
//! ```

use std::collections::HashMap;
use std::fmt;

/// A category folder that files can be sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Image,
    Audio,
    Video,
    Text,
    Documentation,
    /// Fallback for extensions missing from the mapping.
    Other,
}

impl Category {
    /// Categories that own extensions, in provisioning order. `Other` is not
    /// part of this list but is always provisioned next to them.
    pub const MAPPED: [Category; 5] = [
        Category::Image,
        Category::Audio,
        Category::Video,
        Category::Text,
        Category::Documentation,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragsort::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "Image");
    /// assert_eq!(Category::Documentation.dir_name(), "Documentation");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "Image",
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Text => "Text",
            Category::Documentation => "Documentation",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

const IMAGE_EXTENSIONS: &[&str] = &[
    ".bmp", ".gif", ".jpeg", ".jpg", ".png", ".svg", ".tif", ".tiff", ".webp", ".emf",
];
const AUDIO_EXTENSIONS: &[&str] = &[".aac", ".mp3", ".oga", ".wav", ".weba"];
const VIDEO_EXTENSIONS: &[&str] = &[".avi", ".mpeg", ".mp4", ".ogv", ".webm", ".3gp", ".3g2"];
const TEXT_EXTENSIONS: &[&str] = &[".txt"];
const DOCUMENTATION_EXTENSIONS: &[&str] = &[".doc", ".docx", ".pdf", ".djvu"];

/// Extension lists in the same order as [`Category::MAPPED`].
const EXTENSION_TABLE: [&[&str]; 5] = [
    IMAGE_EXTENSIONS,
    AUDIO_EXTENSIONS,
    VIDEO_EXTENSIONS,
    TEXT_EXTENSIONS,
    DOCUMENTATION_EXTENSIONS,
];

/// Maps file extensions (with the leading dot) to categories.
///
/// Lookups are exact: `.JPG` is not `.jpg`.
#[derive(Debug, Clone)]
pub struct CategoryMapping {
    extension_map: HashMap<String, Category>,
}

impl CategoryMapping {
    /// Creates an empty mapping. Every lookup falls back to `Other`.
    pub fn empty() -> Self {
        Self {
            extension_map: HashMap::new(),
        }
    }

    /// Builds the mapping from the built-in extension table.
    pub fn new() -> Self {
        let mut mapping = Self::empty();
        for (category, extensions) in Category::MAPPED.iter().zip(EXTENSION_TABLE) {
            for ext in extensions {
                mapping.add_extension_mapping(ext, *category);
            }
        }
        mapping
    }

    /// Adds an extension to category mapping, replacing any earlier entry.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_string(), category);
    }

    /// Looks up an extension without falling back.
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(ext).copied()
    }

    /// Returns the category for an extension, or `Other` when unmapped.
    pub fn categorize(&self, ext: &str) -> Category {
        self.extension_to_category(ext).unwrap_or(Category::Other)
    }

    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        Self::new()
    }
}
