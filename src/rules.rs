//! Extension-to-category rules.
//!
//! Resolution is layered: custom rules from the configuration shadow the
//! built-in defaults, and anything neither layer knows lands in the fallback
//! category. Extensions are matched case-insensitively, with or without a
//! leading dot.

use std::collections::{HashMap, HashSet};

/// Category for extensions no rule covers.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Layered lookup table mapping file extensions to category names.
///
/// # Examples
///
/// ```
/// use downsort::rules::RuleTable;
/// use std::collections::HashMap;
///
/// let mut custom = HashMap::new();
/// custom.insert(".jpg".to_string(), "Photos".to_string());
///
/// let rules = RuleTable::with_custom_rules(&custom);
/// assert_eq!(rules.resolve("jpg"), "Photos");
/// assert_eq!(rules.resolve("pdf"), "Documents");
/// assert_eq!(rules.resolve("xyz"), "Others");
/// ```
#[derive(Debug, Clone)]
pub struct RuleTable {
    custom: HashMap<String, String>,
    defaults: HashMap<String, String>,
}

impl RuleTable {
    /// Builds a table with custom rules layered over the built-in defaults.
    pub fn with_custom_rules(custom_rules: &HashMap<String, String>) -> Self {
        let custom = custom_rules
            .iter()
            .map(|(ext, category)| (normalize_ext(ext), category.clone()))
            .collect();
        Self {
            custom,
            defaults: built_in_defaults(),
        }
    }

    /// Resolves an extension to its category name.
    pub fn resolve(&self, extension: &str) -> &str {
        let key = normalize_ext(extension);
        self.custom
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Every category name this table can produce, fallback included.
    pub fn category_names(&self) -> HashSet<String> {
        let mut names: HashSet<String> = self.defaults.values().cloned().collect();
        names.extend(self.custom.values().cloned());
        names.insert(FALLBACK_CATEGORY.to_string());
        names
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::with_custom_rules(&HashMap::new())
    }
}

/// Lowercases and strips a leading dot, so `".JPG"`, `"JPG"` and `"jpg"` all
/// hit the same rule.
fn normalize_ext(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

fn built_in_defaults() -> HashMap<String, String> {
    let groups: &[(&str, &[&str])] = &[
        (
            "Images",
            &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "tiff", "ico", "heic"],
        ),
        (
            "Videos",
            &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v"],
        ),
        (
            "Audio",
            &["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma"],
        ),
        (
            "Documents",
            &[
                "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "csv", "ppt", "pptx",
                "md", "epub",
            ],
        ),
        (
            "Archives",
            &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"],
        ),
        (
            "Code",
            &[
                "py", "js", "ts", "html", "css", "json", "xml", "java", "c", "cpp", "h", "rs",
                "go", "sh", "sql",
            ],
        ),
        (
            "Installers",
            &["exe", "msi", "dmg", "pkg", "deb", "rpm", "appimage"],
        ),
    ];

    let mut defaults = HashMap::new();
    for (category, extensions) in groups {
        for ext in *extensions {
            defaults.insert((*ext).to_string(), (*category).to_string());
        }
    }
    defaults
}
