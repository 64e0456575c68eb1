//! Destination path planning.
//!
//! Computes the directory a file belongs in, relative to the target root,
//! from its category, its last-modified time and the configured organization
//! mode. Pure path arithmetic; nothing here touches the filesystem.

use crate::config::OrganizeMode;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Plans the destination directory for a file, relative to the target root.
///
/// Date segments come from the file's last-modified time: the four-digit
/// calendar year and the three-letter month abbreviation (`Jan`, `Feb`, ...).
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use downsort::config::OrganizeMode;
/// use downsort::planner::plan;
/// use std::path::PathBuf;
///
/// let modified = Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// assert_eq!(
///     plan("Images", modified, OrganizeMode::TypeDate),
///     PathBuf::from("Images/2024/Jan")
/// );
/// ```
pub fn plan(category: &str, modified: DateTime<Local>, mode: OrganizeMode) -> PathBuf {
    let year = modified.format("%Y").to_string();
    let month = modified.format("%b").to_string();

    match mode {
        OrganizeMode::Type => PathBuf::from(category),
        OrganizeMode::TypeDate => [category, year.as_str(), month.as_str()].iter().collect(),
        OrganizeMode::DateType => [year.as_str(), month.as_str(), category].iter().collect(),
    }
}
