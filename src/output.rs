//! Output formatting and styling.
//!
//! Centralized interface for all CLI output: colored status messages, the
//! progress bar shown while a scan processes files, and the run summary
//! block. The engine itself never prints; it returns a [`RunSummary`] and
//! this module renders it.

use crate::report::RunSummary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

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

    /// Creates a progress bar for file processing.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the summary block for a finished run.
    pub fn print_summary(summary: &RunSummary) {
        let rule = "=".repeat(50);
        println!("\n{}", rule);
        println!("{}", "TASK SUMMARY".bold().cyan());
        println!("{}", rule);
        println!(
            "  {:<24} {}",
            "Files scanned",
            summary.files_scanned.to_string().green()
        );
        println!(
            "  {:<24} {}",
            "Folders created",
            summary.folders_created.to_string().yellow()
        );
        println!(
            "  {:<24} {}",
            "Files moved",
            summary.files_moved.to_string().blue()
        );
        println!(
            "  {:<24} {}",
            "Folders deleted (empty)",
            summary.folders_deleted.to_string().red()
        );

        if summary.has_errors() {
            println!(
                "  {:<24} {}",
                "Errors",
                summary.errors.len().to_string().magenta()
            );
            for record in &summary.errors {
                Self::error(&format!("{}: {}", record.path.display(), record.reason));
            }
        }

        println!("{}", rule);
        if summary.completed && !summary.has_errors() {
            Self::success("Task completed successfully!");
        } else if summary.completed {
            Self::warning("Task completed with errors; see the list above.");
        }
    }
}
