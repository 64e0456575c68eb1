//! Command-line interface.
//!
//! Parses flags, loads the configuration, applies the overrides, and hands
//! the result to the engine: one scan run, or a watch loop stopped by
//! Ctrl+C. Fatal setup errors come back as `Err` and turn into a non-zero
//! exit status; per-file problems only show up in the final summary.

use crate::config::{OrganizeConfig, OrganizeMode};
use crate::output::OutputFormatter;
use crate::scan::ScanRun;
use crate::watch::{WatchLoop, WatchOptions};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::PathBuf;

/// Organize a downloads folder by file type and date.
#[derive(Debug, Parser)]
#[command(name = "downsort", version, about)]
pub struct Cli {
    /// Target folder to organize (overrides the configured one)
    pub target: Option<PathBuf>,

    /// Organization scheme
    #[arg(long, value_enum)]
    pub method: Option<OrganizeMode>,

    /// Scan nested directories too
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub recursive: Option<bool>,

    /// Remove directories left empty after moves
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub delete_empty: Option<bool>,

    /// Keep running and organize new files as they appear
    #[arg(long)]
    pub watch: bool,

    /// Path to a configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Loaded configuration with this invocation's overrides applied.
    pub fn effective_config(&self) -> Result<OrganizeConfig, String> {
        let mut config = OrganizeConfig::load(self.config.as_deref())
            .map_err(|e| format!("Error loading configuration: {e}"))?;

        if let Some(target) = &self.target {
            config.target_folder = target.clone();
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(recursive) = self.recursive {
            config.recursive = recursive;
        }
        if let Some(delete_empty) = self.delete_empty {
            config.delete_empty = delete_empty;
        }
        if self.watch {
            config.watch_mode = true;
        }
        Ok(config)
    }
}

/// Runs the parsed command to completion.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = cli.effective_config()?;
    if config.watch_mode {
        watch(config)
    } else {
        organize_once(config)
    }
}

fn organize_once(config: OrganizeConfig) -> Result<(), String> {
    OutputFormatter::info(&format!(
        "Organizing contents of: {}",
        config.target_folder.display()
    ));

    let run = ScanRun::new(config).map_err(|e| e.to_string())?;

    let mut bar: Option<ProgressBar> = None;
    let summary = run.run_with(|done, total| {
        let bar = bar.get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
        bar.set_position(done as u64);
    });
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    OutputFormatter::print_summary(&summary);
    Ok(())
}

fn watch(config: OrganizeConfig) -> Result<(), String> {
    let target = config.target_folder.clone();
    let (watch_loop, handle) =
        WatchLoop::new(config, WatchOptions::default()).map_err(|e| e.to_string())?;

    ctrlc::set_handler(move || handle.shutdown())
        .map_err(|e| format!("Error installing interrupt handler: {e}"))?;

    OutputFormatter::info(&format!(
        "Watching {} — press Ctrl+C to stop.",
        target.display()
    ));
    let summary = watch_loop.run();
    OutputFormatter::print_summary(&summary);
    Ok(())
}
