//! Per-run orchestration over the downloads directory.
//!
//! Every entry at the top of the downloads directory is one download and is
//! pushed through the full pipeline independently: build tree → classify →
//! validate → plan → stage. A download that fails any stage is quarantined
//! and the run moves on to the next one; one broken torrent never blocks the
//! rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use tracing::{error, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::services::classifier;
use crate::services::organizer::{self, Organizer};
use crate::services::scanner;

/// Totals for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub processed: usize,
    pub failed_validation: usize,
    pub failed_processing: usize,
    pub skipped: usize,
}

/// Drives the classify-and-stage pipeline for completed downloads.
pub struct TorrentManager {
    config: Config,
    organizer: Organizer,
}

impl TorrentManager {
    pub fn new(config: Config) -> Self {
        let organizer = Organizer::new(
            config.staging_path(),
            config.error_path(),
            config.dry_run,
        );
        Self { config, organizer }
    }

    /// Process every download currently in the downloads directory.
    pub fn process_downloads(&self) -> Result<ProcessStats> {
        ensure!(
            self.config.downloads_path.is_dir(),
            "downloads path does not exist: {}",
            self.config.downloads_path.display()
        );
        info!(
            downloads = %self.config.downloads_path.display(),
            staging = %self.config.staging_path().display(),
            media = %self.config.media_path.display(),
            dry_run = self.config.dry_run,
            "starting download processing"
        );
        if !self.config.dry_run {
            fs::create_dir_all(self.config.staging_path())
                .context("creating staging directory")?;
            fs::create_dir_all(self.config.error_path())
                .context("creating error directory")?;
        }

        let (dirs, files) = self.list_downloads()?;
        if dirs.is_empty() && files.is_empty() {
            info!("no downloads found to process");
        }

        let mut stats = ProcessStats::default();
        for path in dirs.iter().chain(files.iter()) {
            self.process_download(path, &mut stats);
        }

        info!(
            processed = stats.processed,
            failed_validation = stats.failed_validation,
            failed_processing = stats.failed_processing,
            skipped = stats.skipped,
            "processing complete"
        );
        Ok(stats)
    }

    /// Top-level entries of the downloads directory, directories first.
    fn list_downloads(&self) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.config.downloads_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.context("reading downloads directory")?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            } else {
                files.push(entry.into_path());
            }
        }
        Ok((dirs, files))
    }

    fn process_download(&self, path: &Path, stats: &mut ProcessStats) {
        info!(path = %path.display(), "processing download");

        let mut tree = match scanner::build_tree(path) {
            Ok(tree) => tree,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to build download tree");
                self.quarantine(path);
                stats.skipped += 1;
                return;
            }
        };

        if let Err(e) = classifier::classify_tree(&mut tree) {
            error!(path = %path.display(), error = %e, "classification failed");
            self.quarantine(path);
            stats.skipped += 1;
            return;
        }

        if !organizer::validate(&tree) {
            error!(path = %path.display(), "validation failed");
            self.quarantine(path);
            stats.failed_validation += 1;
            return;
        }

        let entries = match organizer::plan(&tree) {
            Ok(entries) => entries,
            Err(e) => {
                error!(path = %path.display(), error = %e, "destination planning failed");
                self.quarantine(path);
                stats.failed_processing += 1;
                return;
            }
        };

        if let Err(e) = self.organizer.stage(&entries) {
            error!(path = %path.display(), error = %e, "staging failed");
            self.quarantine(path);
            stats.failed_processing += 1;
            return;
        }

        stats.processed += 1;
        info!(path = %path.display(), "download staged");
    }

    fn quarantine(&self, path: &Path) {
        if let Err(e) = self.organizer.quarantine(path) {
            error!(path = %path.display(), error = %e, "failed to quarantine download");
        }
    }
}
