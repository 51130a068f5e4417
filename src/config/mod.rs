//! Application configuration management

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Completed-download directory watched for new content
    pub downloads_path: PathBuf,

    /// Working directory holding the staging and error areas
    pub manager_path: PathBuf,

    /// Media library root the staged content is destined for
    pub media_path: PathBuf,

    /// Log planned actions without touching the filesystem
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Dry run is the default: moving someone's library around should be
        // opted into explicitly.
        let dry_run = env::var("TORRENT_MANAGER_DRY_RUN")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            downloads_path: env::var("TORRENT_DOWNLOAD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/downloads")),

            manager_path: env::var("TORRENT_MANAGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/manager")),

            media_path: env::var("MEDIA_SERVER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/media")),

            dry_run,
        })
    }

    /// Staging area for successfully organized downloads
    pub fn staging_path(&self) -> PathBuf {
        self.manager_path.join("staging")
    }

    /// Quarantine area for downloads that failed processing
    pub fn error_path(&self) -> PathBuf {
        self.manager_path.join("error")
    }
}
