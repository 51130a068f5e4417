//! Curator - torrent download classifier and library organizer
//!
//! Scans the completed-downloads directory, classifies every download's
//! contents and stages them for the media library. `--classify <path>`
//! labels a single tree and prints it as JSON instead of organizing.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curator::cli::CliOptions;
use curator::config::Config;
use curator::services::{classifier, scanner, TorrentManager};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let options = CliOptions::from_args();

    let mut config = Config::from_env()?;
    if let Some(dry_run) = options.dry_run_override {
        config.dry_run = dry_run;
    }
    if let Some(path) = options.downloads_override {
        config.downloads_path = path;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(target) = options.classify_target {
        let mut tree = scanner::build_tree(&target)?;
        classifier::classify_tree(&mut tree)?;
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    tracing::info!("Starting Curator");
    let manager = TorrentManager::new(config);
    let stats = manager.process_downloads()?;
    if options.json_stats {
        println!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}
