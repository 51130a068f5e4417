//! Minimal CLI parsing for runtime overrides.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub dry_run_override: Option<bool>,
    pub downloads_override: Option<PathBuf>,
    pub classify_target: Option<PathBuf>,
    pub json_stats: bool,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dry-run" => options.dry_run_override = Some(true),
                "--no-dry-run" => options.dry_run_override = Some(false),
                "--json" => options.json_stats = true,
                "--downloads" => {
                    if let Some(value) = args.next() {
                        options.downloads_override = Some(PathBuf::from(value));
                    }
                }
                "--classify" => {
                    if let Some(value) = args.next() {
                        options.classify_target = Some(PathBuf::from(value));
                    }
                }
                _ if arg.starts_with("--downloads=") => {
                    if let Some((_, value)) = arg.split_once('=') {
                        options.downloads_override = Some(PathBuf::from(value));
                    }
                }
                _ if arg.starts_with("--classify=") => {
                    if let Some((_, value)) = arg.split_once('=') {
                        options.classify_target = Some(PathBuf::from(value));
                    }
                }
                _ => {}
            }
        }
        options
    }
}
