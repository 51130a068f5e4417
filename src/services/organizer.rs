//! Library organization for classified downloads.
//!
//! Three stages over a classified tree:
//! - validation: the downstream contract that every node is labeled and the
//!   root carries a root-worthy role;
//! - planning: canonical destination paths for every node, derived from the
//!   classification plus the parsed metadata;
//! - staging: creating directories and copying files under the staging area,
//!   or just logging the actions in dry-run mode.
//!
//! Planning is pure; only [`Organizer::stage`] and [`Organizer::quarantine`]
//! touch the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info, warn};

use crate::services::classifier::Role;
use crate::services::filename_parser::{canonical_words, MediaInfo};
use crate::services::scanner::Node;

/// One planned filesystem action. `dest` is relative to the staging root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub is_dir: bool,
}

/// Validate the downstream contract on a classified tree: no node may be
/// Unknown, and child-only roles (subtitles, extras) may not label the root
/// itself. Failures are logged; the caller quarantines the download.
pub fn validate(root: &Node) -> bool {
    validate_node(root, true)
}

fn validate_node(node: &Node, is_root: bool) -> bool {
    if node.classification == Role::Unknown {
        error!(path = %node.original_path.display(), "node has unknown classification");
        return false;
    }
    if is_root && node.classification.is_child_only() {
        error!(
            path = %node.original_path.display(),
            role = %node.classification,
            "role is not valid for the root of a download"
        );
        return false;
    }
    node.children.iter().all(|child| validate_node(child, false))
}

/// Plan destination paths for a validated tree.
///
/// Directories come before their contents in the returned list, so staging
/// can simply apply it in order.
pub fn plan(root: &Node) -> Result<Vec<PlannedEntry>> {
    let mut entries = Vec::new();
    plan_node(root, Path::new(""), &mut entries)?;
    Ok(entries)
}

fn plan_node(node: &Node, parent_dest: &Path, entries: &mut Vec<PlannedEntry>) -> Result<()> {
    match node.classification {
        Role::SeriesFolder => {
            let dest = push_dir(node, parent_dest, folder_name(&node.media_info), entries);
            require_child(node, Role::SeasonFolder)?;
            for child in &node.children {
                match child.classification {
                    Role::SeasonFolder | Role::SubtitleFolder | Role::ExtrasFolder => {
                        plan_node(child, &dest, entries)?
                    }
                    other => bail_unexpected(node, child, other)?,
                }
            }
        }
        Role::SeasonFolder => {
            let dest = push_dir(node, parent_dest, node.media_info.formatted_season(), entries);
            require_child(node, Role::EpisodeFile)?;
            for child in &node.children {
                match child.classification {
                    Role::EpisodeFile
                    | Role::SubtitleFile
                    | Role::SubtitleFolder
                    | Role::ExtrasFolder => plan_node(child, &dest, entries)?,
                    other => bail_unexpected(node, child, other)?,
                }
            }
        }
        Role::MovieFolder => {
            let dest = push_dir(node, parent_dest, folder_name(&node.media_info), entries);
            require_child(node, Role::MovieFile)?;
            for child in &node.children {
                match child.classification {
                    Role::MovieFile
                    | Role::SubtitleFile
                    | Role::SubtitleFolder
                    | Role::ExtrasFolder => plan_node(child, &dest, entries)?,
                    other => bail_unexpected(node, child, other)?,
                }
            }
        }
        Role::SubtitleFolder => {
            let dest = push_dir(node, parent_dest, "Subtitles".to_string(), entries);
            require_child(node, Role::SubtitleFile)?;
            for child in &node.children {
                match child.classification {
                    Role::SubtitleFile => plan_node(child, &dest, entries)?,
                    other => bail_unexpected(node, child, other)?,
                }
            }
        }
        Role::ExtrasFolder => {
            let dest = push_dir(node, parent_dest, "Extras".to_string(), entries);
            for child in &node.children {
                match child.classification {
                    Role::ExtrasFile
                    | Role::SubtitleFile
                    | Role::SubtitleFolder
                    | Role::SeasonFolder => plan_node(child, &dest, entries)?,
                    other => bail_unexpected(node, child, other)?,
                }
            }
        }
        Role::MovieFile | Role::EpisodeFile => {
            push_file(node, parent_dest, media_file_name(node), entries);
        }
        Role::SubtitleFile => {
            push_file(node, parent_dest, subtitle_file_name(node), entries);
        }
        Role::ExtrasFile => {
            push_file(node, parent_dest, plain_file_name(node), entries);
        }
        Role::Unknown => {
            bail!(
                "cannot plan unclassified node: {}",
                node.original_path.display()
            );
        }
    }
    Ok(())
}

fn push_dir(
    node: &Node,
    parent_dest: &Path,
    name: String,
    entries: &mut Vec<PlannedEntry>,
) -> PathBuf {
    let dest = parent_dest.join(name);
    debug!(
        source = %node.original_path.display(),
        dest = %dest.display(),
        role = %node.classification,
        "planned directory"
    );
    entries.push(PlannedEntry {
        source: node.original_path.clone(),
        dest: dest.clone(),
        is_dir: true,
    });
    dest
}

fn push_file(node: &Node, parent_dest: &Path, name: String, entries: &mut Vec<PlannedEntry>) {
    let dest = parent_dest.join(name);
    debug!(
        source = %node.original_path.display(),
        dest = %dest.display(),
        role = %node.classification,
        "planned file"
    );
    entries.push(PlannedEntry {
        source: node.original_path.clone(),
        dest,
        is_dir: false,
    });
}

fn require_child(node: &Node, role: Role) -> Result<()> {
    if node.children.iter().any(|child| child.classification == role) {
        Ok(())
    } else {
        bail!(
            "{} is missing its required {} child: {}",
            node.classification,
            role,
            node.original_path.display()
        )
    }
}

fn bail_unexpected(parent: &Node, child: &Node, role: Role) -> Result<()> {
    bail!(
        "unexpected {} under {}: {}",
        role,
        parent.classification,
        child.original_path.display()
    )
}

/// "Formatted.Title.2020", or "UNKNOWN" when no title was parsed (validation
/// should have rejected that tree already).
fn folder_name(info: &MediaInfo) -> String {
    if info.title.is_none() {
        return "UNKNOWN".to_string();
    }
    let title = info.formatted_title();
    match info.year {
        Some(year) => format!("{title}.{year}"),
        None => title,
    }
}

/// Canonical movie/episode file name: formatted title, year, combined
/// season/episode tag, then the quality descriptors that were parsed, with
/// the original extension lowercased.
fn media_file_name(node: &Node) -> String {
    let info = &node.media_info;
    let mut parts: Vec<String> = Vec::new();
    let title = info.formatted_title();
    if !title.is_empty() {
        parts.push(title);
    }
    if let Some(year) = info.year {
        parts.push(year.to_string());
    }
    if info.season.is_some() || info.episode.is_some() {
        parts.push(format!(
            "{}{}",
            info.formatted_season(),
            info.formatted_episode()
        ));
    }
    for field in [&info.resolution, &info.codec, &info.source, &info.audio] {
        if let Some(value) = field {
            parts.push(value.clone());
        }
    }
    format!("{}.{}", parts.join("."), extension_of(node))
}

/// Subtitles are named for their language when one was parsed, otherwise
/// they keep their (canonicalized) original stem.
fn subtitle_file_name(node: &Node) -> String {
    match &node.media_info.language {
        Some(language) => format!("{}.{}", canonical_words(language), extension_of(node)),
        None => plain_file_name(node),
    }
}

fn plain_file_name(node: &Node) -> String {
    let stem = node
        .original_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.{}", canonical_words(&stem), extension_of(node))
}

fn extension_of(node: &Node) -> String {
    node.path_info.extension.to_lowercase()
}

/// Applies plans to the staging area and moves broken downloads aside.
pub struct Organizer {
    staging_dir: PathBuf,
    error_dir: PathBuf,
    dry_run: bool,
}

impl Organizer {
    pub fn new(staging_dir: PathBuf, error_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            staging_dir,
            error_dir,
            dry_run,
        }
    }

    /// Apply a plan under the staging root. Colliding file names get an
    /// `_N` suffix instead of overwriting whatever is already staged.
    pub fn stage(&self, entries: &[PlannedEntry]) -> Result<()> {
        for entry in entries {
            let dest = self.staging_dir.join(&entry.dest);
            if entry.is_dir {
                if self.dry_run {
                    info!(dest = %dest.display(), "[dry run] would create directory");
                    continue;
                }
                fs::create_dir_all(&dest)
                    .with_context(|| format!("creating directory {}", dest.display()))?;
                info!(dest = %dest.display(), "created directory");
            } else {
                if self.dry_run {
                    info!(
                        source = %entry.source.display(),
                        dest = %dest.display(),
                        "[dry run] would copy file"
                    );
                    continue;
                }
                let dest = unique_path(dest)?;
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating directory {}", parent.display()))?;
                }
                fs::copy(&entry.source, &dest).with_context(|| {
                    format!(
                        "copying {} to {}",
                        entry.source.display(),
                        dest.display()
                    )
                })?;
                info!(
                    source = %entry.source.display(),
                    dest = %dest.display(),
                    "copied file"
                );
            }
        }
        Ok(())
    }

    /// Move an unprocessable download into the error area for manual review.
    pub fn quarantine(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "download".into());
        let dest = self.error_dir.join(name);
        if self.dry_run {
            info!(
                source = %path.display(),
                dest = %dest.display(),
                "[dry run] would quarantine"
            );
            return Ok(());
        }
        fs::create_dir_all(&self.error_dir)
            .with_context(|| format!("creating directory {}", self.error_dir.display()))?;
        let dest = unique_path(dest)?;
        fs::rename(path, &dest).with_context(|| {
            format!("quarantining {} to {}", path.display(), dest.display())
        })?;
        warn!(
            source = %path.display(),
            dest = %dest.display(),
            "moved download to error directory"
        );
        Ok(())
    }
}

/// First free variant of `path`, trying `stem_1`, `stem_2`, ... up to a
/// bounded number of attempts.
fn unique_path(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path);
    }
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    for counter in 1..1000 {
        let candidate = parent.join(format!("{stem}_{counter}{suffix}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    bail!("could not find a unique path for {}", path.display())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::services::filename_parser;
    use crate::services::path_info::{self, FormatType, PathInfo};
    use crate::services::tokens::tokenize;

    fn file_node(name: &str, classification: Role) -> Node {
        let (format_type, extension) = path_info::classify_name(&tokenize(name));
        Node {
            original_path: PathBuf::from(name),
            path_info: PathInfo {
                is_dir: false,
                is_file: true,
                format_type,
                extension,
            },
            media_info: filename_parser::parse(name),
            children: Vec::new(),
            classification,
        }
    }

    fn dir_node(name: &str, classification: Role, children: Vec<Node>) -> Node {
        Node {
            original_path: PathBuf::from(name),
            path_info: PathInfo {
                is_dir: true,
                is_file: false,
                format_type: FormatType::Unknown,
                extension: String::new(),
            },
            media_info: filename_parser::parse(name),
            children,
            classification,
        }
    }

    #[test]
    fn test_validate_rejects_unknown_nodes() {
        let root = dir_node(
            "Movie.Title.2020",
            Role::MovieFolder,
            vec![file_node("junk.mkv", Role::Unknown)],
        );
        assert!(!validate(&root));
    }

    #[test]
    fn test_validate_rejects_child_only_root() {
        let root = dir_node(
            "subs",
            Role::SubtitleFolder,
            vec![file_node("eng.srt", Role::SubtitleFile)],
        );
        assert!(!validate(&root));
        let nested = dir_node(
            "Movie.Title.2020",
            Role::MovieFolder,
            vec![
                file_node("Movie.Title.2020.mkv", Role::MovieFile),
                root,
            ],
        );
        assert!(validate(&nested));
    }

    #[test]
    fn test_plan_movie_folder_names() {
        let root = dir_node(
            "Movie.Title.2020",
            Role::MovieFolder,
            vec![
                file_node("Movie.Title.2020.1080p.BluRay.x264.mkv", Role::MovieFile),
                dir_node(
                    "subs",
                    Role::SubtitleFolder,
                    vec![file_node("eng.srt", Role::SubtitleFile)],
                ),
            ],
        );
        let entries = plan(&root).unwrap();
        let dests: Vec<&Path> = entries.iter().map(|e| e.dest.as_path()).collect();
        assert_eq!(
            dests,
            vec![
                Path::new("Movie.Title.2020"),
                Path::new("Movie.Title.2020/Movie.Title.2020.1080p.x264.BluRay.mkv"),
                Path::new("Movie.Title.2020/Subtitles"),
                Path::new("Movie.Title.2020/Subtitles/English.srt"),
            ]
        );
    }

    #[test]
    fn test_plan_series_names() {
        let root = dir_node(
            "Show.Name",
            Role::SeriesFolder,
            vec![dir_node(
                "Season.01",
                Role::SeasonFolder,
                vec![file_node("Show.Name.S01E01.mkv", Role::EpisodeFile)],
            )],
        );
        let entries = plan(&root).unwrap();
        let dests: Vec<&Path> = entries.iter().map(|e| e.dest.as_path()).collect();
        assert_eq!(
            dests,
            vec![
                Path::new("Show.Name"),
                Path::new("Show.Name/S01"),
                Path::new("Show.Name/S01/Show.Name.S01E001.mkv"),
            ]
        );
    }

    #[test]
    fn test_plan_requires_movie_file_in_movie_folder() {
        let root = dir_node(
            "Movie.Title.2020",
            Role::MovieFolder,
            vec![dir_node(
                "subs",
                Role::SubtitleFolder,
                vec![file_node("eng.srt", Role::SubtitleFile)],
            )],
        );
        assert!(plan(&root).is_err());
    }

    #[test]
    fn test_plan_rejects_unexpected_child() {
        let root = dir_node(
            "subs",
            Role::SubtitleFolder,
            vec![
                file_node("eng.srt", Role::SubtitleFile),
                file_node("odd.mkv", Role::MovieFile),
            ],
        );
        assert!(plan(&root).is_err());
    }

    #[test]
    fn test_subtitle_without_language_keeps_stem() {
        let node = file_node("commentary.track.srt", Role::SubtitleFile);
        // No language token in the name; the canonicalized stem is kept.
        assert!(node.media_info.language.is_none());
        assert_eq!(subtitle_file_name(&node), "Commentary.Track.srt");
    }

    #[test]
    fn test_bare_movie_file_plan() {
        let root = file_node("Some.Movie.2021.720p.mkv", Role::MovieFile);
        let entries = plan(&root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].dest,
            PathBuf::from("Some.Movie.2021.720p.mkv")
        );
    }
}
