//! Recursive download-tree classification.
//!
//! Top-down over a parsed tree: a directory's role is decided from its own
//! metadata plus counts over its direct children, that role dictates how its
//! direct file children are labeled, and every child directory is then
//! visited the same way. Nothing is ever re-classified; one pass labels the
//! whole tree.
//!
//! Unmatched nodes degrade to [`Role::Unknown`] and the walk continues; the
//! organizer's validation decides what an Unknown means for the download.
//! Only two conditions are fatal and abort the run: a root the filesystem
//! reports as neither file nor directory, and a bare subtitle file as the
//! whole download.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::path_info::FormatType;
use crate::services::scanner::Node;

/// Semantic role assigned to every node of a download tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SeriesFolder,
    SeasonFolder,
    MovieFolder,
    SubtitleFolder,
    ExtrasFolder,

    MovieFile,
    EpisodeFile,
    SubtitleFile,
    ExtrasFile,

    #[default]
    Unknown,
}

impl Role {
    /// Roles that are only valid below the root of a download tree.
    pub fn is_child_only(self) -> bool {
        matches!(
            self,
            Role::SubtitleFolder | Role::ExtrasFolder | Role::SubtitleFile | Role::ExtrasFile
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::SeriesFolder => "SERIES_FOLDER",
            Role::SeasonFolder => "SEASON_FOLDER",
            Role::MovieFolder => "MOVIE_FOLDER",
            Role::SubtitleFolder => "SUBTITLE_FOLDER",
            Role::ExtrasFolder => "EXTRAS_FOLDER",
            Role::MovieFile => "MOVIE_FILE",
            Role::EpisodeFile => "EPISODE_FILE",
            Role::SubtitleFile => "SUBTITLE_FILE",
            Role::ExtrasFile => "EXTRAS_FILE",
            Role::Unknown => "UNKNOWN",
        };
        write!(f, "{label}")
    }
}

/// Fatal classification failures. Either one aborts the run for the whole
/// tree; the manager quarantines the download.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The entry exists as neither file nor directory (dangling link,
    /// unreadable entry): the tree handed to us does not describe real,
    /// classifiable content.
    #[error("node is neither a file nor a directory: {}", .0.display())]
    NotFileOrDirectory(PathBuf),

    /// A download consisting of a single subtitle file has nothing to attach
    /// the subtitle to.
    #[error("subtitle file is not valid top-level content: {}", .0.display())]
    TopLevelSubtitle(PathBuf),
}

/// Classify every node in the tree rooted at `root`.
pub fn classify_tree(root: &mut Node) -> Result<(), ClassifyError> {
    if root.path_info.is_dir {
        classify_dir(root);
        Ok(())
    } else if root.path_info.is_file {
        classify_root_file(root)
    } else {
        Err(ClassifyError::NotFileOrDirectory(root.original_path.clone()))
    }
}

/// A bare file as the whole download: decide from its own metadata.
fn classify_root_file(node: &mut Node) -> Result<(), ClassifyError> {
    let is_video = is_video_file(node);
    let has_title = node.media_info.title.is_some();
    let is_episode = node.media_info.has_season_pattern || node.media_info.has_episode_pattern;

    if is_video && has_title && is_episode {
        node.classification = Role::EpisodeFile;
    } else if is_video && has_title {
        node.classification = Role::MovieFile;
    } else if is_subtitle_file(node) {
        return Err(ClassifyError::TopLevelSubtitle(node.original_path.clone()));
    } else {
        warn!(path = %node.original_path.display(), "top-level file matched no rule");
    }
    debug!(path = %node.original_path.display(), role = %node.classification, "classified file");
    Ok(())
}

/// Directory rules, most specific first. After the directory's own role is
/// set, its direct file children are labeled under that role, then each
/// child directory is classified on its own.
fn classify_dir(node: &mut Node) {
    let role = if is_series_dir(node) {
        Role::SeriesFolder
    } else if is_season_dir(node) {
        Role::SeasonFolder
    } else if is_subtitle_dir(node) {
        Role::SubtitleFolder
    } else if is_extras_dir(node) {
        Role::ExtrasFolder
    } else if is_movie_dir(node) {
        Role::MovieFolder
    } else {
        Role::Unknown
    };
    node.classification = role;
    debug!(path = %node.original_path.display(), role = %role, "classified directory");

    for child in &mut node.children {
        if child.path_info.is_file {
            child.classification = file_role_under(role, child);
        }
    }
    for child in &mut node.children {
        if child.path_info.is_dir {
            classify_dir(child);
        }
    }
}

/// Role a direct file child takes under a parent with `parent_role`.
fn file_role_under(parent_role: Role, child: &Node) -> Role {
    match parent_role {
        // A series folder holds season folders; any loose file is flagged
        // for review rather than guessed at.
        Role::SeriesFolder => Role::Unknown,
        Role::SeasonFolder => {
            if is_video_file(child) {
                Role::EpisodeFile
            } else if is_subtitle_file(child) {
                Role::SubtitleFile
            } else {
                Role::Unknown
            }
        }
        Role::SubtitleFolder => {
            if is_subtitle_file(child) {
                Role::SubtitleFile
            } else {
                Role::Unknown
            }
        }
        Role::ExtrasFolder => {
            if is_video_file(child) {
                Role::ExtrasFile
            } else if is_subtitle_file(child) {
                Role::SubtitleFile
            } else {
                Role::Unknown
            }
        }
        Role::MovieFolder => {
            if is_video_file(child) {
                Role::MovieFile
            } else if is_subtitle_file(child) {
                Role::SubtitleFile
            } else {
                Role::Unknown
            }
        }
        Role::Unknown
        | Role::MovieFile
        | Role::EpisodeFile
        | Role::SubtitleFile
        | Role::ExtrasFile => child.classification,
    }
}

pub(crate) fn is_video_file(node: &Node) -> bool {
    node.path_info.is_file && node.path_info.format_type == FormatType::Video
}

pub(crate) fn is_subtitle_file(node: &Node) -> bool {
    node.path_info.is_file && node.path_info.format_type == FormatType::Subtitle
}

fn video_file_count(children: &[Node]) -> usize {
    children.iter().filter(|child| is_video_file(child)).count()
}

fn subtitle_file_count(children: &[Node]) -> usize {
    children.iter().filter(|child| is_subtitle_file(child)).count()
}

/// Directories among `children` that independently satisfy the season-folder
/// predicate. A predicate call, not an assignment: the child is actually
/// labeled later, when the recursion reaches it.
fn season_dir_count(children: &[Node]) -> usize {
    children.iter().filter(|child| is_season_dir(child)).count()
}

fn is_series_dir(node: &Node) -> bool {
    node.path_info.is_dir
        && node.media_info.title.is_some()
        && video_file_count(&node.children) == 0
        && subtitle_file_count(&node.children) == 0
        && season_dir_count(&node.children) >= 1
}

fn is_season_dir(node: &Node) -> bool {
    node.path_info.is_dir
        && (node.media_info.has_season_pattern || node.media_info.season.is_some())
        && node.media_info.episode.is_none()
        && video_file_count(&node.children) >= 1
}

fn is_subtitle_dir(node: &Node) -> bool {
    node.path_info.is_dir
        && video_file_count(&node.children) == 0
        && subtitle_file_count(&node.children) >= 1
}

fn is_extras_dir(node: &Node) -> bool {
    node.path_info.is_dir
        && node.media_info.has_extras_pattern
        && video_file_count(&node.children) >= 1
}

fn is_movie_dir(node: &Node) -> bool {
    node.path_info.is_dir
        && node.media_info.title.is_some()
        && video_file_count(&node.children) == 1
        && season_dir_count(&node.children) == 0
}
