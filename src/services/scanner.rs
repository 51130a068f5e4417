//! Download tree construction.
//!
//! Walks one download's directory tree and builds the in-memory node tree
//! the classifier operates on. Every node carries its path and media
//! metadata from the moment it is created; only the classification is filled
//! in later, by the tree classifier.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::services::classifier::Role;
use crate::services::filename_parser::{self, MediaInfo};
use crate::services::path_info::{self, FormatType, PathInfo};

/// One filesystem entry of a download.
///
/// Children own their subtrees; there is no parent back-reference. Whether a
/// node is the traversal root is known from context wherever it matters.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub original_path: PathBuf,
    pub path_info: PathInfo,
    pub media_info: MediaInfo,
    pub children: Vec<Node>,
    pub classification: Role,
}

impl Node {
    fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            original_path: path.to_path_buf(),
            path_info: path_info::probe(path),
            media_info: filename_parser::parse(&name),
            children: Vec::new(),
            classification: Role::Unknown,
        }
    }
}

/// Build the node tree rooted at `path`.
///
/// Children are listed files first, then directories, each group sorted by
/// name. Files whose format is unrecognized never become nodes: they carry
/// no classifiable content and must not show up in the classifier's child
/// counts.
pub fn build_tree(path: &Path) -> Result<Node> {
    ensure!(path.exists(), "download path does not exist: {}", path.display());
    let mut root = Node::from_path(path);
    if root.path_info.is_dir {
        root.children = build_children(path)?;
    }
    Ok(root)
}

fn build_children(dir: &Path) -> Result<Vec<Node>> {
    let mut file_paths = Vec::new();
    let mut dir_paths = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dir_paths.push(path);
        } else {
            file_paths.push(path);
        }
    }
    file_paths.sort();
    dir_paths.sort();

    let mut children = Vec::new();
    for path in file_paths {
        let child = Node::from_path(&path);
        if child.path_info.format_type == FormatType::Unknown {
            debug!(path = %path.display(), "skipping file with unrecognized format");
            continue;
        }
        children.push(child);
    }
    for path in dir_paths {
        let mut child = Node::from_path(&path);
        child.children = build_children(&path)?;
        children.push(child);
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_build_tree_orders_files_before_directories() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("Movie.Title.2020");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("subs")).unwrap();
        touch(&root.join("Movie.Title.2020.mkv"));
        touch(&root.join("subs").join("eng.srt"));

        let tree = build_tree(&root).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children[0].path_info.is_file);
        assert!(tree.children[1].path_info.is_dir);
        assert_eq!(tree.children[1].children.len(), 1);
    }

    #[test]
    fn test_build_tree_skips_unrecognized_files() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("Movie.Title.2020");
        fs::create_dir(&root).unwrap();
        touch(&root.join("Movie.Title.2020.mkv"));
        touch(&root.join("notes.txt"));
        touch(&root.join("theme.mp3"));

        let tree = build_tree(&root).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].path_info.format_type, FormatType::Video);
    }

    #[test]
    fn test_build_tree_missing_path_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(build_tree(&temp.path().join("gone")).is_err());
    }

    #[test]
    fn test_nodes_carry_parsed_metadata() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Show.Name.S01E01.mkv");
        touch(&path);

        let tree = build_tree(&path).unwrap();
        assert!(tree.path_info.is_file);
        assert_eq!(tree.media_info.title.as_deref(), Some("SHOW.NAME"));
        assert_eq!(tree.media_info.season, Some(1));
        assert_eq!(tree.classification, Role::Unknown);
    }
}
