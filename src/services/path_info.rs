//! Filesystem-entry facts: file/directory status and name-derived format.
//!
//! Whether an entry is a file or a directory comes from the filesystem; what
//! kind of content it holds comes from the name alone, by tail-matching the
//! extension tables. The two are independent on purpose: a directory named
//! like a video file keeps its directory status, and the tail check is what
//! keeps a mid-name "mkv" token from being taken for an extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::services::patterns::{AUDIO_EXTENSIONS, SUBTITLE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::services::tokens::tokenize;

/// Content family derived from a name's trailing extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatType {
    Video,
    Subtitle,
    #[default]
    Unknown,
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormatType::Video => "VIDEO",
            FormatType::Subtitle => "SUBTITLE",
            FormatType::Unknown => "UNKNOWN",
        };
        write!(f, "{label}")
    }
}

/// Filesystem facts for one entry.
///
/// `format_type` other than [`FormatType::Unknown`] implies the entry is a
/// file with a non-empty `extension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathInfo {
    pub is_dir: bool,
    pub is_file: bool,
    pub format_type: FormatType,
    pub extension: String,
}

/// Probe a filesystem entry. A path that exists as neither file nor
/// directory (dangling link, permission hole) reports both flags false; the
/// classifier treats that as fatal when it is the traversal root.
///
/// Only real files carry a format: a directory named like a video file is
/// still just a directory.
pub fn probe(path: &Path) -> PathInfo {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (format_type, extension) = classify_name(&tokenize(&name));
    let is_file = path.is_file();
    PathInfo {
        is_dir: path.is_dir(),
        is_file,
        format_type: if is_file { format_type } else { FormatType::Unknown },
        extension,
    }
}

/// Derive content family and extension from a token sequence alone.
///
/// Video is checked before subtitle at every position. Audio extensions are
/// recognized for the extension field but audio handling is disabled, so
/// their format stays Unknown and the tree builder drops those files.
pub fn classify_name(tokens: &[String]) -> (FormatType, String) {
    for index in 0..tokens.len() {
        for pattern in VIDEO_EXTENSIONS.iter() {
            if let Some(found) = pattern.match_tail(tokens, index) {
                return (FormatType::Video, found.text);
            }
        }
        for pattern in SUBTITLE_EXTENSIONS.iter() {
            if let Some(found) = pattern.match_tail(tokens, index) {
                return (FormatType::Subtitle, found.text);
            }
        }
        for pattern in AUDIO_EXTENSIONS.iter() {
            if let Some(found) = pattern.match_tail(tokens, index) {
                return (FormatType::Unknown, found.text);
            }
        }
    }
    (FormatType::Unknown, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> (FormatType, String) {
        classify_name(&tokenize(name))
    }

    #[test]
    fn test_video_extension() {
        assert_eq!(
            classify("Movie.Title.2020.mkv"),
            (FormatType::Video, "MKV".to_string())
        );
        assert_eq!(classify("clip.webm").0, FormatType::Video);
    }

    #[test]
    fn test_subtitle_extension() {
        assert_eq!(
            classify("Movie.eng.srt"),
            (FormatType::Subtitle, "SRT".to_string())
        );
    }

    #[test]
    fn test_audio_extension_keeps_format_unknown() {
        let (format_type, extension) = classify("theme.flac");
        assert_eq!(format_type, FormatType::Unknown);
        assert_eq!(extension, "FLAC");
    }

    #[test]
    fn test_extension_token_mid_name_is_not_an_extension() {
        assert_eq!(classify("MKV.Movie.2020"), (FormatType::Unknown, String::new()));
    }

    #[test]
    fn test_plain_folder_name() {
        assert_eq!(classify("Season.01"), (FormatType::Unknown, String::new()));
        assert_eq!(classify(""), (FormatType::Unknown, String::new()));
    }
}
