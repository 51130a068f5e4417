//! Release-name metadata extraction.
//!
//! Parses file and folder names like:
//! - "Movie.Title.2020.1080p.BluRay.x264.mkv"
//! - "Show Name S01E05 720p WEB x265"
//! - "Season.02", "Extras", "eng.srt"
//!
//! All scanning runs over the sanitized token sequence (see
//! [`tokens`](crate::services::tokens)) with an outer left-to-right pass over
//! token positions and an inner pass over the relevant table, so the first
//! table entry matching at the earliest position always wins.

use std::fmt;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::patterns::{
    AUDIO_EXTENSIONS, AUDIO_PATTERNS, CODEC_PATTERNS, EPISODE_PATTERNS, EXTRAS_PATTERNS,
    LANGUAGE_PATTERNS, RESOLUTION_PATTERNS, SEASON_PATTERNS, SOURCE_PATTERNS,
    SUBTITLE_EXTENSIONS, VIDEO_EXTENSIONS,
};
use crate::services::tokens::{sanitize_name, tokenize, TokenPattern};

/// Structured metadata parsed from one file or folder name.
///
/// The numeric `season`/`episode` fields are a refinement of the
/// corresponding pattern flags: a number is only ever captured when the flag
/// is set, while a capture-less indicator (a bare "Season" folder) sets the
/// flag alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,

    pub resolution: Option<String>,
    pub codec: Option<String>,
    pub source: Option<String>,
    pub audio: Option<String>,
    pub language: Option<String>,

    pub has_season_pattern: bool,
    pub has_episode_pattern: bool,
    pub has_extras_pattern: bool,
}

impl MediaInfo {
    /// Title with each word capitalized, dot-joined: "MY.TITLE" -> "My.Title".
    /// Empty string when no title was parsed.
    pub fn formatted_title(&self) -> String {
        match &self.title {
            Some(title) => canonical_words(title),
            None => String::new(),
        }
    }

    /// Zero-padded season tag: "S01", or "S??" when unknown.
    pub fn formatted_season(&self) -> String {
        match self.season {
            Some(season) => format!("S{season:02}"),
            None => "S??".to_string(),
        }
    }

    /// Zero-padded episode tag: "E001", or "E???" when unknown.
    pub fn formatted_episode(&self) -> String {
        match self.episode {
            Some(episode) => format!("E{episode:03}"),
            None => "E???".to_string(),
        }
    }
}

impl fmt::Display for MediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(season) = self.season {
            parts.push(season.to_string());
        }
        if let Some(episode) = self.episode {
            parts.push(episode.to_string());
        }
        for field in [&self.resolution, &self.codec, &self.source, &self.audio] {
            if let Some(value) = field {
                parts.push(value.clone());
            }
        }
        write!(f, "{}", parts.join("."))
    }
}

/// Sanitize a raw name and capitalize each resulting word: "my title!" ->
/// "My.Title". Used for titles and for canonical names the organizer builds.
pub fn canonical_words(raw: &str) -> String {
    sanitize_name(raw)
        .split('.')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(".")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Parse one path component into structured media metadata.
pub fn parse(name: &str) -> MediaInfo {
    parse_tokens(&tokenize(name))
}

/// Parse an already-tokenized name.
pub fn parse_tokens(tokens: &[String]) -> MediaInfo {
    let stem = stem_tokens(tokens);
    let (has_season_pattern, season) = scan_numbered(tokens, &SEASON_PATTERNS);
    let (has_episode_pattern, episode) = scan_numbered(tokens, &EPISODE_PATTERNS);
    let (has_extras_pattern, _) = scan_numbered(tokens, &EXTRAS_PATTERNS);
    let (title, year) = extract_title_year(stem);

    let info = MediaInfo {
        title,
        year,
        season,
        episode,
        resolution: scan_labeled(tokens, &RESOLUTION_PATTERNS),
        codec: scan_labeled(tokens, &CODEC_PATTERNS),
        source: scan_labeled(tokens, &SOURCE_PATTERNS),
        audio: scan_labeled(tokens, &AUDIO_PATTERNS),
        language: scan_labeled(tokens, &LANGUAGE_PATTERNS),
        has_season_pattern,
        has_episode_pattern,
        has_extras_pattern,
    };
    debug!(
        title = ?info.title,
        year = ?info.year,
        season = ?info.season,
        episode = ?info.episode,
        "parsed release name"
    );
    info
}

/// The token sequence with a trailing extension match removed, so extension
/// noise never pollutes title accumulation.
fn stem_tokens(tokens: &[String]) -> &[String] {
    for index in 0..tokens.len() {
        let tables = [&*VIDEO_EXTENSIONS, &*SUBTITLE_EXTENSIONS, &*AUDIO_EXTENSIONS];
        for table in tables {
            if table.iter().any(|p| p.match_tail(tokens, index).is_some()) {
                return &tokens[..index];
            }
        }
    }
    tokens
}

/// First match wins across the whole sequence; returns the "pattern seen"
/// flag and the captured number, when the winning pattern had one.
fn scan_numbered(tokens: &[String], table: &[TokenPattern]) -> (bool, Option<u32>) {
    for index in 0..tokens.len() {
        for pattern in table {
            if let Some(found) = pattern.match_at(tokens, index) {
                return (true, found.number);
            }
        }
    }
    (false, None)
}

/// First matching label wins across the whole sequence.
fn scan_labeled(
    tokens: &[String],
    table: &[(&'static str, Vec<TokenPattern>)],
) -> Option<String> {
    for index in 0..tokens.len() {
        for (label, patterns) in table {
            if patterns.iter().any(|p| p.match_at(tokens, index).is_some()) {
                return Some((*label).to_string());
            }
        }
    }
    None
}

fn is_quality_descriptor(tokens: &[String], index: usize) -> bool {
    let tables = [
        &*RESOLUTION_PATTERNS,
        &*CODEC_PATTERNS,
        &*SOURCE_PATTERNS,
        &*AUDIO_PATTERNS,
    ];
    tables.iter().any(|table| {
        table
            .iter()
            .any(|(_, patterns)| patterns.iter().any(|p| p.match_at(tokens, index).is_some()))
    })
}

/// A terminator position ends title accumulation: any quality descriptor,
/// season or episode indicator, or running out of tokens.
fn is_terminator(tokens: &[String], index: usize) -> bool {
    index >= tokens.len()
        || is_quality_descriptor(tokens, index)
        || SEASON_PATTERNS.iter().any(|p| p.match_at(tokens, index).is_some())
        || EPISODE_PATTERNS.iter().any(|p| p.match_at(tokens, index).is_some())
}

/// Syntactically valid release year: all digits, 1901 through the current
/// calendar year.
fn parse_year(token: &str) -> Option<i32> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i32 = token.parse().ok()?;
    (1901..=Utc::now().year()).contains(&value).then_some(value)
}

/// Walk the stem tokens accumulating the title, with the year look-ahead
/// rule: a valid year immediately followed by a terminator (or by nothing)
/// ends the title and is recorded; a year followed by ordinary tokens is
/// just another title word.
fn extract_title_year(stem: &[String]) -> (Option<String>, Option<i32>) {
    let mut accumulated: Vec<&str> = Vec::new();
    let mut year = None;

    for index in 0..stem.len() {
        let token = &stem[index];
        if let Some(value) = parse_year(token) {
            if is_terminator(stem, index + 1) {
                year = Some(value);
                break;
            }
            accumulated.push(token);
            continue;
        }
        if is_terminator(stem, index) {
            break;
        }
        accumulated.push(token);
    }

    let title = if accumulated.is_empty() {
        None
    } else {
        Some(accumulated.join("."))
    };
    (title, year)
}
