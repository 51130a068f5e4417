//! Curator - torrent download classification and media library organization.
//!
//! Takes the directory tree a download client produced, parses every file
//! and folder name into structured metadata, classifies each node's role
//! (movie, episode, subtitle, extras, or the matching folder kinds), and
//! stages the content under canonical names for the media library. All of it
//! is derived from names and tree shape alone; there is no network access
//! and no database.

pub mod cli;
pub mod config;
pub mod services;
