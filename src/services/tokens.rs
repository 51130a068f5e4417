//! Release-name tokenization and token-sequence pattern matching.
//!
//! Download clients hand us names in every shape imaginable:
//! "Show S01E01 1080p", "show.s01e01.1080p", "Show_S01E01-[group]".
//! Everything downstream (metadata extraction, format detection, tree
//! classification) operates on a normalized token sequence instead of the
//! raw name, so the pattern tables only ever have to describe one shape.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9]+").unwrap());

/// Normalize a single path component into dot-separated uppercase form.
///
/// Quote characters are deleted outright; every other run of
/// non-alphanumeric characters collapses to a single `.`. A name consisting
/// entirely of special characters sanitizes to the empty string.
pub fn sanitize_name(name: &str) -> String {
    let upper = name.trim_end().to_uppercase().replace(['\'', '"'], "");
    let dotted = NON_ALPHANUMERIC.replace_all(&upper, ".");
    dotted.trim_matches('.').to_string()
}

/// Split a name into its ordered token sequence.
pub fn tokenize(name: &str) -> Vec<String> {
    let sanitized = sanitize_name(name);
    if sanitized.is_empty() {
        return Vec::new();
    }
    sanitized.split('.').map(str::to_string).collect()
}

/// One compiled table pattern, possibly spanning several tokens.
///
/// Patterns are written against the sanitized form, so a literal dot in the
/// pattern source (`X\.265`) stands for the boundary between two tokens. The
/// token span is derived from the dots in the source, and candidates are
/// rebuilt by re-joining that many tokens before matching.
#[derive(Debug)]
pub struct TokenPattern {
    regex: Regex,
    span: usize,
}

/// Successful match of a [`TokenPattern`] against a token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// The joined token text the pattern consumed.
    pub text: String,
    /// Parsed value of capture group 1, when the pattern has one.
    pub number: Option<u32>,
}

impl TokenPattern {
    /// Compile a table pattern.
    ///
    /// Panics on an invalid pattern; table sources are static and covered by
    /// the pattern table tests, so this cannot fire at runtime.
    pub fn new(source: &str) -> Self {
        let span = source.matches('.').count() + 1;
        let regex = Regex::new(&format!("^(?:{source})$"))
            .unwrap_or_else(|e| panic!("invalid token pattern {source:?}: {e}"));
        Self { regex, span }
    }

    /// Number of tokens this pattern consumes.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Match this pattern against the tokens starting at `index`.
    ///
    /// Tokens `index..index + span` are re-joined with `.` and the pattern
    /// must consume the joined string in full. Fewer remaining tokens than
    /// the span simply fail the match.
    pub fn match_at(&self, tokens: &[String], index: usize) -> Option<TokenMatch> {
        if index >= tokens.len() {
            return None;
        }
        let end = (index + self.span).min(tokens.len());
        let joined = tokens[index..end].join(".");
        let captures = self.regex.captures(&joined)?;
        let number = captures.get(1).and_then(|group| group.as_str().parse().ok());
        Some(TokenMatch {
            text: joined,
            number,
        })
    }

    /// Tail-only matching: the pattern must consume every remaining token.
    ///
    /// Used exclusively for extension detection, so a token that happens to
    /// spell a known extension mid-name is not mistaken for one.
    pub fn match_tail(&self, tokens: &[String], index: usize) -> Option<TokenMatch> {
        if tokens.len().saturating_sub(index) != self.span {
            return None;
        }
        self.match_at(tokens, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_name("Movie Title (2020)"), "MOVIE.TITLE.2020");
        assert_eq!(sanitize_name("show_s01e01 [group]"), "SHOW.S01E01.GROUP");
    }

    #[test]
    fn test_sanitize_strips_quotes_and_trailing_whitespace() {
        assert_eq!(sanitize_name("It's a Movie  "), "ITS.A.MOVIE");
        assert_eq!(sanitize_name("\"Quoted\" Name"), "QUOTED.NAME");
    }

    #[test]
    fn test_sanitize_all_special_characters() {
        assert_eq!(sanitize_name("!@#$%"), "");
        assert_eq!(tokenize("..."), Vec::<String>::new());
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn test_sanitize_idempotent_over_own_output() {
        let names = ["Movie Title (2020)", "show s01e01 - 1080p", "a.b.c"];
        for name in names {
            let tokens = tokenize(name);
            let rejoined = tokens.join(".");
            assert_eq!(tokenize(&rejoined), tokens);
        }
    }

    #[test]
    fn test_match_at_single_token() {
        let pattern = TokenPattern::new(r"S(\d+)");
        let tokens = tokenize("Show.S02.1080p");
        let found = pattern.match_at(&tokens, 1).unwrap();
        assert_eq!(found.text, "S02");
        assert_eq!(found.number, Some(2));
        assert!(pattern.match_at(&tokens, 0).is_none());
    }

    #[test]
    fn test_match_at_multi_token() {
        let pattern = TokenPattern::new(r"X\.265");
        let tokens = tokenize("Movie.x.265.mkv");
        assert!(pattern.match_at(&tokens, 1).is_some());
        assert_eq!(pattern.span(), 2);
        // Whole-string matching: "X" alone at the end never satisfies it.
        assert!(pattern.match_at(&tokens, 3).is_none());
    }

    #[test]
    fn test_match_at_parses_leading_zeros() {
        let pattern = TokenPattern::new(r"EP(\d+)");
        let tokens = tokenize("Show.EP007");
        assert_eq!(pattern.match_at(&tokens, 1).unwrap().number, Some(7));
    }

    #[test]
    fn test_match_tail_only_matches_trailing_tokens() {
        let pattern = TokenPattern::new("MKV");
        let mid = tokenize("MKV.Movie.2020");
        assert!(pattern.match_tail(&mid, 0).is_none());
        let trailing = tokenize("Movie.2020.mkv");
        assert!(pattern.match_tail(&trailing, 2).is_some());
        assert!(pattern.match_tail(&trailing, 3).is_none());
    }
}
