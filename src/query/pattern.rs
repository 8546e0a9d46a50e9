//! Wildcard patterns
//!
//! `*` matches any (possibly empty) run of characters; every other
//! character, `.` included, matches itself. Matching is anchored at both
//! ends and case-insensitive.

use regex::{Regex, RegexBuilder};

use crate::error::{RepoError, Result};

/// A wildcard pattern compiled to an anchored regex
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Wildcard character
    pub const WILDCARD: char = '*';

    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern
            .split(Self::WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = RegexBuilder::new(&format!("^{}$", body))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| RepoError::Query(format!("bad pattern {:?}: {}", pattern, e)))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as supplied
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains a wildcard
    pub fn has_wildcard(&self) -> bool {
        self.source.contains(Self::WILDCARD)
    }

    /// Match the whole of `text`, ignoring case
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for WildcardPattern {}
