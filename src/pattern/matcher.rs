//! Pattern matcher backed by the `regex` engine.

use crate::error::{DeskError, Result};
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default limit on the compiled size of a pattern (bytes).
const DEFAULT_SIZE_LIMIT: usize = 10 * 1024 * 1024;

/// Matcher configuration.
#[derive(Clone, Debug)]
pub struct MatcherConfig {
    /// Match letters regardless of case.
    pub case_insensitive: bool,

    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,

    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,

    /// Whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,

    /// Insert the replacement verbatim, without expanding `$` group references.
    pub literal_replacement: bool,

    /// Upper bound on compiled pattern size. Larger patterns are rejected
    /// as invalid.
    /// Default: 10MB
    pub size_limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            literal_replacement: false,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// A single match located in a subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    pub text: String,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<regex::Match<'_>> for Match {
    fn from(m: regex::Match<'_>) -> Self {
        Self {
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
        }
    }
}

/// Applies user-supplied patterns to user-supplied text.
#[derive(Clone, Debug, Default)]
pub struct PatternMatcher {
    config: MatcherConfig,
}

impl PatternMatcher {
    /// Create a matcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with a custom configuration.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Every non-overlapping match of `pattern` in `subject`, left to right.
    ///
    /// Returns an empty vector when the pattern is valid but matches nothing.
    pub fn find_matches(&self, pattern: &str, subject: &str) -> Result<Vec<String>> {
        let re = self.compile(pattern)?;
        Ok(re
            .find_iter(subject)
            .map(|m| m.as_str().to_string())
            .collect())
    }

    /// Like [`find_matches`](Self::find_matches), keeping byte offsets.
    pub fn find_match_spans(&self, pattern: &str, subject: &str) -> Result<Vec<Match>> {
        let re = self.compile(pattern)?;
        Ok(re.find_iter(subject).map(Match::from).collect())
    }

    /// Number of non-overlapping matches.
    pub fn count_matches(&self, pattern: &str, subject: &str) -> Result<usize> {
        let re = self.compile(pattern)?;
        Ok(re.find_iter(subject).count())
    }

    /// Replace every non-overlapping match of `pattern` in `subject`.
    ///
    /// Group references in `replacement` are expanded unless the matcher is
    /// configured for literal replacement. The output is not re-scanned.
    pub fn replace_all(&self, pattern: &str, replacement: &str, subject: &str) -> Result<String> {
        let re = self.compile(pattern)?;
        let replaced = if self.config.literal_replacement {
            re.replace_all(subject, NoExpand(replacement))
        } else {
            re.replace_all(subject, replacement)
        };
        Ok(replaced.into_owned())
    }

    fn compile(&self, pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.config.case_insensitive)
            .multi_line(self.config.multi_line)
            .dot_matches_new_line(self.config.dot_matches_new_line)
            .ignore_whitespace(self.config.ignore_whitespace)
            .size_limit(self.config.size_limit)
            .build()
            .map_err(|e| {
                debug!(pattern, error = %e, "pattern rejected");
                DeskError::from(e)
            })
    }
}

/// [`PatternMatcher::find_matches`] with the default configuration.
pub fn find_matches(pattern: &str, subject: &str) -> Result<Vec<String>> {
    PatternMatcher::new().find_matches(pattern, subject)
}

/// [`PatternMatcher::find_match_spans`] with the default configuration.
pub fn find_match_spans(pattern: &str, subject: &str) -> Result<Vec<Match>> {
    PatternMatcher::new().find_match_spans(pattern, subject)
}

/// [`PatternMatcher::count_matches`] with the default configuration.
pub fn count_matches(pattern: &str, subject: &str) -> Result<usize> {
    PatternMatcher::new().count_matches(pattern, subject)
}

/// [`PatternMatcher::replace_all`] with the default configuration.
pub fn replace_all(pattern: &str, replacement: &str, subject: &str) -> Result<String> {
    PatternMatcher::new().replace_all(pattern, replacement, subject)
}
