//! Regular-expression search and replace over arbitrary text.
//!
//! Every call compiles its pattern afresh and keeps no state between calls,
//! so the functions here are safe to call from anywhere.
//!
//! The dialect is the one of the `regex` crate:
//! - leftmost-first, non-overlapping matches scanned left to right
//! - no look-around and no backreferences inside patterns
//! - `$1`, `${1}` and `${name}` group references in replacements
//!
//! # Example
//!
//! ```
//! use textdesk::pattern::{find_matches, replace_all};
//!
//! let found = find_matches(r"\d+", "a12b345").unwrap();
//! assert_eq!(found, vec!["12", "345"]);
//!
//! let replaced = replace_all(r"\d+", "#", "a12b345").unwrap();
//! assert_eq!(replaced, "a#b#");
//! ```

mod matcher;

pub use matcher::{
    count_matches, find_match_spans, find_matches, replace_all, Match, MatcherConfig,
    PatternMatcher,
};
