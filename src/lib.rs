//! # textdesk
//!
//! Ad-hoc regular-expression search/replace plus a small in-memory
//! key-value record store with a live, observable view.
//!
//! ## Core Concepts
//!
//! - **Patterns**: stateless find/replace over arbitrary text
//! - **Records**: key-value pairs, unique by key, kept in insertion order
//! - **Views**: live handles onto a store's records
//! - **Subscriptions**: change events pushed to bounded channels
//!
//! ## Example
//!
//! ```
//! use textdesk::{find_matches, replace_all, RecordStore};
//!
//! assert_eq!(find_matches(r"\d+", "a12b345").unwrap(), vec!["12", "345"]);
//! assert_eq!(replace_all(r"\d+", "#", "a12b345").unwrap(), "a#b#");
//!
//! let mut store = RecordStore::new();
//! let view = store.view();
//!
//! store.add_or_update("x", "1");
//! store.add_or_update("x", "2");
//! assert_eq!(view.len(), 1);
//! assert_eq!(view.get(0).unwrap().value, "2");
//!
//! store.delete("x");
//! assert!(view.is_empty());
//! ```

pub mod console;
pub mod error;
pub mod pattern;
pub mod records;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use console::{render_json, render_table, Command, Console, Reply, ViewFormat};
pub use error::{DeskError, Result};
pub use pattern::{
    count_matches, find_match_spans, find_matches, replace_all, Match, MatcherConfig,
    PatternMatcher,
};
pub use records::{RecordStore, RecordView, StoreConfig};
pub use subscriptions::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
