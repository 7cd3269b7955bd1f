//! Live, read-only view onto a store's records.

use crate::types::{Record, Revision};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// The ordered sequence shared between a store and its views.
#[derive(Debug, Default)]
pub(crate) struct ViewState {
    /// Records in insertion order.
    pub(crate) records: Vec<Record>,
    /// Bumped on every change to `records`.
    pub(crate) revision: Revision,
}

/// Handle onto the same sequence the store mutates.
///
/// A view never needs to be re-fetched: every read goes to the current
/// contents. Cloning a view is cheap and yields another handle onto the
/// same sequence.
#[derive(Clone)]
pub struct RecordView {
    state: Arc<RwLock<ViewState>>,
}

impl RecordView {
    pub(crate) fn new(state: Arc<RwLock<ViewState>>) -> Self {
        Self { state }
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// Record at `position`, if any.
    pub fn get(&self, position: usize) -> Option<Record> {
        self.state.read().records.get(position).cloned()
    }

    /// Revision of the store as of this read.
    pub fn revision(&self) -> Revision {
        self.state.read().revision
    }

    /// Copy of the current records, in order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.state.read().records.clone()
    }

    /// Keys in display order.
    pub fn keys(&self) -> Vec<String> {
        self.state
            .read()
            .records
            .iter()
            .map(|r| r.key.clone())
            .collect()
    }

    /// Run `f` over the current records without copying them.
    ///
    /// The store cannot change while `f` runs: `f` holds the read lock, so a
    /// store mutation made from inside `f` on the same thread deadlocks.
    pub fn with<R>(&self, f: impl FnOnce(&[Record]) -> R) -> R {
        f(&self.state.read().records)
    }
}

impl fmt::Debug for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("RecordView")
            .field("revision", &state.revision)
            .field("records", &state.records)
            .finish()
    }
}
