//! Unique-key record store with a live view.

use crate::records::view::{RecordView, ViewState};
use crate::subscriptions::{
    StoreEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Record, Revision};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Store configuration.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Refuse records whose key is the empty string.
    /// Default: false
    pub reject_empty_keys: bool,

    /// Records to reserve room for up front.
    pub initial_capacity: usize,
}

/// The record store.
///
/// Provides a unified interface for:
/// - Adding records or replacing their value by key
/// - Deleting records by key
/// - A live view in insertion order
/// - Subscriptions to every change
///
/// Mutations take `&mut self`; there is exactly one writer.
pub struct RecordStore {
    /// Store configuration.
    config: StoreConfig,

    /// Key to position in the view.
    index: HashMap<String, usize>,

    /// Records and revision, shared with every view.
    state: Arc<RwLock<ViewState>>,

    /// Change subscribers.
    subscriptions: SubscriptionManager,
}

impl RecordStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: StoreConfig) -> Self {
        let state = ViewState {
            records: Vec::with_capacity(config.initial_capacity),
            revision: Revision::default(),
        };

        Self {
            index: HashMap::with_capacity(config.initial_capacity),
            state: Arc::new(RwLock::new(state)),
            subscriptions: SubscriptionManager::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Mutations ---

    /// Add a record, or replace the value of the record with this key.
    ///
    /// An existing record keeps its position. A new record goes to the end
    /// of the view. Returns `false`, changing nothing, only when the key is
    /// rejected by the configuration.
    pub fn add_or_update(&mut self, key: &str, value: &str) -> bool {
        if key.is_empty() && self.config.reject_empty_keys {
            debug!("rejected empty key");
            return false;
        }

        let existing = self.index.get(key).copied();

        let event = {
            let mut state = self.state.write();

            match existing {
                Some(position) => {
                    let record = &mut state.records[position];
                    if record.value == value {
                        return true;
                    }
                    let previous = std::mem::replace(&mut record.value, value.to_string());
                    state.revision = state.revision.next();

                    StoreEvent::Updated {
                        position,
                        key: key.to_string(),
                        previous,
                        value: value.to_string(),
                        revision: state.revision,
                    }
                }
                None => {
                    let position = state.records.len();
                    let record = Record::new(key, value);
                    state.records.push(record.clone());
                    state.revision = state.revision.next();
                    self.index.insert(key.to_string(), position);

                    StoreEvent::Added {
                        position,
                        record,
                        revision: state.revision,
                    }
                }
            }
        };

        debug!(?event, "record stored");
        self.subscriptions.broadcast(&event);
        true
    }

    /// Delete the record with this key.
    ///
    /// Returns `false` if no record had that key.
    pub fn delete(&mut self, key: &str) -> bool {
        let position = match self.index.remove(key) {
            Some(position) => position,
            None => return false,
        };

        let event = {
            let mut state = self.state.write();
            let record = state.records.remove(position);

            for p in self.index.values_mut() {
                if *p > position {
                    *p -= 1;
                }
            }
            state.revision = state.revision.next();

            StoreEvent::Removed {
                position,
                record,
                revision: state.revision,
            }
        };

        debug!(?event, "record deleted");
        self.subscriptions.broadcast(&event);
        true
    }

    /// Delete every record, front to back.
    ///
    /// Each removal is its own revision and its own `Removed` event at
    /// position 0. Returns how many records were removed.
    pub fn clear(&mut self) -> usize {
        let events = {
            let mut state = self.state.write();
            let records = std::mem::take(&mut state.records);
            let mut revision = state.revision;

            let events: Vec<StoreEvent> = records
                .into_iter()
                .map(|record| {
                    revision = revision.next();
                    StoreEvent::Removed {
                        position: 0,
                        record,
                        revision,
                    }
                })
                .collect();

            state.revision = revision;
            events
        };
        self.index.clear();

        debug!(removed = events.len(), "store cleared");
        for event in &events {
            self.subscriptions.broadcast(event);
        }
        events.len()
    }

    // --- Reads ---

    /// Live view of the records in insertion order.
    pub fn view(&self) -> RecordView {
        RecordView::new(Arc::clone(&self.state))
    }

    /// Get a record by key.
    pub fn get(&self, key: &str) -> Option<Record> {
        let position = *self.index.get(key)?;
        self.state.read().records.get(position).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position of a key in the view.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.view().keys()
    }

    pub fn revision(&self) -> Revision {
        self.state.read().revision
    }

    // --- Subscriptions ---

    /// Subscribe to changes.
    ///
    /// With `replay_existing`, every current record is delivered as an
    /// `Added` event at the current revision before `CaughtUp`.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let replay: Vec<StoreEvent> = if config.replay_existing {
            let state = self.state.read();
            let revision = state.revision;
            let replay = state
                .records
                .iter()
                .enumerate()
                .map(|(position, record)| StoreEvent::Added {
                    position,
                    record: record.clone(),
                    revision,
                })
                .collect();
            replay
        } else {
            Vec::new()
        };

        self.subscriptions.subscribe(config, replay)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
