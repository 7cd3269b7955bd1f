//! Subscription types for live store updates.

use crate::types::{Record, Revision};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Send an `Added` event for every record already in the store before
    /// `CaughtUp`.
    pub replay_existing: bool,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            replay_existing: false,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only events for these keys (None = every key).
    pub keys: Option<Vec<String>>,

    /// Include newly added records.
    pub include_added: bool,

    /// Include in-place value updates.
    pub include_updated: bool,

    /// Include removals.
    pub include_removed: bool,
}

impl SubscriptionFilter {
    /// Subscribe to every change.
    pub fn all() -> Self {
        Self {
            keys: None,
            include_added: true,
            include_updated: true,
            include_removed: true,
        }
    }

    /// Subscribe to every change of specific keys.
    pub fn keys(keys: Vec<String>) -> Self {
        Self {
            keys: Some(keys),
            ..Self::all()
        }
    }

    /// Subscribe to membership changes only (adds and removals).
    pub fn membership() -> Self {
        Self {
            include_added: true,
            include_removed: true,
            ..Default::default()
        }
    }

    pub(crate) fn matches(&self, event: &StoreEvent) -> bool {
        let (wanted, key) = match event {
            StoreEvent::Added { record, .. } => (self.include_added, record.key.as_str()),
            StoreEvent::Updated { key, .. } => (self.include_updated, key.as_str()),
            StoreEvent::Removed { record, .. } => (self.include_removed, record.key.as_str()),
            StoreEvent::CaughtUp | StoreEvent::Dropped { .. } => return true,
        };

        if !wanted {
            return false;
        }

        match self.keys {
            Some(ref keys) => keys.iter().any(|k| k == key),
            None => true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A record was appended to the end of the view.
    Added {
        position: usize,
        record: Record,
        revision: Revision,
    },

    /// A record's value was replaced in place.
    Updated {
        position: usize,
        key: String,
        previous: String,
        value: String,
        revision: Revision,
    },

    /// A record was removed; later records shifted up by one.
    Removed {
        position: usize,
        record: Record,
        revision: Revision,
    },

    /// Finished replaying existing records, now streaming live.
    CaughtUp,

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every event currently buffered.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }
}
