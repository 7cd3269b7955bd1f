//! Subscription system for live store updates.
//!
//! This module provides in-process subscriptions to record store changes:
//! - Records added at the end of the view
//! - Values updated in place
//! - Records removed
//!
//! Subscriptions support:
//! - Filtering by key and by kind of change
//! - Replay of existing records before going live
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let mut store = RecordStore::new();
//! let handle = store.subscribe(SubscriptionConfig::default());
//!
//! store.add_or_update("x", "1");
//!
//! loop {
//!     match handle.recv() {
//!         Ok(StoreEvent::Added { record, .. }) => println!("Added {}", record),
//!         Ok(StoreEvent::CaughtUp) => println!("Now live!"),
//!         Ok(StoreEvent::Dropped { reason }) => break,
//!         Ok(_) => {}
//!         Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
