//! In-memory record store.
//!
//! Records are kept in insertion order behind a key index, and exposed
//! through a live view that every mutation updates before it returns.

mod store;
mod view;

pub use store::{RecordStore, StoreConfig};
pub use view::RecordView;
