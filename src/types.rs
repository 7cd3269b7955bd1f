//! Core types for the record store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutation counter of a store.
///
/// Every add, update or delete that changes the store bumps it by one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Revision(pub u64);

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rev({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Revision {
    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

/// A single key-value record.
///
/// Within a store a record is identified by its key alone; the store keeps
/// an explicit key index rather than comparing records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique within the owning store.
    pub key: String,

    /// May be empty.
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        assert_eq!(Record::new("x", "1").to_string(), "x=1");
        assert_eq!(Record::new("empty", "").to_string(), "empty=");
    }

    #[test]
    fn test_revision_next() {
        assert_eq!(Revision::default().next(), Revision(1));
        assert!(Revision(2) > Revision(1));
    }
}
