//! Stored Entry Module
//!
//! A single in-memory entry: the stored string plus its expiry deadline.

use std::time::{Duration, Instant};

// == Stored Entry ==
/// One stored value with optional expiry.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored string
    pub value: String,
    /// Expiry deadline; None never expires
    expires_at: Option<Instant>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_seconds` from now, or never.
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl)),
        }
    }

    // == Is Expired ==
    /// An entry is expired once its deadline has been reached.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    // == Remaining ==
    /// Whole seconds until expiry; None when the entry never expires.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()).as_secs())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = StoredEntry::new("v".to_string(), None);
        assert!(!entry.is_expired());
        assert!(entry.remaining_secs().is_none());
    }

    #[test]
    fn test_entry_with_ttl_reports_remaining() {
        let entry = StoredEntry::new("v".to_string(), Some(10));
        assert!(!entry.is_expired());
        let remaining = entry.remaining_secs().unwrap();
        assert!(remaining >= 9 && remaining <= 10);
    }

    #[test]
    fn test_entry_expires_after_deadline() {
        let entry = StoredEntry::new("v".to_string(), Some(1));
        assert!(!entry.is_expired());
        sleep(Duration::from_millis(1100));
        assert!(entry.is_expired());
        assert_eq!(entry.remaining_secs(), Some(0));
    }
}
