//! Announcement deduplication
//!
//! A process-lifetime set of state topics whose discovery configuration has
//! already been published. The set only ever grows; a restart clears it,
//! which merely causes a redundant (idempotent) re-announcement since the
//! hub treats discovery payloads as full overwrites.

use std::collections::HashSet;

/// Append-only set of already-announced state topics
#[derive(Debug, Default)]
pub struct ConfiguredTopics {
    seen: HashSet<String>,
}

impl ConfiguredTopics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.seen.contains(topic)
    }

    pub fn record(&mut self, topic: impl Into<String>) {
        self.seen.insert(topic.into());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_contains() {
        let mut cache = ConfiguredTopics::new();
        assert!(!cache.contains("lox/by-uuid/c1/state"));

        cache.record("lox/by-uuid/c1/state");
        assert!(cache.contains("lox/by-uuid/c1/state"));
        assert!(!cache.contains("lox/by-uuid/c2/state"));
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut cache = ConfiguredTopics::new();
        cache.record("topic");
        cache.record("topic");
        assert_eq!(cache.len(), 1);
    }
}
