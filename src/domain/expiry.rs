use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use super::SubjectKey;

/// Longest single cooldown; longer requests are clamped so `Instant` math cannot overflow.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Subject -> absolute expiry.
///
/// Entries whose expiry is not after `now` are stale. Queries treat them as
/// absent without removing them; only [`ExpiryMap::sweep`] drops them.
#[derive(Debug, Default, Clone)]
pub struct ExpiryMap {
    entries: HashMap<SubjectKey, Instant>,
}

impl ExpiryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any previous expiry for `key`. Returns the new expiry.
    pub fn put(&mut self, key: SubjectKey, now: Instant, duration: Duration) -> Instant {
        let expiry = now + duration.min(MAX_COOLDOWN);
        self.entries.insert(key, expiry);
        expiry
    }

    pub fn is_active(&self, key: &SubjectKey, now: Instant) -> bool {
        self.entries.get(key).is_some_and(|expiry| now < *expiry)
    }

    pub fn time_left(&self, key: &SubjectKey, now: Instant) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|expiry| now < **expiry)
            .map(|expiry| expiry.duration_since(now))
    }

    pub fn remove(&mut self, key: &SubjectKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry, returning how many were held (stale ones included).
    pub fn clear(&mut self) -> usize {
        let held = self.entries.len();
        self.entries.clear();
        held
    }

    /// Drops stale entries and returns a copy of what is left.
    pub fn sweep(&mut self, now: Instant) -> HashMap<SubjectKey, Instant> {
        self.entries.retain(|_, expiry| now < *expiry);
        self.entries.clone()
    }

    /// Number of stored entries, stale ones included.
    pub fn stored(&self) -> usize {
        self.entries.len()
    }
}
