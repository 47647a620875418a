use chrono::{DateTime, Duration, Utc};

/// A cached value stamped with its expiry time.
#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl_seconds: i64) -> Self {
        Self {
            value,
            expires_at: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_not_expired() {
        let entry = CacheEntry::new("value", 60);
        assert!(!entry.is_expired());
    }

    #[test]
    fn entry_with_elapsed_ttl_is_expired() {
        let entry = CacheEntry::new("value", -1);
        assert!(entry.is_expired());
    }
}
