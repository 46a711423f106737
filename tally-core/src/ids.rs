//! Id sources for newly created transactions.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use uuid::Uuid;

use crate::transaction::TransactionId;

/// Hands out fresh transaction ids.
pub trait IdSource {
    fn next_id(&self) -> TransactionId;
}

/// Millisecond-clock ids, bumped when the clock has not advanced.
///
/// Ids are unique and strictly increasing for the lifetime of one source.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicI64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = if now_ms > prev { now_ms } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl IdSource for ClockIds {
    fn next_id(&self) -> TransactionId {
        TransactionId::new(self.issue(Utc::now().timestamp_millis()).to_string())
    }
}

/// Random v4 UUIDs, unique across processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> TransactionId {
        TransactionId::new(Uuid::new_v4().to_string())
    }
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn next_id(&self) -> TransactionId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_clock_ids_bump_when_clock_stalls() {
        let ids = ClockIds::new();
        assert_eq!(ids.issue(1_000), 1_000);
        assert_eq!(ids.issue(1_000), 1_001);
        assert_eq!(ids.issue(999), 1_002);
        assert_eq!(ids.issue(5_000), 5_000);
    }

    #[test]
    fn test_clock_ids_unique() {
        let ids = ClockIds::new();
        let seen: HashSet<_> = (0..1_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1_000);
    }

    #[test]
    fn test_uuid_ids_unique() {
        let a = UuidIds.next_id();
        let b = UuidIds.next_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
