//! Invoice id allocation
//!
//! Ids are issued from an atomic counter owned by the invoice book and seeded
//! from the largest id persisted at open. Ids are unique among live records
//! only: removing the highest id and reopening issues that id again.

use std::sync::atomic::{AtomicU64, Ordering};

use super::errors::{InvoiceError, InvoiceResult};

#[derive(Debug)]
pub struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    /// Sequence whose first issued id is `max_persisted + 1` (or 1).
    pub fn seeded_from(max_persisted: Option<u64>) -> Self {
        Self {
            last: AtomicU64::new(max_persisted.unwrap_or(0)),
        }
    }

    /// Issues the next id.
    ///
    /// # Errors
    ///
    /// Returns `IdsExhausted` once `u64::MAX` has been issued or seeded; the
    /// counter is left unchanged.
    pub fn next_id(&self) -> InvoiceResult<u64> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|prev| prev + 1)
            .map_err(InvoiceError::IdsExhausted)
    }

    /// Last id issued or seeded.
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_store_starts_at_one() {
        let seq = IdSequence::seeded_from(None);
        assert_eq!(seq.next_id().unwrap(), 1);
        assert_eq!(seq.next_id().unwrap(), 2);
    }

    #[test]
    fn test_seeded_from_persisted_max() {
        let seq = IdSequence::seeded_from(Some(41));
        assert_eq!(seq.last_issued(), 41);
        assert_eq!(seq.next_id().unwrap(), 42);
    }

    #[test]
    fn test_exhausted_at_max_does_not_wrap() {
        let seq = IdSequence::seeded_from(Some(u64::MAX - 1));
        assert_eq!(seq.next_id().unwrap(), u64::MAX);

        for _ in 0..2 {
            let err = seq.next_id().unwrap_err();
            assert!(matches!(err, InvoiceError::IdsExhausted(u64::MAX)));
        }
        assert_eq!(seq.last_issued(), u64::MAX);
    }

    #[test]
    fn test_seeded_at_max_is_exhausted() {
        let seq = IdSequence::seeded_from(Some(u64::MAX));
        assert!(matches!(seq.next_id(), Err(InvoiceError::IdsExhausted(_))));
    }

    #[test]
    fn test_concurrent_issuance_is_unique() {
        let seq = Arc::new(IdSequence::seeded_from(None));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || {
                    (0..250)
                        .map(|_| seq.next_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(ids.len(), 1000);
        assert_eq!(seq.last_issued(), 1000);
    }
}
