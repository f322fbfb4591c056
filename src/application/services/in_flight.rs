//! # In-Flight Guard
//!
//! Single-slot, non-blocking lock that keeps a workflow to one mutating
//! remote call at a time.
//!
//! A second caller is refused immediately rather than queued. The slot is
//! released when the permit drops, including when the owning future is
//! abandoned mid-call.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::application::services::InFlightGuard;
//!
//! let guard = InFlightGuard::new();
//! let permit = guard.try_acquire().unwrap();
//! assert!(guard.try_acquire().is_none());
//!
//! drop(permit);
//! assert!(!guard.is_busy());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot guard.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

impl InFlightGuard {
    /// Creates an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the slot, or returns `None` if it is already taken.
    #[must_use]
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit { guard: self })
    }

    /// Returns true while a permit is held.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the caller holds the slot. Releases it on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn second_acquire_is_refused() {
        let guard = InFlightGuard::new();
        let _permit = guard.try_acquire().unwrap();
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn drop_releases_slot() {
        let guard = InFlightGuard::new();
        {
            let _permit = guard.try_acquire().unwrap();
        }
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[tokio::test]
    async fn abandoned_future_releases_slot() {
        let guard = Arc::new(InFlightGuard::new());
        let task = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                let _permit = guard.try_acquire().unwrap();
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(guard.is_busy());

        task.abort();
        let _ = task.await;
        assert!(!guard.is_busy());
    }
}
