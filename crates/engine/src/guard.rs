//! In-process single-flight guard.
//!
//! One [`RunGuard`] exists per job family. A second acquisition while a
//! permit is live fails immediately; queuing is deliberately unsupported
//! since a later scheduled tick will simply run then. The permit releases
//! the flag on drop, so the family cannot be wedged by an early return or
//! a panic inside the job body.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Boolean single-flight guard, cheaply cloneable.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard, or `None` if a run is already in flight.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunPermit {
                flag: Arc::clone(&self.flag),
            })
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Live permit for one run; releases the guard on drop.
#[derive(Debug)]
pub struct RunPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_then_release_on_drop() {
        let guard = RunGuard::new();
        assert!(!guard.is_running());

        let permit = guard.try_acquire().expect("first acquire succeeds");
        assert!(guard.is_running());

        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let guard = RunGuard::new();
        let _permit = guard.try_acquire().unwrap();
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn clones_share_the_flag() {
        let guard = RunGuard::new();
        let clone = guard.clone();
        let _permit = guard.try_acquire().unwrap();
        assert!(clone.is_running());
        assert!(clone.try_acquire().is_none());
    }

    #[test]
    fn permit_releases_even_after_panic() {
        let guard = RunGuard::new();
        let clone = guard.clone();
        let result = std::panic::catch_unwind(move || {
            let _permit = clone.try_acquire().unwrap();
            panic!("job body panicked");
        });
        assert!(result.is_err());
        assert!(!guard.is_running());
    }
}
