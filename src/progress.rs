//! Progress reporting and cooperative cancellation
//!
//! The generator calls [`ProgressCallback::on_page_complete`] after every
//! drawn page and polls [`CancellationCheck::is_cancelled`] at its
//! checkpoints (before each attempt, before each page, before the write).
//! Plain closures implement both traits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives page-level progress events
///
/// Counters restart from 1 on every assembly attempt.
pub trait ProgressCallback: Send + Sync {
    /// # Arguments
    /// * `current` - 1-indexed page just drawn
    /// * `total`   - pages in the document
    fn on_page_complete(&self, current: usize, total: usize);

    /// Called when an attempt overflowed the size ceiling and is retried
    fn on_attempt_rejected(&self, quality: u8, size: usize) {
        let _ = (quality, size);
    }
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_page_complete(&self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_page_complete(&self, _current: usize, _total: usize) {}
}

/// Asked whether the caller wants the generation abandoned
pub trait CancellationCheck: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl<F> CancellationCheck for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl CancellationCheck for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag; clones observe the same flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl CancellationCheck for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_progress() {
        let seen = Mutex::new(Vec::new());
        let callback = |current: usize, total: usize| seen.lock().unwrap().push((current, total));
        callback.on_page_complete(1, 3);
        callback.on_page_complete(2, 3);
        callback.on_attempt_rejected(90, 100);
        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_closure_cancellation() {
        let check = || true;
        assert!(check.is_cancelled());
        assert!(!NeverCancelled.is_cancelled());
    }
}
