//! Cooperative cancellation token for concurrent collectors.
//!
//! Collectors check the token at coarse-grained points (once per file,
//! once per visited directory entry, once per unit query). Cancelling the
//! token does not interrupt an in-flight blocking read; the next check
//! observes the cancelled state and returns early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for a snapshot run.
///
/// Clones share the same flag. A child token created with [`child()`]
/// observes its parent in addition to its own flag, so cancelling the
/// parent cancels every derived scope, while cancelling the child leaves
/// the parent untouched.
///
/// [`child()`]: CancelToken::child
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    /// Creates a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a child token that is cancelled whenever this token is.
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Requests cancellation of this token and every scope derived from it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once this token or any of its ancestors is cancelled.
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::SeqCst) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.is_cancelled(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_observed_by_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        token.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_parent_cancel_propagates_to_child() {
        let parent = CancelToken::new();
        let child = parent.child();

        parent.cancel();

        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_affect_parent() {
        let parent = CancelToken::new();
        let child = parent.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_cancel_across_threads() {
        let token = CancelToken::new();
        let clone = token.clone();

        let handle = std::thread::spawn(move || {
            clone.cancel();
        });
        handle.join().unwrap();

        assert!(token.is_cancelled());
    }
}
