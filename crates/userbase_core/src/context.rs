//! Cancellation and deadline signal for read operations.
//!
//! # Responsibility
//! - Carry an optional deadline and a cancel flag into service calls.
//! - Let derived contexts observe their parent's cancellation and deadline.
//!
//! # Invariants
//! - `Context::background()` is never done.
//! - A derived context's effective deadline is the earlier of its own and its
//!   parent's.
//! - Checking a context is a point-in-time poll. Work that started before the
//!   signal fired is not interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Reason a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

struct ContextNode {
    canceled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Arc<ContextNode>>,
}

/// Cheap-to-clone cancellation context.
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<ContextNode>>,
}

/// Cancels the context it was created with, and every context derived from it.
#[derive(Clone)]
pub struct CancelHandle {
    node: Arc<ContextNode>,
}

impl Context {
    /// Root context with no deadline that is never canceled.
    pub fn background() -> Self {
        Self { node: None }
    }

    /// Derives a context canceled by the returned handle.
    pub fn with_cancel(parent: &Context) -> (Context, CancelHandle) {
        Self::derive(parent, None)
    }

    /// Derives a context that expires at `deadline`.
    pub fn with_deadline(parent: &Context, deadline: Instant) -> (Context, CancelHandle) {
        Self::derive(parent, Some(deadline))
    }

    /// Derives a context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an `Instant` adds no deadline of its
    /// own; the parent's deadline, if any, still applies.
    pub fn with_timeout(parent: &Context, timeout: Duration) -> (Context, CancelHandle) {
        Self::derive(parent, Instant::now().checked_add(timeout))
    }

    fn derive(parent: &Context, deadline: Option<Instant>) -> (Context, CancelHandle) {
        let deadline = match (deadline, parent.deadline()) {
            (Some(own), Some(inherited)) => Some(own.min(inherited)),
            (own, inherited) => own.or(inherited),
        };
        let node = Arc::new(ContextNode {
            canceled: AtomicBool::new(false),
            deadline,
            parent: parent.node.clone(),
        });
        (
            Context {
                node: Some(Arc::clone(&node)),
            },
            CancelHandle { node },
        )
    }

    /// Effective deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.node.as_ref().and_then(|node| node.deadline)
    }

    /// Returns why the context is done, or `None` while it is still live.
    ///
    /// Cancellation is reported ahead of an elapsed deadline.
    pub fn err(&self) -> Option<ContextError> {
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            if node.canceled.load(Ordering::Acquire) {
                return Some(ContextError::Canceled);
            }
            current = node.parent.as_deref();
        }

        match self.deadline() {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.deadline())
            .field("err", &self.err())
            .finish()
    }
}

impl CancelHandle {
    /// Marks the context canceled. Idempotent.
    pub fn cancel(&self) {
        self.node.canceled.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, ContextError};
    use std::time::{Duration, Instant};

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();
        assert_eq!(ctx.err(), None);
        assert_eq!(ctx.deadline(), None);
        assert!(!ctx.is_done());
    }

    #[test]
    fn cancel_marks_context_and_children_done() {
        let (parent, cancel) = Context::with_cancel(&Context::background());
        let (child, _child_cancel) = Context::with_timeout(&parent, Duration::from_secs(60));
        assert_eq!(child.err(), None);

        cancel.cancel();
        cancel.cancel();
        assert_eq!(parent.err(), Some(ContextError::Canceled));
        assert_eq!(child.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn canceling_child_leaves_parent_live() {
        let (parent, _cancel) = Context::with_cancel(&Context::background());
        let (child, child_cancel) = Context::with_cancel(&parent);

        child_cancel.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());
    }

    #[test]
    fn elapsed_deadline_reports_deadline_exceeded() {
        let (ctx, _cancel) = Context::with_deadline(&Context::background(), Instant::now());
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
        assert_eq!(
            ctx.err().map(|err| err.to_string()).as_deref(),
            Some("context deadline exceeded")
        );
    }

    #[test]
    fn child_inherits_earlier_parent_deadline() {
        let (parent, _) = Context::with_timeout(&Context::background(), Duration::from_secs(1));
        let (child, _) = Context::with_timeout(&parent, Duration::from_secs(3600));
        assert_eq!(child.deadline(), parent.deadline());

        let (tighter, _) = Context::with_timeout(&parent, Duration::from_millis(1));
        assert!(tighter.deadline() < parent.deadline());
    }

    #[test]
    fn unrepresentable_timeout_adds_no_deadline() {
        let (ctx, cancel) = Context::with_timeout(&Context::background(), Duration::MAX);
        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.err(), None);

        cancel.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn unrepresentable_timeout_keeps_parent_deadline() {
        let (parent, _) = Context::with_timeout(&Context::background(), Duration::from_secs(1));
        let (child, _) = Context::with_timeout(&parent, Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());

        let (expired, _) = Context::with_deadline(&Context::background(), Instant::now());
        let (child, _) = Context::with_timeout(&expired, Duration::MAX);
        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }
}
