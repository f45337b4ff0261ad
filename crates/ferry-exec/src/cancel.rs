// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cooperative cancellation for [`exec_cancellable`](crate::exec_cancellable).
//!
//! Plain [`exec`](crate::exec) and friends deliberately have no cancellation
//! path: an interrupted wait is retried until the child truly exits. This
//! token is the explicit opt-in for callers that want "kill the child and
//! stop waiting" semantics instead.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Notify;

/// Cloneable cancellation token; cancelling any clone wakes all waiters.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a fresh, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is signalled; immediately if it already was.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let mut notified = std::pin::pin!(self.inner.notify.notified());
            // Register before re-checking so a cancel landing between the
            // check and the await cannot be missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
