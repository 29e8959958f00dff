// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cooperative cancellation for test discovery.
//!
//! Cancellation is check-and-stop: work that has already completed is kept, and nothing is
//! preempted. The process runner waits on [`CancellationToken::cancelled`] to kill the
//! interpreter, and the output scanner polls [`CancellationToken::is_cancelled`] between lines.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Notify;
use tracing::debug;

/// A cloneable handle used to request cancellation.
///
/// All clones share the same state: cancelling one cancels them all.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Creates a new token that hasn't been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            debug!("cancellation requested");
            self.inner.notify.notify_waiters();
        }
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Waits until cancellation is requested. Returns immediately if it already has been.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register interest before checking the flag, so a concurrent `cancel` can't be missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
