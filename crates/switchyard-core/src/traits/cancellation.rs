//! Cooperative cancellation token.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::errors::{SwitchyardError, SwitchyardResult};

/// Cooperative cancellation.
///
/// Checked by the classifier, planner and executor between steps, and
/// raced against every outstanding external call.
pub trait Cancellable {
    /// Check if cancellation has been requested.
    fn is_cancelled(&self) -> bool;

    /// Request cancellation.
    fn cancel(&self);
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Default implementation of a cancellation token. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled).
    pub fn new() -> Self {
        Self::default()
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> SwitchyardResult<()> {
        if self.is_cancelled() {
            Err(SwitchyardError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Run `fut` to completion unless the token is cancelled first.
    pub async fn run_until_cancelled<F>(&self, fut: F) -> SwitchyardResult<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(SwitchyardError::Cancelled),
            out = fut => Ok(out),
        }
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let token = CancellationToken::new();
        let out = token.run_until_cancelled(async { 41 + 1 }).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn cancel_interrupts_pending_future() {
        let token = CancellationToken::new();
        let remote = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.cancel();
        });
        let res = token
            .run_until_cancelled(tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert!(matches!(res, Err(SwitchyardError::Cancelled)));
        assert!(token.check().is_err());
    }

    #[tokio::test]
    async fn already_cancelled_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let res = token.run_until_cancelled(async { 1 }).await;
        assert!(matches!(res, Err(SwitchyardError::Cancelled)));
    }
}
