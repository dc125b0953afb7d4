//! Per-call context: cancellation plus an optional deadline.
//!
//! Every capability method takes a `&CallContext`. The SDK imposes no deadline
//! of its own; whatever the context carries is enforced locally and forwarded
//! to the sidecar as the gRPC timeout.

use crate::cancel::CancellationToken;
use crate::error::{Result, SdkError};
use std::time::Duration;
use tokio::time::Instant;

/// Cancellation and deadline scope for one or more SDK calls.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Bound calls made with this context by `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the context
    /// unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Bound calls made with this context by an absolute deadline.
    ///
    /// An earlier deadline already on the context wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Tie the context to an externally owned cancellation token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail fast if the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(SdkError::Cancelled);
        }
        if matches!(self.remaining(), Some(left) if left.is_zero()) {
            return Err(SdkError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolve when the context is cancelled or its deadline passes.
    pub async fn done(&self) -> SdkError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => SdkError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => SdkError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                SdkError::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_has_no_deadline() {
        let ctx = CallContext::background();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_check_cancelled() {
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_token(token.clone());
        token.cancel();
        assert!(matches!(ctx.check(), Err(SdkError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_after_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(1));
        assert!(ctx.check().is_ok());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(ctx.check(), Err(SdkError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_deadline_wins() {
        let ctx = CallContext::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(10));
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_unrepresentable_timeout_means_no_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());

        let bounded = CallContext::background()
            .with_timeout(Duration::from_secs(5))
            .with_timeout(Duration::MAX);
        assert!(bounded.deadline().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_reports_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::from_millis(50));
        assert!(matches!(ctx.done().await, SdkError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_done_reports_cancellation() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(60));
        let token = ctx.token().clone();
        tokio::spawn(async move { token.cancel() });
        assert!(matches!(ctx.done().await, SdkError::Cancelled));
    }
}
