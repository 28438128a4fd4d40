// ABOUTME: Per-operation context carrying the caller's deadline.
// ABOUTME: Forwarded unchanged to every adapter and store call of one operation.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// The caller's deadline was reached before the call completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation deadline exceeded")]
pub struct DeadlineExceeded;

/// Deadline for a single manager operation.
///
/// The manager never creates its own deadline; it threads the caller's
/// context through every collaborator call so the caller bounds total latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpContext {
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context with no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the deadline has already passed.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Run `fut`, giving up once the deadline passes.
    pub async fn bound<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_never_expires() {
        let ctx = OpContext::background();
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.bound(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn expired_context_fails_check() {
        let ctx = OpContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.check(), Err(DeadlineExceeded));
    }

    #[tokio::test]
    async fn bound_times_out_slow_futures() {
        let ctx = OpContext::with_timeout(Duration::from_millis(50));
        let slow = tokio::time::sleep(Duration::from_secs(5));
        assert_eq!(ctx.bound(slow).await, Err(DeadlineExceeded));
    }
}
