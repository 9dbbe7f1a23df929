use crate::error::{AuthorizerError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Carries the deadline of one authorization into every call that may block.
///
/// Created once at the start of an authorization and passed by reference to the
/// resolver and the ledger. Nothing reads the deadline from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationContext {
    deadline: Instant,
}

impl AuthorizationContext {
    /// Starts a unit of work that must finish within `budget` from now.
    pub fn with_budget(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Fails with [`AuthorizerError::Timeout`] if the deadline has already passed.
    pub fn ensure_active(&self, stage: &'static str) -> Result<()> {
        if self.is_expired() {
            Err(AuthorizerError::Timeout(stage))
        } else {
            Ok(())
        }
    }

    /// Drives `fut` until it completes or the deadline elapses, whichever comes first.
    ///
    /// On expiry the future is dropped, releasing whatever it held.
    pub async fn run<F>(&self, stage: &'static str, fut: F) -> Result<F::Output>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.deadline, fut)
            .await
            .map_err(|_| AuthorizerError::Timeout(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_within_budget() {
        let ctx = AuthorizationContext::with_budget(Duration::from_millis(200));
        let value = ctx.run("test", async { 42 }).await.unwrap();
        assert_eq!(value, 42);
        assert!(!ctx.is_expired());
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let ctx = AuthorizationContext::with_budget(Duration::from_millis(20));
        let result = ctx
            .run("sleeping", tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert!(matches!(result, Err(AuthorizerError::Timeout("sleeping"))));
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_ensure_active_after_deadline() {
        let ctx = AuthorizationContext::with_deadline(Instant::now());
        assert!(matches!(
            ctx.ensure_active("committing"),
            Err(AuthorizerError::Timeout("committing"))
        ));
    }
}
