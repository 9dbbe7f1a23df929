use std::time::Duration;

/// Budget applied to a single authorization when none is configured.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(100);

/// Runtime settings for the [`Authorizer`](crate::application::authorizer::Authorizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizerConfig {
    /// Wall-clock budget for one authorization, from entry to response.
    pub budget: Duration,
}

impl AuthorizerConfig {
    pub fn with_budget(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::with_budget(Duration::from_millis(millis))
    }
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
        }
    }
}
