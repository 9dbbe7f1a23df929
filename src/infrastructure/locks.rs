use crate::domain::category::BenefitCategoryName;
use crate::domain::context::AuthorizationContext;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One exclusive lock per benefit category.
///
/// Authorizations against the same category queue up in FIFO order
/// (`tokio::sync::Mutex` is fair); different categories never contend.
#[derive(Debug, Default)]
pub struct CategoryLocks {
    food: Arc<Mutex<()>>,
    meal: Arc<Mutex<()>>,
    cash: Arc<Mutex<()>>,
}

impl CategoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, category: BenefitCategoryName) -> Arc<Mutex<()>> {
        match category {
            BenefitCategoryName::Food => Arc::clone(&self.food),
            BenefitCategoryName::Meal => Arc::clone(&self.meal),
            BenefitCategoryName::Cash => Arc::clone(&self.cash),
        }
    }

    /// Waits for the lock of `category`, giving up when the context deadline elapses.
    pub async fn acquire(
        &self,
        ctx: &AuthorizationContext,
        category: BenefitCategoryName,
    ) -> Result<OwnedMutexGuard<()>> {
        let lock = self.lock_for(category);
        ctx.run("waiting for the category lock", lock.lock_owned())
            .await
    }

    /// Waits for the lock of `category` without a deadline. Used by seeding paths.
    pub async fn acquire_unbounded(&self, category: BenefitCategoryName) -> OwnedMutexGuard<()> {
        self.lock_for(category).lock_owned().await
    }
}
