use super::category::{Balance, BenefitCategory, BenefitCategoryName};
use super::context::AuthorizationContext;
use super::merchant::MerchantMapping;
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Reference data used to correct the category code declared by a merchant.
#[async_trait]
pub trait MerchantRegistry: Send + Sync {
    /// Exact-match lookup on the literal merchant string.
    async fn find_by_merchant(&self, merchant: &str) -> Result<Option<MerchantMapping>>;
    async fn register(&self, mapping: MerchantMapping) -> Result<()>;
}

/// Owner of the benefit balances and of the approved-transaction log.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    /// Takes the exclusive lock of `category` and reads its record.
    ///
    /// Waiting for the lock is bounded by the context deadline. The returned
    /// entry holds the lock until it is committed or dropped. Returns `None`
    /// when no record exists for `category`.
    async fn lock_and_fetch(
        &self,
        ctx: &AuthorizationContext,
        category: BenefitCategoryName,
    ) -> Result<Option<LedgerEntry>>;

    /// Writes the entry's record and appends `tx` in one atomic write, then
    /// releases the lock. Returns `tx` with its assigned id.
    async fn commit(&self, entry: LedgerEntry, tx: Transaction) -> Result<Transaction>;

    /// Sets the balance of `category`, creating its record if missing.
    async fn upsert(&self, category: BenefitCategoryName, balance: Balance)
    -> Result<BenefitCategory>;

    /// Snapshot of every balance record, ordered by id.
    async fn categories(&self) -> Result<Vec<BenefitCategory>>;

    /// Approved transactions, in append order.
    async fn transactions(&self) -> Result<Vec<Transaction>>;
}

/// A balance record read under its category lock.
///
/// Mutations through [`LedgerEntry::record_mut`] stay in memory until
/// [`BalanceLedger::commit`]. Dropping the entry releases the lock and
/// discards them.
#[derive(Debug)]
pub struct LedgerEntry {
    record: BenefitCategory,
    guard: OwnedMutexGuard<()>,
}

impl LedgerEntry {
    pub(crate) fn new(record: BenefitCategory, guard: OwnedMutexGuard<()>) -> Self {
        Self { record, guard }
    }

    pub fn record(&self) -> &BenefitCategory {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut BenefitCategory {
        &mut self.record
    }

    /// Splits the entry so a store can write the record before releasing the guard.
    pub(crate) fn into_parts(self) -> (BenefitCategory, OwnedMutexGuard<()>) {
        (self.record, self.guard)
    }
}

pub type MerchantRegistryHandle = Arc<dyn MerchantRegistry>;
pub type BalanceLedgerHandle = Arc<dyn BalanceLedger>;
