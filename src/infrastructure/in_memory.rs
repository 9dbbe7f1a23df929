use super::locks::CategoryLocks;
use crate::domain::category::{Balance, BenefitCategory, BenefitCategoryName};
use crate::domain::context::AuthorizationContext;
use crate::domain::merchant::MerchantMapping;
use crate::domain::ports::{BalanceLedger, LedgerEntry, MerchantRegistry};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory merchant registry.
///
/// Uses `Arc<RwLock<HashMap<String, MerchantMapping>>>` keyed by the literal merchant string.
#[derive(Default, Clone)]
pub struct InMemoryMerchantRegistry {
    mappings: Arc<RwLock<HashMap<String, MerchantMapping>>>,
}

impl InMemoryMerchantRegistry {
    /// Creates a new, empty in-memory registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MerchantRegistry for InMemoryMerchantRegistry {
    async fn find_by_merchant(&self, merchant: &str) -> Result<Option<MerchantMapping>> {
        let mappings = self.mappings.read().await;
        Ok(mappings.get(merchant).cloned())
    }

    async fn register(&self, mapping: MerchantMapping) -> Result<()> {
        let mut mappings = self.mappings.write().await;
        mappings.insert(mapping.merchant.clone(), mapping);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    categories: BTreeMap<u64, BenefitCategory>,
    transactions: Vec<Transaction>,
    last_category_id: u64,
    last_transaction_id: u64,
}

impl LedgerState {
    /// Lowest-id record of `category`.
    fn find(&self, category: BenefitCategoryName) -> Option<&BenefitCategory> {
        self.categories.values().find(|r| r.category == category)
    }
}

/// A thread-safe in-memory balance ledger.
///
/// Balance records and the transaction log share one `RwLock`, so a commit
/// writes both or neither. Exclusive access per category is provided by
/// [`CategoryLocks`], not by the state lock.
#[derive(Default, Clone)]
pub struct InMemoryBalanceLedger {
    state: Arc<RwLock<LedgerState>>,
    locks: Arc<CategoryLocks>,
}

impl InMemoryBalanceLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, keeping its id. Existing records of the same
    /// category are left in place.
    #[cfg(test)]
    async fn insert(&self, record: BenefitCategory) {
        let mut state = self.state.write().await;
        state.last_category_id = state.last_category_id.max(record.id);
        state.categories.insert(record.id, record);
    }
}

#[async_trait]
impl BalanceLedger for InMemoryBalanceLedger {
    async fn lock_and_fetch(
        &self,
        ctx: &AuthorizationContext,
        category: BenefitCategoryName,
    ) -> Result<Option<LedgerEntry>> {
        let guard = self.locks.acquire(ctx, category).await?;
        let state = self.state.read().await;
        Ok(state
            .find(category)
            .cloned()
            .map(|record| LedgerEntry::new(record, guard)))
    }

    async fn commit(&self, entry: LedgerEntry, mut tx: Transaction) -> Result<Transaction> {
        let (record, _guard) = entry.into_parts();
        let mut state = self.state.write().await;
        state.last_transaction_id += 1;
        tx.id = Some(state.last_transaction_id);
        state.categories.insert(record.id, record);
        state.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn upsert(
        &self,
        category: BenefitCategoryName,
        balance: Balance,
    ) -> Result<BenefitCategory> {
        let balance = balance.validated()?;
        let _guard = self.locks.acquire_unbounded(category).await;
        let mut state = self.state.write().await;
        let id = match state.find(category).map(|existing| existing.id) {
            Some(id) => id,
            None => {
                state.last_category_id += 1;
                state.last_category_id
            }
        };
        let record = BenefitCategory::new(id, category, balance);
        state.categories.insert(record.id, record.clone());
        Ok(record)
    }

    async fn categories(&self) -> Result<Vec<BenefitCategory>> {
        let state = self.state.read().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        Ok(state.transactions.clone())
    }
}
