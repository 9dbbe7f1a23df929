#![allow(dead_code)]

use async_trait::async_trait;
use benefit_authorizer::application::authorizer::Authorizer;
use benefit_authorizer::config::AuthorizerConfig;
use benefit_authorizer::domain::category::{Balance, BenefitCategory, BenefitCategoryName};
use benefit_authorizer::domain::context::AuthorizationContext;
use benefit_authorizer::domain::merchant::MerchantMapping;
use benefit_authorizer::domain::ports::{BalanceLedger, LedgerEntry, MerchantRegistry};
use benefit_authorizer::domain::transaction::{Amount, Transaction};
use benefit_authorizer::error::{AuthorizerError, Result};
use benefit_authorizer::infrastructure::in_memory::{
    InMemoryBalanceLedger, InMemoryMerchantRegistry,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub fn tx(mcc: &str, amount: Decimal, merchant: &str) -> Transaction {
    Transaction::new(mcc, Amount::new(amount).unwrap(), merchant)
}

pub async fn seeded_ledger(balances: &[(BenefitCategoryName, Decimal)]) -> InMemoryBalanceLedger {
    let ledger = InMemoryBalanceLedger::new();
    for (category, balance) in balances {
        ledger.upsert(*category, Balance::new(*balance)).await.unwrap();
    }
    ledger
}

pub fn authorizer(
    registry: impl MerchantRegistry + 'static,
    ledger: impl BalanceLedger + 'static,
    budget: Duration,
) -> Authorizer {
    Authorizer::new(
        Arc::new(registry),
        Arc::new(ledger),
        AuthorizerConfig::with_budget(budget),
    )
}

pub async fn balance_of(ledger: &InMemoryBalanceLedger, category: BenefitCategoryName) -> Decimal {
    ledger
        .categories()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.category == category)
        .map(|r| r.balance.value())
        .unwrap()
}

/// Holds the lock of `category` until the returned entry is dropped.
pub async fn hold_lock(ledger: &InMemoryBalanceLedger, category: BenefitCategoryName) -> LedgerEntry {
    let ctx = AuthorizationContext::with_budget(Duration::from_secs(5));
    ledger.lock_and_fetch(&ctx, category).await.unwrap().unwrap()
}

/// Registry whose lookups always fail.
pub struct FailingRegistry;

#[async_trait]
impl MerchantRegistry for FailingRegistry {
    async fn find_by_merchant(&self, _merchant: &str) -> Result<Option<MerchantMapping>> {
        Err(AuthorizerError::internal("registry unavailable"))
    }

    async fn register(&self, _mapping: MerchantMapping) -> Result<()> {
        Err(AuthorizerError::internal("registry unavailable"))
    }
}

/// Registry that answers only after `delay`.
pub struct SlowRegistry {
    pub delay: Duration,
}

#[async_trait]
impl MerchantRegistry for SlowRegistry {
    async fn find_by_merchant(&self, _merchant: &str) -> Result<Option<MerchantMapping>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn register(&self, _mapping: MerchantMapping) -> Result<()> {
        Ok(())
    }
}

/// Ledger whose every operation fails, or panics when `panic` is set.
pub struct BrokenLedger {
    pub panic: bool,
}

impl BrokenLedger {
    fn fail<T>(&self) -> Result<T> {
        if self.panic {
            panic!("ledger exploded");
        }
        Err(AuthorizerError::internal("ledger unavailable"))
    }
}

#[async_trait]
impl BalanceLedger for BrokenLedger {
    async fn lock_and_fetch(
        &self,
        _ctx: &AuthorizationContext,
        _category: BenefitCategoryName,
    ) -> Result<Option<LedgerEntry>> {
        self.fail()
    }

    async fn commit(&self, _entry: LedgerEntry, _tx: Transaction) -> Result<Transaction> {
        self.fail()
    }

    async fn upsert(
        &self,
        _category: BenefitCategoryName,
        _balance: Balance,
    ) -> Result<BenefitCategory> {
        self.fail()
    }

    async fn categories(&self) -> Result<Vec<BenefitCategory>> {
        self.fail()
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.fail()
    }
}

pub fn default_registry() -> InMemoryMerchantRegistry {
    InMemoryMerchantRegistry::new()
}

pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(*row)?;
    }

    wtr.flush()?;
    Ok(())
}
