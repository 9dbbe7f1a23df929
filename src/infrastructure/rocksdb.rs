use super::locks::CategoryLocks;
use crate::domain::category::{Balance, BenefitCategory, BenefitCategoryName};
use crate::domain::context::AuthorizationContext;
use crate::domain::merchant::MerchantMapping;
use crate::domain::ports::{BalanceLedger, LedgerEntry, MerchantRegistry};
use crate::domain::transaction::Transaction;
use crate::error::{AuthorizerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for storing benefit balance records, keyed by record id.
pub const CF_CATEGORIES: &str = "categories";
/// Column Family for storing merchant mappings, keyed by merchant string.
pub const CF_MERCHANT_MAPPINGS: &str = "merchant_mappings";
/// Column Family for the approved-transaction log, keyed by transaction id.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent store implementation using RocksDB.
///
/// Serves as both [`MerchantRegistry`] and [`BalanceLedger`]. Each entity lives
/// in its own Column Family; ids are big-endian so iteration follows id order.
/// A commit writes the balance record and the transaction in one `WriteBatch`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    locks: Arc<CategoryLocks>,
    last_category_id: Arc<AtomicU64>,
    last_transaction_id: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures the required column families exist and resumes id allocation
    /// after the highest stored ids.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_CATEGORIES, CF_MERCHANT_MAPPINGS, CF_TRANSACTIONS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        let store = Self {
            db: Arc::new(db),
            locks: Arc::new(CategoryLocks::new()),
            last_category_id: Arc::new(AtomicU64::new(0)),
            last_transaction_id: Arc::new(AtomicU64::new(0)),
        };
        store
            .last_category_id
            .store(store.last_id(CF_CATEGORIES)?, Ordering::SeqCst);
        store
            .last_transaction_id
            .store(store.last_id(CF_TRANSACTIONS)?, Ordering::SeqCst);

        Ok(store)
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| AuthorizerError::internal(format!("{name} column family not found")))
    }

    fn last_id(&self, name: &str) -> Result<u64> {
        let cf = self.cf(name)?;
        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _value) = item?;
                decode_id(&key)
            }
            None => Ok(0),
        }
    }

    /// Lowest-id record of `category`.
    fn find_category(&self, category: BenefitCategoryName) -> Result<Option<BenefitCategory>> {
        let cf = self.cf(CF_CATEGORIES)?;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let record: BenefitCategory = decode(&value)?;
            if record.category == category {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    fn put_category(&self, record: &BenefitCategory) -> Result<()> {
        let cf = self.cf(CF_CATEGORIES)?;
        self.db.put_cf(cf, record.id.to_be_bytes(), encode(record)?)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = self.cf(name)?;
        self.db
            .iterator_cf(cf, IteratorMode::Start)
            .map(|item| {
                let (_key, value) = item?;
                decode(&value)
            })
            .collect()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

fn decode_id(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| AuthorizerError::internal("Malformed id key"))?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl MerchantRegistry for RocksDBStore {
    async fn find_by_merchant(&self, merchant: &str) -> Result<Option<MerchantMapping>> {
        let cf = self.cf(CF_MERCHANT_MAPPINGS)?;
        match self.db.get_cf(cf, merchant.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn register(&self, mapping: MerchantMapping) -> Result<()> {
        let cf = self.cf(CF_MERCHANT_MAPPINGS)?;
        self.db
            .put_cf(cf, mapping.merchant.as_bytes(), encode(&mapping)?)?;
        Ok(())
    }
}

#[async_trait]
impl BalanceLedger for RocksDBStore {
    async fn lock_and_fetch(
        &self,
        ctx: &AuthorizationContext,
        category: BenefitCategoryName,
    ) -> Result<Option<LedgerEntry>> {
        let guard = self.locks.acquire(ctx, category).await?;
        Ok(self
            .find_category(category)?
            .map(|record| LedgerEntry::new(record, guard)))
    }

    async fn commit(&self, entry: LedgerEntry, mut tx: Transaction) -> Result<Transaction> {
        let (record, _guard) = entry.into_parts();
        let id = self.last_transaction_id.fetch_add(1, Ordering::SeqCst) + 1;
        tx.id = Some(id);

        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_CATEGORIES)?,
            record.id.to_be_bytes(),
            encode(&record)?,
        );
        batch.put_cf(self.cf(CF_TRANSACTIONS)?, id.to_be_bytes(), encode(&tx)?);
        self.db.write(batch)?;

        Ok(tx)
    }

    async fn upsert(
        &self,
        category: BenefitCategoryName,
        balance: Balance,
    ) -> Result<BenefitCategory> {
        let balance = balance.validated()?;
        let _guard = self.locks.acquire_unbounded(category).await;
        let id = match self.find_category(category)? {
            Some(existing) => existing.id,
            None => self.last_category_id.fetch_add(1, Ordering::SeqCst) + 1,
        };
        let record = BenefitCategory::new(id, category, balance);
        self.put_category(&record)?;
        Ok(record)
    }

    async fn categories(&self) -> Result<Vec<BenefitCategory>> {
        self.scan(CF_CATEGORIES)
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.scan(CF_TRANSACTIONS)
    }
}
