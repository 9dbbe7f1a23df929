use super::resolver::MerchantCategoryResolver;
use crate::config::AuthorizerConfig;
use crate::domain::category::classify;
use crate::domain::context::AuthorizationContext;
use crate::domain::ports::{BalanceLedgerHandle, MerchantRegistryHandle};
use crate::domain::response::{AuthorizationOutcome, DeclineReason, FailureReason, ResponseCode};
use crate::domain::transaction::Transaction;
use crate::error::{AuthorizerError, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The entry point for authorizing point-of-sale transactions.
///
/// `Authorizer` resolves the transaction's category, debits the matching
/// benefit balance under its category lock and answers with one of three
/// response codes. Each call runs as its own task, bounded by the configured
/// budget. Cloning is cheap; clones share the same stores.
#[derive(Clone)]
pub struct Authorizer {
    resolver: MerchantCategoryResolver,
    ledger: BalanceLedgerHandle,
    config: AuthorizerConfig,
}

impl Authorizer {
    /// Creates a new `Authorizer`.
    ///
    /// # Arguments
    ///
    /// * `registry` - Merchant mappings used to correct declared category codes.
    /// * `ledger` - The store owning the benefit balances.
    /// * `config` - Budget and other runtime settings.
    pub fn new(
        registry: MerchantRegistryHandle,
        ledger: BalanceLedgerHandle,
        config: AuthorizerConfig,
    ) -> Self {
        Self {
            resolver: MerchantCategoryResolver::new(registry),
            ledger,
            config,
        }
    }

    /// Authorizes `tx` and returns the wire response code.
    ///
    /// Never fails: every fault is reported as [`ResponseCode::Error`].
    pub async fn authorize(&self, tx: Transaction) -> ResponseCode {
        self.evaluate(tx).await.code()
    }

    /// Authorizes `tx` and returns the detailed outcome.
    ///
    /// The unit of work is spawned on its own task with the deadline applied
    /// inside it, so on expiry the work is dropped and any held category lock
    /// is released. A panic inside the task is reported as a fault. Dropping
    /// the returned future aborts the task, so an abandoned call never commits.
    pub async fn evaluate(&self, tx: Transaction) -> AuthorizationOutcome {
        let ctx = AuthorizationContext::with_budget(self.config.budget);
        let this = self.clone();

        let mut task = AbortOnDrop(tokio::spawn(async move {
            ctx.run("authorizing", this.process(&ctx, tx))
                .await
                .and_then(|result| result)
        }));

        match (&mut task.0).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(AuthorizerError::Timeout(stage))) => {
                warn!(stage, "authorization timed out");
                AuthorizationOutcome::Failed(FailureReason::Timeout)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "authorization failed");
                AuthorizationOutcome::Failed(FailureReason::Fault)
            }
            Err(e) => {
                warn!(error = %e, "authorization task aborted");
                AuthorizationOutcome::Failed(FailureReason::Fault)
            }
        }
    }

    async fn process(
        &self,
        ctx: &AuthorizationContext,
        mut tx: Transaction,
    ) -> Result<AuthorizationOutcome> {
        debug!(merchant = %tx.merchant, mcc = %tx.mcc, "resolving");
        if let Some(corrected) = self.resolver.resolve(ctx, &tx.merchant).await? {
            debug!(declared = %tx.mcc, corrected = %corrected, "merchant category corrected");
            tx.mcc = corrected;
        }

        let category = classify(&tx.mcc);
        debug!(mcc = %tx.mcc, %category, "classified");

        let Some(mut entry) = self.ledger.lock_and_fetch(ctx, category).await? else {
            warn!(%category, "no balance record for category");
            return Ok(AuthorizationOutcome::Failed(FailureReason::NotFound));
        };
        debug!(%category, balance = %entry.record().balance, "category locked");

        // Dropping the entry on decline releases the lock without writing.
        if entry.record_mut().debit(tx.amount).is_err() {
            info!(
                %category,
                amount = %tx.amount,
                balance = %entry.record().balance,
                "transaction declined: insufficient funds"
            );
            return Ok(AuthorizationOutcome::Declined(
                DeclineReason::InsufficientFunds,
            ));
        }

        ctx.ensure_active("committing the debit")?;
        let stored = self.ledger.commit(entry, tx).await?;
        info!(
            id = ?stored.id,
            %category,
            amount = %stored.amount,
            "transaction approved"
        );
        Ok(AuthorizationOutcome::Approved)
    }
}

/// Aborts the wrapped task when dropped. Aborting a finished task is a no-op.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
