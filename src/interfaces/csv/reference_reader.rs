use crate::domain::category::{Balance, BenefitCategoryName};
use crate::domain::merchant::MerchantMapping;
use crate::error::{AuthorizerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a balances file: `category,balance`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct BalanceRecord {
    pub category: BenefitCategoryName,
    pub balance: Decimal,
}

impl BalanceRecord {
    /// Rejects negative opening balances.
    pub fn validated(self) -> Result<(BenefitCategoryName, Balance)> {
        let balance = Balance::new(self.balance).validated().map_err(|_| {
            AuthorizerError::ValidationError(format!("Negative balance for {}", self.category))
        })?;
        Ok((self.category, balance))
    }
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source)
}

/// Reads every balance row from `source`, failing on the first malformed one.
pub fn read_balances<R: Read>(source: R) -> Result<Vec<(BenefitCategoryName, Balance)>> {
    reader(source)
        .into_deserialize::<BalanceRecord>()
        .map(|row| row.map_err(AuthorizerError::from)?.validated())
        .collect()
}

/// Reads every merchant mapping from `source` (header `merchant,corrected_mcc`).
pub fn read_mappings<R: Read>(source: R) -> Result<Vec<MerchantMapping>> {
    reader(source)
        .into_deserialize::<MerchantMapping>()
        .map(|row| row.map_err(AuthorizerError::from))
        .collect()
}
