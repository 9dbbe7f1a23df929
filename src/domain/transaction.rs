use crate::error::AuthorizerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a non-negative monetary amount requested by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, AuthorizerError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(AuthorizerError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AuthorizerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A point-of-sale purchase submitted for authorization.
///
/// `mcc` is the category code declared by the terminal; the resolver may
/// overwrite it before classification. `id` stays `None` until the ledger
/// appends the approved transaction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<u64>,
    pub mcc: String,
    #[serde(alias = "totalAmount")]
    pub amount: Amount,
    pub merchant: String,
}

impl Transaction {
    pub fn new(mcc: impl Into<String>, amount: Amount, merchant: impl Into<String>) -> Self {
        Self {
            id: None,
            mcc: mcc.into(),
            amount,
            merchant: merchant.into(),
        }
    }
}
