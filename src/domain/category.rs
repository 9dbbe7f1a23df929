use crate::domain::transaction::Amount;
use crate::error::AuthorizerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::SubAssign;
use std::str::FromStr;

/// Represents the spendable funds of a benefit category.
///
/// This is a wrapper around `rust_decimal::Decimal` so balances and transaction
/// amounts cannot be mixed up by accident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rejects negative balances. Every store write of a balance goes through this.
    pub fn validated(self) -> Result<Self, AuthorizerError> {
        if self.0 < Decimal::ZERO {
            return Err(AuthorizerError::ValidationError(format!(
                "Negative balance: {}",
                self.0
            )));
        }
        Ok(self)
    }

    /// Returns true if `amount` can be debited without going negative.
    pub fn covers(&self, amount: Amount) -> bool {
        self.0 >= amount.value()
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.value())
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The fixed set of benefit buckets a transaction can be charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BenefitCategoryName {
    Food,
    Meal,
    Cash,
}

impl BenefitCategoryName {
    pub const ALL: [Self; 3] = [Self::Food, Self::Meal, Self::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Meal => "MEAL",
            Self::Cash => "CASH",
        }
    }
}

impl fmt::Display for BenefitCategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenefitCategoryName {
    type Err = AuthorizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FOOD" => Ok(Self::Food),
            "MEAL" => Ok(Self::Meal),
            "CASH" => Ok(Self::Cash),
            other => Err(AuthorizerError::ValidationError(format!(
                "Unknown benefit category: {other}"
            ))),
        }
    }
}

/// Maps a merchant category code to the benefit category it is charged against.
///
/// Total over its input: any code that is not a food or meal code is CASH.
pub fn classify(mcc: &str) -> BenefitCategoryName {
    match mcc {
        "5411" | "5412" => BenefitCategoryName::Food,
        "5811" | "5812" => BenefitCategoryName::Meal,
        _ => BenefitCategoryName::Cash,
    }
}

/// The balance record of one benefit category.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BenefitCategory {
    /// Store-assigned identifier. The lowest id wins when several records share a category.
    pub id: u64,
    pub category: BenefitCategoryName,
    pub balance: Balance,
}

impl BenefitCategory {
    pub fn new(id: u64, category: BenefitCategoryName, balance: Balance) -> Self {
        Self {
            id,
            category,
            balance,
        }
    }

    /// Debits `amount` if the balance covers it, leaving the record untouched otherwise.
    pub fn debit(&mut self, amount: Amount) -> Result<(), AuthorizerError> {
        if self.balance.covers(amount) {
            self.balance -= amount.into();
            Ok(())
        } else {
            Err(AuthorizerError::ValidationError(
                "Insufficient funds".to_string(),
            ))
        }
    }
}
