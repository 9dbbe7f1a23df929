use serde::{Deserialize, Serialize};

/// Corrects the category code declared by a merchant's terminal.
///
/// `merchant` is matched literally, including any fixed-width padding.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MerchantMapping {
    pub merchant: String,
    pub corrected_mcc: String,
}

impl MerchantMapping {
    pub fn new(merchant: impl Into<String>, corrected_mcc: impl Into<String>) -> Self {
        Self {
            merchant: merchant.into(),
            corrected_mcc: corrected_mcc.into(),
        }
    }
}
