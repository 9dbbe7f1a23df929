use crate::domain::context::AuthorizationContext;
use crate::domain::ports::MerchantRegistryHandle;
use crate::error::Result;

/// Looks up the corrected category code of a merchant.
///
/// A missing mapping is not an error. A registry failure is returned to the
/// caller, which treats it as a fault of the whole authorization.
#[derive(Clone)]
pub struct MerchantCategoryResolver {
    registry: MerchantRegistryHandle,
}

impl MerchantCategoryResolver {
    pub fn new(registry: MerchantRegistryHandle) -> Self {
        Self { registry }
    }

    pub async fn resolve(
        &self,
        ctx: &AuthorizationContext,
        merchant: &str,
    ) -> Result<Option<String>> {
        let mapping = ctx
            .run(
                "resolving the merchant category",
                self.registry.find_by_merchant(merchant),
            )
            .await??;
        Ok(mapping.map(|m| m.corrected_mcc))
    }
}
