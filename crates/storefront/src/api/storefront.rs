//! Storefront presentation settings.

use tracing::{debug, instrument, warn};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::client::ApiClient;
use super::types::StorefrontConfig;
use crate::defaults::storefront_defaults;

impl ApiClient {
    /// Get the storefront configuration.
    ///
    /// Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn storefront_config(&self) -> Result<StorefrontConfig, ApiError> {
        if let Some(CacheValue::StorefrontConfig(config)) =
            self.cached(&CacheKey::StorefrontConfig).await
        {
            debug!("Cache hit for storefront config");
            return Ok(*config);
        }

        let config: StorefrontConfig = self.get_data(&["api", "storefront", "config"]).await?;
        self.store(
            CacheKey::StorefrontConfig,
            CacheValue::StorefrontConfig(Box::new(config.clone())),
        )
        .await;
        Ok(config)
    }

    /// Get the storefront configuration, or the built-in defaults when the
    /// API cannot provide it.
    #[instrument(skip(self))]
    pub async fn storefront_config_or_default(&self) -> StorefrontConfig {
        match self.storefront_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Falling back to default storefront config");
                storefront_defaults()
            }
        }
    }
}
