use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, Product, ProductFilters};

use super::{HomeSection, interleave_with_ratio};

/// Products shown when there are no curated sections.
pub const FALLBACK_PRODUCT_LIMIT: u32 = 8;

/// What the home page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum HomeFeed {
    /// Carousels and slim banners, interleaved.
    Sections(Vec<HomeSection>),
    /// Plain product grid; no displayable carousel or banner exists.
    Fallback(Vec<Product>),
}

impl HomeFeed {
    /// Fetch carousels and slim banners and interleave them one to one.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying API requests fails.
    pub async fn load(client: &ApiClient) -> Result<Self, ApiError> {
        Self::load_with_ratio(client, 1).await
    }

    /// Fetch carousels and slim banners and interleave them with
    /// `carousels_per_banner` carousels before each banner.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying API requests fails.
    #[instrument(skip(client))]
    pub async fn load_with_ratio(
        client: &ApiClient,
        carousels_per_banner: usize,
    ) -> Result<Self, ApiError> {
        let (carousels, config) =
            tokio::try_join!(client.storefront_carousels(), client.storefront_config())?;

        let sections = interleave_with_ratio(&carousels, &config.banners.slim, carousels_per_banner);
        if !sections.is_empty() {
            debug!(count = sections.len(), "Home sections");
            return Ok(Self::Sections(sections));
        }

        debug!("No home sections, loading fallback products");
        let filters = ProductFilters {
            limit: Some(FALLBACK_PRODUCT_LIMIT),
            is_active: Some(true),
            ..ProductFilters::default()
        };
        let products = client.products(&filters).await?;
        Ok(Self::Fallback(products.data))
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sections(sections) => sections.len(),
            Self::Fallback(products) => products.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
