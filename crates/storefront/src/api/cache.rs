//! Cache types for storefront API responses.

use std::time::{Duration, Instant};

use moka::Expiry;

use super::types::{Carousel, Category, CategoryTree, Paginated, Product, StorefrontConfig};

/// Cache key for public, slow-changing reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    StorefrontConfig,
    StorefrontCarousels,
    CategoryTree,
    CategoriesFlat,
    /// Product listing, keyed by its rendered query string.
    Products(String),
}

impl CacheKey {
    /// How long an entry stays fresh.
    pub const fn ttl(&self) -> Duration {
        match self {
            Self::StorefrontConfig | Self::CategoryTree | Self::CategoriesFlat => {
                Duration::from_secs(5 * 60)
            }
            Self::StorefrontCarousels => Duration::from_secs(2 * 60),
            Self::Products(_) => Duration::from_secs(60),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    StorefrontConfig(Box<StorefrontConfig>),
    Carousels(Vec<Carousel>),
    CategoryTree(Vec<CategoryTree>),
    Categories(Vec<Category>),
    Products(Paginated<Product>),
}

/// Per-key time-to-live.
pub struct TtlPolicy;

impl Expiry<CacheKey, CacheValue> for TtlPolicy {
    fn expire_after_create(
        &self,
        key: &CacheKey,
        _value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(key.ttl())
    }
}
