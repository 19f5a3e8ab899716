//! Products, categories and carousels.

use tracing::{debug, instrument};

use vitrina_core::{CarouselId, CategoryId, ProductId};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::client::ApiClient;
use super::types::{Carousel, Category, CategoryTree, Paginated, Product, ProductFilters};

impl ApiClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// List products.
    ///
    /// Listings are cached for a minute, except free-text searches.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, filters: &ProductFilters) -> Result<Paginated<Product>, ApiError> {
        let query = filters.query_pairs();
        let cache_key = CacheKey::Products(
            query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
        );

        // Check cache (only for listings without search)
        if !filters.is_search()
            && let Some(CacheValue::Products(products)) = self.cached(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Paginated<Product> = self.get_raw(&["api", "products"], &query).await?;

        if !filters.is_search() {
            self.store(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_data(&["api", "products", id.as_str()]).await
    }

    /// Get a product by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self))]
    pub async fn product_by_sku(&self, sku: &str) -> Result<Product, ApiError> {
        self.get_data(&["api", "products", "sku", sku]).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Get the category tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> Result<Vec<CategoryTree>, ApiError> {
        if let Some(CacheValue::CategoryTree(tree)) = self.cached(&CacheKey::CategoryTree).await {
            debug!("Cache hit for category tree");
            return Ok(tree);
        }

        let tree: Vec<CategoryTree> = self.get_data(&["api", "categories"]).await?;
        self.store(CacheKey::CategoryTree, CacheValue::CategoryTree(tree.clone()))
            .await;
        Ok(tree)
    }

    /// Get every category as a flat list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories_flat(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cached(&CacheKey::CategoriesFlat).await
        {
            debug!("Cache hit for flat categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_data(&["api", "categories", "flat"]).await?;
        self.store(
            CacheKey::CategoriesFlat,
            CacheValue::Categories(categories.clone()),
        )
        .await;
        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.get_data(&["api", "categories", id.as_str()]).await
    }

    /// Get a category by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, ApiError> {
        self.get_data(&["api", "categories", "slug", slug]).await
    }

    // =========================================================================
    // Carousels
    // =========================================================================

    /// Get the carousels shown on the home page, with their products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn storefront_carousels(&self) -> Result<Vec<Carousel>, ApiError> {
        if let Some(CacheValue::Carousels(carousels)) =
            self.cached(&CacheKey::StorefrontCarousels).await
        {
            debug!("Cache hit for storefront carousels");
            return Ok(carousels);
        }

        let carousels: Vec<Carousel> = self.get_data(&["api", "carousels", "storefront"]).await?;
        self.store(
            CacheKey::StorefrontCarousels,
            CacheValue::Carousels(carousels.clone()),
        )
        .await;
        Ok(carousels)
    }

    /// Get a carousel by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the carousel is not found or the API request fails.
    #[instrument(skip(self))]
    pub async fn carousel_by_slug(&self, slug: &str) -> Result<Carousel, ApiError> {
        self.get_data(&["api", "carousels", "slug", slug]).await
    }

    /// Get a carousel by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the carousel is not found or the API request fails.
    #[instrument(skip(self), fields(carousel_id = %id))]
    pub async fn carousel(&self, id: &CarouselId) -> Result<Carousel, ApiError> {
        self.get_data(&["api", "carousels", id.as_str()]).await
    }
}
