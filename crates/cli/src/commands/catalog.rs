//! Home feed, products, categories and storefront configuration.

use vitrina_core::ProductId;
use vitrina_storefront::api::{ProductFilters, ProductSortBy, SortDirection};
use vitrina_storefront::{AppError, AppState, HomeFeed};

use crate::SortArg;
use crate::output::emit;

/// Print the home feed.
pub async fn home(state: &AppState, carousels_per_banner: usize) -> Result<(), AppError> {
    let feed = HomeFeed::load_with_ratio(state.client(), carousels_per_banner).await?;
    if feed.is_fallback() {
        tracing::info!(count = feed.len(), "No curated sections, showing products");
    }
    emit(&feed)
}

/// Build listing filters from command-line arguments.
pub fn product_filters(
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    category_slug: Option<String>,
    sort: Option<SortArg>,
) -> ProductFilters {
    let (sort_by, sort_order) = match sort {
        Some(SortArg::Name) => (Some(ProductSortBy::Name), Some(SortDirection::Asc)),
        Some(SortArg::PriceAsc) => (Some(ProductSortBy::Price), Some(SortDirection::Asc)),
        Some(SortArg::PriceDesc) => (Some(ProductSortBy::Price), Some(SortDirection::Desc)),
        Some(SortArg::Newest) => (Some(ProductSortBy::CreatedAt), Some(SortDirection::Desc)),
        None => (None, None),
    };

    ProductFilters {
        page,
        limit,
        search,
        category_slug,
        sort_by,
        sort_order,
        ..ProductFilters::default()
    }
}

pub async fn list_products(state: &AppState, filters: &ProductFilters) -> Result<(), AppError> {
    let products = state.client().products(filters).await?;
    emit(&products)
}

pub async fn show_product(
    state: &AppState,
    id: Option<&str>,
    sku: Option<&str>,
) -> Result<(), AppError> {
    let product = match (id, sku) {
        (_, Some(sku)) => state.client().product_by_sku(sku).await?,
        (Some(id), None) => state.client().product(&ProductId::new(id)).await?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Give a product id or --sku".to_string(),
            ));
        }
    };
    emit(&product)
}

pub async fn categories(state: &AppState, flat: bool, slug: Option<&str>) -> Result<(), AppError> {
    let client = state.client();
    if let Some(slug) = slug {
        return emit(&client.category_by_slug(slug).await?);
    }
    if flat {
        emit(&client.categories_flat().await?)
    } else {
        emit(&client.category_tree().await?)
    }
}

/// Print the storefront configuration, or the built-in defaults when the
/// API cannot provide it.
pub async fn storefront(state: &AppState) -> Result<(), AppError> {
    let config = state.client().storefront_config_or_default().await;
    emit(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_args_map_to_filters() {
        let filters = product_filters(None, Some(5), None, None, Some(SortArg::PriceDesc));
        assert_eq!(filters.limit, Some(5));
        assert_eq!(filters.sort_by, Some(ProductSortBy::Price));
        assert_eq!(filters.sort_order, Some(SortDirection::Desc));

        let filters = product_filters(None, None, Some("lienzo".to_string()), None, None);
        assert!(filters.is_search());
        assert!(filters.sort_by.is_none());
    }
}
