//! Wire types for the storefront REST API.
//!
//! Field names follow the API's camelCase JSON; monetary amounts are decimal
//! strings decoded into [`Decimal`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use vitrina_core::{
    BannerId, BannerPosition, CarouselId, CarouselType, CartId, CartItemId, CategoryId, Email,
    FaqId, OrderId, OrderItemId, OrderStatus, PricedItem, ProductId, UserId, UserRole,
};

// =============================================================================
// Envelopes
// =============================================================================

/// Single-resource response envelope: `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Pagination metadata for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Paginated list envelope: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    /// Whether another page exists after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub regular_price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub special_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub dimension_length: Option<Decimal>,
    #[serde(default)]
    pub dimension_width: Option<Decimal>,
    #[serde(default)]
    pub dimension_height: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricedItem for Product {
    fn regular_price(&self) -> Decimal {
        self.regular_price
    }

    fn sale_price(&self) -> Option<Decimal> {
        self.sale_price
    }
}

/// Field to order product listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductSortBy {
    Name,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl ProductSortBy {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters for `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_slug: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_active: Option<bool>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortDirection>,
}

impl ProductFilters {
    /// Query parameters in the API's naming. Unset filters are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value
                && !value.is_empty()
            {
                pairs.push((key, value));
            }
        };

        push("page", self.page.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));
        push("search", self.search.clone());
        push("categoryId", self.category_id.as_ref().map(ToString::to_string));
        push("categorySlug", self.category_slug.clone());
        push("minPrice", self.min_price.map(|v| v.to_string()));
        push("maxPrice", self.max_price.map(|v| v.to_string()));
        push("isActive", self.is_active.map(|v| v.to_string()));
        push("sortBy", self.sort_by.map(|v| v.as_str().to_string()));
        push("sortOrder", self.sort_order.map(|v| v.as_str().to_string()));
        pairs
    }

    /// Whether the listing is a free-text search (never cached).
    #[must_use]
    pub fn is_search(&self) -> bool {
        self.search.as_ref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub children: Vec<Self>,
}

impl CategoryTree {
    /// Depth-first search for a category by slug.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Category> {
        if self.category.slug == slug {
            return Some(&self.category);
        }
        self.children.iter().find_map(|child| child.find_by_slug(slug))
    }
}

// =============================================================================
// Home page content
// =============================================================================

/// A named product collection shown on the home page, with its products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    pub id: CarouselId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub carousel_type: CarouselType,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub sort_order: i32,
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Carousel {
    /// Active and has at least one product.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.is_active && !self.products.is_empty()
    }
}

/// A thin promotional image strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlimBanner {
    pub id: BannerId,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub position: BannerPosition,
    pub is_active: bool,
    pub sort_order: i32,
}

/// A full-width hero banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBanner {
    pub id: BannerId,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    pub sort_order: i32,
}

// =============================================================================
// Storefront configuration (CMS)
// =============================================================================

/// Store identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontBranding {
    pub store_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub header_logo_url: String,
    #[serde(default)]
    pub footer_logo_url: String,
    #[serde(default)]
    pub favicon_url: String,
}

/// Theme colors as CSS color strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub text_muted: String,
}

/// Hero and slim banners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontBanners {
    #[serde(default)]
    pub hero: Vec<HeroBanner>,
    #[serde(default)]
    pub slim: Vec<SlimBanner>,
}

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontFaq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
}

/// Contact channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontContact {
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
}

/// Default SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontSeo {
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub og_image: String,
}

/// Storefront presentation settings managed from the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub branding: StorefrontBranding,
    pub colors: StorefrontColors,
    #[serde(default)]
    pub banners: StorefrontBanners,
    #[serde(default)]
    pub faq: Vec<StorefrontFaq>,
    pub contact: StorefrontContact,
    pub seo: StorefrontSeo,
}

impl StorefrontConfig {
    /// FAQ entries ordered by their sort order.
    #[must_use]
    pub fn sorted_faq(&self) -> Vec<&StorefrontFaq> {
        let mut faq: Vec<&StorefrontFaq> = self.faq.iter().collect();
        faq.sort_by_key(|entry| entry.sort_order);
        faq
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Product snapshot embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemProduct {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub regular_price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
}

impl PricedItem for CartItemProduct {
    fn regular_price(&self) -> Decimal {
        self.regular_price
    }

    fn sale_price(&self) -> Option<Decimal> {
        self.sale_price
    }
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_at_add: Decimal,
    pub product: CartItemProduct,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// `price_at_add * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_at_add * Decimal::from(self.quantity)
    }
}

/// A shopping cart, keyed by user or by guest session on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Find the line holding a product.
    #[must_use]
    pub fn item_for_product(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Body for `POST /api/cart/items`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Body for `PUT /api/cart/items/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateCartItemInput {
    pub quantity: u32,
}

/// Body for `POST /api/cart/merge`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCartInput {
    pub session_id: String,
}

// =============================================================================
// Auth
// =============================================================================

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Authenticated account profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub full_name: String,
}

/// Body for `PUT /api/auth/me`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Body for `PUT /api/auth/password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[serde(serialize_with = "expose")]
    pub current_password: SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: SecretString,
    /// The authenticated account.
    pub user: UserProfile,
}

/// Raw `data` of the auth endpoints before the token is wrapped.
#[derive(Deserialize)]
pub(crate) struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

impl From<AuthPayload> for AuthSession {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: SecretString::from(payload.token),
            user: payload.user,
        }
    }
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Orders & checkout
// =============================================================================

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub product_sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub contact_full_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_address: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for `GET /api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

impl OrderFilters {
    /// Query parameters in the API's naming. Unset filters are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// Step 1 of checkout: who and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutContactInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
}

/// Step 2 of checkout: what will be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReview {
    pub contact: CheckoutContactInput,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Step 3 of checkout: the placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfirmation {
    pub order_id: OrderId,
    pub order_number: String,
    pub total: Decimal,
    pub message: String,
}
