//! Integration tests for Vitrina.
//!
//! Every test stands up a `wiremock` server in place of the storefront API,
//! so no network access or running backend is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `client` - Request identity headers, error envelopes, response caching
//! - `sign_in` - Login/registration with guest cart merge
//! - `cart` - Guest session creation and the cart cache
//! - `home` - Home feed composition and storefront config fallback
//!
//! This crate holds the shared fixtures: a client pointed at a mock server
//! and JSON builders for the API's wire format.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use vitrina_storefront::{ApiClient, ApiConfig};

/// Timestamp used by every fixture.
pub const TIMESTAMP: &str = "2026-03-01T12:00:00Z";

/// API client pointed at `server`.
#[must_use]
pub fn client(server: &MockServer) -> ApiClient {
    let base_url = Url::parse(&server.uri()).expect("mock server uri");
    ApiClient::new(&ApiConfig::new(base_url)).expect("build api client")
}

/// `{ "data": value }`
#[must_use]
pub fn envelope(value: Value) -> Value {
    json!({ "data": value })
}

/// The API's error envelope.
#[must_use]
pub fn error_body(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}

/// Paginated list envelope holding `items` on a single page.
#[must_use]
pub fn paginated(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "data": items,
        "meta": { "page": 1, "limit": 20, "total": total, "totalPages": 1 }
    })
}

#[must_use]
pub fn product(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "sku": format!("SKU-{id}"),
        "name": name,
        "description": "",
        "regularPrice": "1500.00",
        "salePrice": null,
        "isActive": true,
        "createdAt": TIMESTAMP,
        "updatedAt": TIMESTAMP
    })
}

/// A carousel holding `product_count` products.
#[must_use]
pub fn carousel(id: &str, sort_order: i32, is_active: bool, product_count: usize) -> Value {
    let products: Vec<Value> = (0..product_count)
        .map(|i| product(&format!("{id}-p{i}"), &format!("Producto {i}")))
        .collect();
    json!({
        "id": id,
        "name": format!("Carrusel {id}"),
        "slug": id,
        "type": "manual",
        "sortOrder": sort_order,
        "isActive": is_active,
        "products": products
    })
}

#[must_use]
pub fn slim_banner(id: &str, sort_order: i32, is_active: bool) -> Value {
    json!({
        "id": id,
        "imageUrl": format!("https://cdn.example.com/{id}.webp"),
        "position": "top",
        "isActive": is_active,
        "sortOrder": sort_order
    })
}

/// Storefront configuration with the given slim banners.
#[must_use]
pub fn storefront_config(slim: Vec<Value>) -> Value {
    json!({
        "version": "7",
        "lastUpdated": TIMESTAMP,
        "branding": { "storeName": "Librería Test" },
        "colors": {
            "primary": "#111111",
            "secondary": "#222222",
            "accent": "#333333",
            "background": "#ffffff",
            "text": "#000000",
            "textMuted": "#666666"
        },
        "banners": { "hero": [], "slim": slim },
        "faq": [],
        "contact": { "email": "hola@example.com" },
        "seo": { "metaTitle": "Librería Test" }
    })
}

/// A cart with one line per entry in `product_ids`, quantity 1 each.
#[must_use]
pub fn cart(id: &str, user_id: Option<&str>, session_id: Option<&str>, product_ids: &[&str]) -> Value {
    let items: Vec<Value> = product_ids
        .iter()
        .enumerate()
        .map(|(i, product_id)| {
            json!({
                "id": format!("{id}-item{i}"),
                "productId": product_id,
                "quantity": 1,
                "priceAtAdd": "1500.00",
                "product": {
                    "id": product_id,
                    "name": format!("Producto {product_id}"),
                    "sku": format!("SKU-{product_id}"),
                    "regularPrice": "1500.00"
                },
                "createdAt": TIMESTAMP,
                "updatedAt": TIMESTAMP
            })
        })
        .collect();
    let count = items.len();
    json!({
        "id": id,
        "userId": user_id,
        "sessionId": session_id,
        "items": items,
        "itemCount": count,
        "subtotal": format!("{}.00", count * 1500),
        "createdAt": TIMESTAMP,
        "updatedAt": TIMESTAMP
    })
}

#[must_use]
pub fn user(id: &str, email: &str) -> Value {
    json!({ "id": id, "email": email, "fullName": "Ana Gómez", "role": "buyer" })
}

/// `data` of the login and register endpoints.
#[must_use]
pub fn auth_payload(token: &str, user_id: &str, email: &str) -> Value {
    envelope(json!({ "token": token, "user": user(user_id, email) }))
}
