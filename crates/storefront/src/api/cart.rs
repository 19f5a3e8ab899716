//! Cart endpoints.
//!
//! The backend keys a cart by the bearer token when present, otherwise by
//! the `x-session-id` header. Callers pick the key through the client's
//! identity.

use std::future::Future;

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use vitrina_core::{CartItemId, ProductId, SessionId};

use super::ApiError;
use super::client::ApiClient;
use super::types::{AddToCartInput, Cart, MergeCartInput, UpdateCartItemInput};
use crate::services::auth::CartMerger;

impl ApiClient {
    /// Get the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        self.get_data(&["api", "cart"]).await
    }

    /// Add a product to the cart.
    ///
    /// The backend defaults the quantity to one when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(
        &self,
        product_id: &ProductId,
        quantity: Option<u32>,
    ) -> Result<Cart, ApiError> {
        let input = AddToCartInput {
            product_id: product_id.clone(),
            quantity,
        };
        self.send_data(Method::POST, &["api", "cart", "items"], Some(&input))
            .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let input = UpdateCartItemInput { quantity };
        self.send_data(
            Method::PUT,
            &["api", "cart", "items", item_id.as_str()],
            Some(&input),
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<Cart, ApiError> {
        self.send_data::<_, ()>(
            Method::DELETE,
            &["api", "cart", "items", item_id.as_str()],
            None,
        )
        .await
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<Cart, ApiError> {
        self.send_data::<_, ()>(Method::DELETE, &["api", "cart"], None)
            .await
    }

    /// Fold the guest cart keyed by `session_id` into the authenticated
    /// user's cart.
    ///
    /// Requires a token-bearing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn merge_guest_cart(&self, session_id: &SessionId) -> Result<Cart, ApiError> {
        let input = MergeCartInput {
            session_id: session_id.to_string(),
        };
        self.send_data(Method::POST, &["api", "cart", "merge"], Some(&input))
            .await
    }
}

impl CartMerger for ApiClient {
    fn merge_cart(
        &self,
        token: &SecretString,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Cart, ApiError>> + Send {
        let client = self
            .with_token(token.clone())
            .with_session(Some(session_id.clone()));
        let session_id = session_id.clone();
        async move { client.merge_guest_cart(&session_id).await }
    }
}
