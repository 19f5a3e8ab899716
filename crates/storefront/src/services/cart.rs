//! Cart reads and edits.
//!
//! Requests carry the bearer token when signed in and the guest session id
//! when one exists. A guest gets a session id the first time they add an
//! item, not before. Every successful call refreshes the cached cart.

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use vitrina_core::{CartItemId, ProductId};

use super::ServiceError;
use crate::api::{ApiClient, Cart, CartItem};
use crate::error::add_breadcrumb;
use crate::session::ClientState;

/// Cart operations bound to one client state.
#[derive(Clone)]
pub struct CartService {
    client: ApiClient,
    state: ClientState,
}

impl CartService {
    #[must_use]
    pub const fn new(client: ApiClient, state: ClientState) -> Self {
        Self { client, state }
    }

    fn remember(&self, cart: Cart) -> Cart {
        self.state.cart_cache.set(cart.clone());
        cart
    }

    /// The current cart, from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Cart, ServiceError> {
        if let Some(cart) = self.state.cart_cache.get() {
            debug!("Cache hit for cart");
            return Ok(cart);
        }

        let cart = self.state.identify(&self.client)?.cart().await?;
        Ok(self.remember(cart))
    }

    /// Add a product to the cart.
    ///
    /// Creates the guest session id first if the visitor is not signed in
    /// and has none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or written, or the API
    /// request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(
        &self,
        product_id: &ProductId,
        quantity: Option<u32>,
    ) -> Result<Cart, ServiceError> {
        if !self.state.is_authenticated()? {
            let session_id = self.state.sessions.ensure_session_id()?;
            debug!(session_id = %session_id, "Guest cart session");
        }

        let cart = self
            .state
            .identify(&self.client)?
            .add_cart_item(product_id, quantity)
            .await?;
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(self.remember(cart))
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<Cart, ServiceError> {
        let cart = self
            .state
            .identify(&self.client)?
            .update_cart_item(item_id, quantity)
            .await?;
        Ok(self.remember(cart))
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_item(&self, item_id: &CartItemId) -> Result<Cart, ServiceError> {
        let cart = self
            .state
            .identify(&self.client)?
            .remove_cart_item(item_id)
            .await?;
        Ok(self.remember(cart))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<Cart, ServiceError> {
        let cart = self.state.identify(&self.client)?.clear_cart().await?;
        Ok(self.remember(cart))
    }

    /// Number of units in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn item_count(&self) -> Result<u32, ServiceError> {
        Ok(self.get().await?.item_count)
    }

    /// Cart subtotal as computed by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn subtotal(&self) -> Result<Decimal, ServiceError> {
        Ok(self.get().await?.subtotal)
    }

    /// The cart line holding `product_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn find_item(&self, product_id: &ProductId) -> Result<Option<CartItem>, ServiceError> {
        Ok(self.get().await?.item_for_product(product_id).cloned())
    }
}
