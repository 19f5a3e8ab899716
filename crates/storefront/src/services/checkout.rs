//! Three-step checkout: contact, review, confirm.

use tracing::{info, instrument};

use super::ServiceError;
use crate::api::{
    ApiClient, CheckoutConfirmation, CheckoutContactInput, CheckoutReview, MessageResponse,
};
use crate::error::add_breadcrumb;
use crate::session::ClientState;

/// Checkout steps bound to one client state.
#[derive(Clone)]
pub struct Checkout {
    client: ApiClient,
    state: ClientState,
}

impl Checkout {
    #[must_use]
    pub const fn new(client: ApiClient, state: ClientState) -> Self {
        Self { client, state }
    }

    /// Save contact and delivery details.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API rejects
    /// the details.
    #[instrument(skip(self, input))]
    pub async fn save_contact(
        &self,
        input: &CheckoutContactInput,
    ) -> Result<MessageResponse, ServiceError> {
        Ok(self
            .state
            .identify(&self.client)?
            .save_checkout_contact(input)
            .await?)
    }

    /// Review what will be ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self))]
    pub async fn review(&self) -> Result<CheckoutReview, ServiceError> {
        Ok(self.state.identify(&self.client)?.checkout_review().await?)
    }

    /// Place the order. The cart is emptied by the backend, so the cached
    /// cart is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if client state cannot be read or the API request fails.
    #[instrument(skip(self))]
    pub async fn confirm(&self) -> Result<CheckoutConfirmation, ServiceError> {
        let confirmation = self
            .state
            .identify(&self.client)?
            .confirm_checkout()
            .await?;

        self.state.cart_cache.invalidate();
        info!(order_number = %confirmation.order_number, "Order placed");
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_number", confirmation.order_number.as_str())]),
        );
        Ok(confirmation)
    }
}
