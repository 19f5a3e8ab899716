//! Order history and checkout endpoints.
//!
//! Neither is cached: both depend on the caller's identity and change with
//! every purchase.

use reqwest::Method;
use tracing::instrument;

use vitrina_core::OrderId;

use super::ApiError;
use super::client::ApiClient;
use super::types::{
    CheckoutConfirmation, CheckoutContactInput, CheckoutReview, MessageResponse, Order,
    OrderFilters, Paginated,
};

impl ApiClient {
    /// List the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, filters: &OrderFilters) -> Result<Paginated<Order>, ApiError> {
        self.get_raw(&["api", "orders"], &filters.query_pairs())
            .await
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get_data(&["api", "orders", id.as_str()]).await
    }

    /// Get an order by its human-facing number.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self))]
    pub async fn order_by_number(&self, order_number: &str) -> Result<Order, ApiError> {
        self.get_data(&["api", "orders", "number", order_number])
            .await
    }

    /// Save contact and delivery details for the pending checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the details are rejected or the API request fails.
    #[instrument(skip(self, input))]
    pub async fn save_checkout_contact(
        &self,
        input: &CheckoutContactInput,
    ) -> Result<MessageResponse, ApiError> {
        self.send_data(Method::POST, &["api", "checkout", "contact"], Some(input))
            .await
    }

    /// Review the pending checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if no contact details were saved or the API request fails.
    #[instrument(skip(self))]
    pub async fn checkout_review(&self) -> Result<CheckoutReview, ApiError> {
        self.get_data(&["api", "checkout", "review"]).await
    }

    /// Place the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout is incomplete or the API request fails.
    #[instrument(skip(self))]
    pub async fn confirm_checkout(&self) -> Result<CheckoutConfirmation, ApiError> {
        self.send_data::<_, ()>(Method::POST, &["api", "checkout", "confirm"], None)
            .await
    }
}
