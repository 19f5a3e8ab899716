//! Order history and checkout commands.

use vitrina_core::{OrderId, OrderStatus};
use vitrina_storefront::api::{CheckoutContactInput, OrderFilters};
use vitrina_storefront::{AppError, AppState};

use crate::output::emit;

pub async fn list(
    state: &AppState,
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<OrderStatus>,
) -> Result<(), AppError> {
    let filters = OrderFilters {
        page,
        limit,
        status,
    };
    let orders = state.identified_client()?.orders(&filters).await?;
    emit(&orders)
}

pub async fn show(state: &AppState, id: Option<&str>, number: Option<&str>) -> Result<(), AppError> {
    let client = state.identified_client()?;
    let order = match (id, number) {
        (_, Some(number)) => client.order_by_number(number).await?,
        (Some(id), None) => client.order(&OrderId::new(id)).await?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Give an order id or --number".to_string(),
            ));
        }
    };
    emit(&order)
}

pub async fn checkout_contact(
    state: &AppState,
    full_name: String,
    email: String,
    phone: String,
    address: String,
    customer_notes: Option<String>,
) -> Result<(), AppError> {
    let input = CheckoutContactInput {
        full_name,
        email,
        phone,
        address,
        customer_notes,
    };
    let response = state.checkout().save_contact(&input).await?;
    emit(&response)
}

pub async fn checkout_review(state: &AppState) -> Result<(), AppError> {
    let review = state.checkout().review().await?;
    emit(&review)
}

/// Place the order; the cart is emptied on the server.
pub async fn checkout_confirm(state: &AppState) -> Result<(), AppError> {
    let confirmation = state.checkout().confirm().await?;
    emit(&confirmation)
}
