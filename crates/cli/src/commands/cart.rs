//! Cart commands.

use vitrina_core::{CartItemId, ProductId};
use vitrina_storefront::{AppError, AppState};

use crate::output::emit;

pub async fn show(state: &AppState) -> Result<(), AppError> {
    let cart = state.cart().get().await?;
    emit(&cart)
}

/// Add a product. A guest gets a session id on the first add.
pub async fn add(state: &AppState, product_id: &str, quantity: Option<u32>) -> Result<(), AppError> {
    if quantity == Some(0) {
        return Err(AppError::InvalidInput(
            "Quantity must be at least 1".to_string(),
        ));
    }
    let cart = state
        .cart()
        .add_item(&ProductId::new(product_id), quantity)
        .await?;
    emit(&cart)
}

pub async fn update(state: &AppState, item_id: &str, quantity: u32) -> Result<(), AppError> {
    let cart = state
        .cart()
        .update_item(&CartItemId::new(item_id), quantity)
        .await?;
    emit(&cart)
}

pub async fn remove(state: &AppState, item_id: &str) -> Result<(), AppError> {
    let cart = state.cart().remove_item(&CartItemId::new(item_id)).await?;
    emit(&cart)
}

pub async fn clear(state: &AppState) -> Result<(), AppError> {
    let cart = state.cart().clear().await?;
    emit(&cart)
}
