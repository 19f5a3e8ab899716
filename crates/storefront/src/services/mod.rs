//! Flows that combine API calls with client state.
//!
//! # Services
//!
//! - `auth` - Sign-in, sign-out and the guest cart merge
//! - `cart` - Cart reads and edits with the guest session rules
//! - `checkout` - Contact details, review and order placement

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthFlow, AuthOutcome, CartMerger, MergeOutcome, reconcile};
pub use cart::CartService;
pub use checkout::Checkout;

use thiserror::Error;

use crate::api::ApiError;
use crate::session::StorageError;

/// Errors from cart and checkout flows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client state could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
