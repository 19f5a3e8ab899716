//! Vitrina storefront client library.
//!
//! A thin client over the storefront REST API, plus the two pieces of logic
//! that live on the client: composing the home page from carousels and slim
//! banners, and handing a guest cart over to the account at sign-in.
//!
//! # Modules
//!
//! - [`api`] - Typed REST client with response caching
//! - [`home`] - Home section interleaving and the home feed
//! - [`session`] - Guest session id, sign-in and cart cache containers
//! - [`services`] - Sign-in with cart merge, cart and checkout flows
//! - [`config`] / [`telemetry`] / [`error`] - Environment, logging, Sentry

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod defaults;
pub mod error;
pub mod home;
pub mod services;
pub mod session;
pub mod state;
pub mod telemetry;

pub use api::{ApiClient, ApiError};
pub use config::{ApiConfig, ConfigError, VitrinaConfig};
pub use error::AppError;
pub use home::{HomeFeed, HomeSection, HomeSectionKind, interleave, interleave_with_ratio};
pub use services::{AuthError, AuthFlow, AuthOutcome, CartService, Checkout, MergeOutcome};
pub use session::{ClientState, FileStore, MemoryCartCache, MemoryStore};
pub use state::AppState;
