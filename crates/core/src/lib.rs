//! Vitrina Core - Shared types library.
//!
//! This crate provides common types used across all Vitrina components:
//! - `storefront` - REST API client, home sections, cart session reconciliation
//! - `cli` - Terminal storefront driving the library against a live API
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, guest sessions, prices,
//!   emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
