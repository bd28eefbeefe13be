//! Bakehouse Core - Shared types library.
//!
//! This crate provides common types used across all Bakehouse components:
//! - `cart` - Persisted shopping cart, checkout and order API client
//! - `cli` - Command-line front end for the cart and checkout
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phone numbers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
