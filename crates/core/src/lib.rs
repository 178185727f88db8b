//! Bazaar Core - Shared domain types.
//!
//! This crate provides the types used across all Bazaar components:
//! - `storefront` - Public shop (catalog, cart, checkout)
//! - `admin` - Back-office console (users, orders, products)
//! - `cli` - Migrations, admin accounts and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. `sqlx` encode/decode support is enabled with the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, contact details, addresses, prices and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
