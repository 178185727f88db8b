//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;
pub mod stock;

pub use address::{AddressError, Pincode, PincodeError, ShippingAddress};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::{Price, PriceError};
pub use status::*;
pub use stock::StockLevel;
