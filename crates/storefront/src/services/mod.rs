//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Two-step registration and email-or-phone login
//! - `cart` - Cart changes with form validation
//! - `checkout` - Turning a cart into an order

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService};
