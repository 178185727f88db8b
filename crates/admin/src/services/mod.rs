//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password login and admin account creation

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService};
