//! Domain models for the admin console.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod admin_user;
pub mod customer;
pub mod order;
pub mod product;
pub mod session;

pub use admin_user::{AdminRole, AdminUser, NewAdminUser};
pub use customer::Customer;
pub use order::{AdminOrder, AdminOrderItem, DashboardStats};
pub use product::{NewImage, ProductInput, ProductRecord, ProductSummary, StoredImage};
pub use session::{CurrentAdmin, keys as session_keys};
