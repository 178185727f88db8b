//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine, CartSelection};
pub use order::{Order, OrderItem};
pub use product::{Product, ProductCard, StoredImage};
pub use session::{CurrentUser, PendingRegistration, keys as session_keys};
pub use user::{NewUser, User};
