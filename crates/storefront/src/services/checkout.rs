//! Checkout: turns a cart into an order.

use sqlx::PgPool;
use thiserror::Error;

use crate::db::{OrderRepository, RepositoryError, UserRepository};
use crate::models::{CurrentUser, Order};

/// Longest accepted UPI transaction id.
pub const MAX_TRANSACTION_ID_LENGTH: usize = 64;

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("transaction id must be 1 to 64 characters")]
    InvalidTransactionId,

    /// The session points at a user row that no longer exists.
    #[error("user not found")]
    UserNotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Validate the free-text UPI transaction id. It is recorded, never verified.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidTransactionId` if the trimmed id is empty or too long.
pub fn validate_transaction_id(raw: &str) -> Result<&str, CheckoutError> {
    let id = raw.trim();
    if id.is_empty() || id.chars().count() > MAX_TRANSACTION_ID_LENGTH {
        return Err(CheckoutError::InvalidTransactionId);
    }
    Ok(id)
}

/// Checkout service.
pub struct CheckoutService<'a> {
    users: UserRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for everything in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransactionId` for a bad UPI id and
    /// `CheckoutError::EmptyCart` when there is nothing to buy. Nothing is
    /// written in either case.
    pub async fn place_order(
        &self,
        current: &CurrentUser,
        upi_id: &str,
    ) -> Result<Order, CheckoutError> {
        let transaction_id = validate_transaction_id(upi_id)?;

        let user = self
            .users
            .get_by_id(current.id)
            .await?
            .ok_or(CheckoutError::UserNotFound)?;

        self.orders
            .place_from_cart(&user, transaction_id)
            .await?
            .ok_or(CheckoutError::EmptyCart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_is_trimmed() {
        assert_eq!(validate_transaction_id("  UPI123456789 ").unwrap(), "UPI123456789");
    }

    #[test]
    fn test_transaction_id_bounds() {
        assert!(matches!(
            validate_transaction_id("   "),
            Err(CheckoutError::InvalidTransactionId)
        ));
        assert!(validate_transaction_id(&"9".repeat(64)).is_ok());
        assert!(validate_transaction_id(&"9".repeat(65)).is_err());
    }
}
