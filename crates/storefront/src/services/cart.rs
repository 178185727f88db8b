//! Cart operations.
//!
//! Adding to the cart never touches product stock; stock only moves at
//! checkout.

use sqlx::PgPool;
use thiserror::Error;

use bazaar_core::{CartItemId, ProductId, UserId};

use crate::db::cart::MAX_LINE_QUANTITY;
use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, CartLine, CartSelection};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be between {min} and {max}")]
    InvalidQuantity { min: u32, max: u32 },

    #[error("product not found")]
    ProductNotFound,

    #[error("cart line not found")]
    LineNotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Parse a submitted quantity. A blank field means one unit.
///
/// `allow_zero` is set for the quantity editor, where zero removes the line.
///
/// # Errors
///
/// Returns `CartError::InvalidQuantity` for non-numeric or out-of-range input.
pub fn parse_quantity(raw: Option<&str>, allow_zero: bool) -> Result<u32, CartError> {
    let min = u32::from(!allow_zero);
    let invalid = CartError::InvalidQuantity {
        min,
        max: MAX_LINE_QUANTITY,
    };

    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return if allow_zero { Err(invalid) } else { Ok(1) };
    }

    match raw.parse::<u32>() {
        Ok(n) if (min..=MAX_LINE_QUANTITY).contains(&n) => Ok(n),
        _ => Err(invalid),
    }
}

/// Build a selection from raw form fields.
///
/// # Errors
///
/// Returns `CartError::InvalidQuantity` if the quantity falls outside 1..=99.
pub fn selection_from_form(
    quantity: Option<&str>,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<CartSelection, CartError> {
    Ok(CartSelection {
        quantity: parse_quantity(quantity, false)?,
        size: size.map(str::trim).unwrap_or_default().to_string(),
        color: color.map(str::trim).unwrap_or_default().to_string(),
    })
}

/// Cart service.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            cart: CartRepository::new(pool),
        }
    }

    /// Load the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(Cart {
            lines: self.cart.list(user_id).await?,
        })
    }

    /// Add a product, merging with a matching line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` for a missing or inactive product.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        selection: &CartSelection,
    ) -> Result<CartLine, CartError> {
        let product = self
            .products
            .get_active(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        Ok(self.cart.add(user_id, &product, selection).await?)
    }

    /// Replace the cart with this product alone.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` for a missing or inactive product.
    pub async fn buy_now(
        &self,
        user_id: UserId,
        product_id: ProductId,
        selection: &CartSelection,
    ) -> Result<CartLine, CartError> {
        let product = self
            .products
            .get_active(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        Ok(self.cart.replace_with(user_id, &product, selection).await?)
    }

    /// Change a line's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is not in this user's cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        line_id: CartItemId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if self.cart.set_quantity(user_id, line_id, quantity).await? {
            Ok(())
        } else {
            Err(CartError::LineNotFound)
        }
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is not in this user's cart.
    pub async fn remove(&self, user_id: UserId, line_id: CartItemId) -> Result<(), CartError> {
        if self.cart.remove(user_id, line_id).await? {
            Ok(())
        } else {
            Err(CartError::LineNotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_for_add() {
        assert_eq!(parse_quantity(None, false).unwrap(), 1);
        assert_eq!(parse_quantity(Some(" 3 "), false).unwrap(), 3);
        assert_eq!(parse_quantity(Some("99"), false).unwrap(), 99);
        assert!(parse_quantity(Some("0"), false).is_err());
        assert!(parse_quantity(Some("100"), false).is_err());
        assert!(parse_quantity(Some("-2"), false).is_err());
        assert!(parse_quantity(Some("two"), false).is_err());
    }

    #[test]
    fn test_parse_quantity_for_editor() {
        assert_eq!(parse_quantity(Some("0"), true).unwrap(), 0);
        assert_eq!(parse_quantity(Some("5"), true).unwrap(), 5);
        assert!(parse_quantity(Some(""), true).is_err());
    }

    #[test]
    fn test_selection_trims_options() {
        let selection = selection_from_form(Some("2"), Some(" XL "), None).unwrap();
        assert_eq!(
            selection,
            CartSelection {
                quantity: 2,
                size: "XL".to_string(),
                color: String::new(),
            }
        );
    }

    #[test]
    fn test_invalid_quantity_message() {
        let err = parse_quantity(Some("500"), false).unwrap_err();
        assert_eq!(err.to_string(), "quantity must be between 1 and 99");
    }
}
