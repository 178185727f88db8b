//! Newtype IDs for type-safe entity references.
//!
//! Every table keyed by a `SERIAL` column gets its own wrapper so a product
//! ID can never be passed where a cart line ID is expected.

/// Define a type-safe ID wrapper around `i32`.
///
/// The generated type has:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`, so it works as an
///   axum `Path` parameter and inside session payloads
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_i32()`, `Display`, and `From` conversions to and from `i32`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(WidgetId, "Identifies a widget.");
///
/// let id = WidgetId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database ID.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The underlying database ID.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId, "Identifies a registered shopper (`shop.user`).");
define_id!(ProductId, "Identifies a catalog product (`shop.product`).");
define_id!(
    ProductImageId,
    "Identifies a stored product image (`shop.product_image`)."
);
define_id!(CartItemId, "Identifies a cart line (`shop.cart_item`).");
define_id!(OrderId, "Identifies a placed order (`shop.order`).");
define_id!(OrderItemId, "Identifies an order line (`shop.order_item`).");
define_id!(AdminUserId, "Identifies a back-office account (`admin.admin_user`).");

impl OrderId {
    /// Customer-facing order number, zero padded to six digits.
    #[must_use]
    pub fn number(&self) -> String {
        format!("BZ{:06}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_padding() {
        assert_eq!(OrderId::new(42).number(), "BZ000042");
        assert_eq!(OrderId::new(1_234_567).number(), "BZ1234567");
    }

    #[test]
    fn test_ids_are_transparent_in_json() {
        let json = serde_json::to_string(&ProductId::new(9)).expect("serialize");
        assert_eq!(json, "9");
        let id: CartItemId = serde_json::from_str("12").expect("deserialize");
        assert_eq!(id, CartItemId::new(12));
    }
}
