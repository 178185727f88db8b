//! Read-only access to storefront customers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::UserId;

use super::RepositoryError;
use crate::models::Customer;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    email: String,
    phone: String,
    state: String,
    district: String,
    area_name: String,
    pincode: String,
    created_at: DateTime<Utc>,
    order_count: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            phone: row.phone,
            state: row.state,
            district: row.district,
            area_name: row.area_name,
            pincode: row.pincode,
            created_at: row.created_at,
            order_count: row.order_count,
        }
    }
}

const CUSTOMER_SELECT: &str = r#"
    SELECT u.id, u.email, u.phone, u.state, u.district, u.area_name, u.pincode,
           u.created_at,
           (SELECT COUNT(*) FROM shop."order" o WHERE o.user_id = u.id) AS order_count
    FROM shop."user" u
"#;

/// Repository for customer lookups.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_SELECT} ORDER BY u.created_at DESC, u.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{CUSTOMER_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }
}
