//! Headline numbers for the dashboard.

use sqlx::PgPool;

use bazaar_core::Price;

use super::RepositoryError;
use super::orders::OrderRepository;
use crate::models::DashboardStats;

/// Recent orders shown on the dashboard.
const RECENT_ORDERS: i64 = 5;

#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    users: i64,
    products: i64,
    orders: i64,
    pending_orders: i64,
    revenue: Price,
}

/// Repository for dashboard aggregates.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Counts, revenue (cancelled orders excluded) and the latest orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let counts = sqlx::query_as::<_, CountsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM shop."user") AS users,
                (SELECT COUNT(*) FROM shop.product) AS products,
                (SELECT COUNT(*) FROM shop."order") AS orders,
                (SELECT COUNT(*) FROM shop."order" WHERE status = 'pending') AS pending_orders,
                (SELECT COALESCE(SUM(total_amount), 0)
                 FROM shop."order" WHERE status <> 'cancelled') AS revenue
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        let recent_orders = OrderRepository::new(self.pool)
            .list(Some(RECENT_ORDERS))
            .await?;

        Ok(DashboardStats {
            users: counts.users,
            products: counts.products,
            orders: counts.orders,
            pending_orders: counts.pending_orders,
            revenue: counts.revenue,
            recent_orders,
        })
    }
}
