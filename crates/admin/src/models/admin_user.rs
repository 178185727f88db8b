//! Admin user domain types.
//!
//! Back-office accounts are separate from storefront customers.

use chrono::{DateTime, Utc};

use bazaar_core::{AdminUserId, Email};

// Re-export AdminRole from core for convenience
pub use bazaar_core::AdminRole;

/// An admin user (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// Last successful login, if any.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting an admin account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub password_hash: String,
}
