//! User domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{Email, Phone, ShippingAddress, UserId};

/// A registered shopper.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub phone: Phone,
    pub address: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub phone: Phone,
    pub password_hash: String,
    pub address: ShippingAddress,
}
