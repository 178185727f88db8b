//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{Email, Phone, ShippingAddress, UserId};

use super::{RepositoryError, conflict_or_database};
use crate::models::{NewUser, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    phone: String,
    state: String,
    district: String,
    area_name: String,
    pincode: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone = Phone::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;
        let address =
            ShippingAddress::new(&row.state, &row.district, &row.area_name, &row.pincode)
                .map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid address in database: {e}"))
                })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            phone,
            address,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

const USER_COLUMNS: &str =
    "id, email, phone, state, district, area_name, pincode, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {USER_COLUMNS} FROM shop."user" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Whether any user already holds this email or this phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_or_phone_taken(
        &self,
        email: &Email,
        phone: &Phone,
    ) -> Result<bool, RepositoryError> {
        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM shop."user" WHERE email = $1 OR phone = $2)"#,
        )
        .bind(email)
        .bind(phone)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or phone already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO shop."user"
                (email, phone, password_hash, state, district, area_name, pincode)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.address.state)
        .bind(&user.address.district)
        .bind(&user.address.area_name)
        .bind(user.address.pincode.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email or phone"))?;

        row.try_into()
    }

    /// Look up a user by email or phone and return their password hash.
    ///
    /// The login box accepts either, so both normalised spellings are tried.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash_by_login(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let as_email = Email::parse(username)
            .map_or_else(|_| username.trim().to_string(), Email::into_inner);
        let as_phone = Phone::parse(username)
            .map_or_else(|_| username.trim().to_string(), |p| p.as_str().to_string());

        let row = sqlx::query_as::<_, UserWithHashRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, password_hash
            FROM shop."user"
            WHERE email = $1 OR phone = $2
            ORDER BY id
            LIMIT 1
            "#
        ))
        .bind(as_email)
        .bind(as_phone)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }
}
