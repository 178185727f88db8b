//! Admin user management commands.
//!
//! ```bash
//! BAZAAR_ADMIN_PASSWORD='correct horse battery' \
//!   bz-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use bazaar_admin::db;
use bazaar_admin::services::{AdminAuthError, AdminAuthService};
use bazaar_core::AdminRole;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    /// Account could not be created.
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
}

/// Create a new admin user and return its id.
///
/// # Errors
///
/// Returns an error for an unknown role, an invalid email, a blank name, a
/// password under 12 characters, or an email that already has an account.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &SecretString,
) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);
    let user = AdminAuthService::new(&pool)
        .create_admin(email, name, role, password.expose_secret())
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id.as_i32())
}
