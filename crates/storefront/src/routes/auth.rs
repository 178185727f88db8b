//! Authentication route handlers.
//!
//! Registration is two steps: email, phone and password first, then the
//! shipping address. The validated first step waits in the session with the
//! password already hashed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, set_current_user};
use crate::models::{CurrentUser, PendingRegistration, session_keys};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address or phone number.
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration step 1 form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Registration step 2 form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub state: String,
    pub district: String,
    pub area_name: String,
    pub pincode: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page query.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub next: String,
}

/// Registration step 1 template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Registration step 2 template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/address.html")]
pub struct AddressTemplate {
    pub current_user: Option<CurrentUser>,
    pub email: String,
    pub error: Option<String>,
}

/// Registration success template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub current_user: Option<CurrentUser>,
    pub email: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Human-readable message for an auth error code.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid username or password.",
        "exists" => "An account with this email or phone number already exists.",
        "email" => "Please enter a valid email address.",
        "phone" => "Please enter a valid phone number (7 to 15 digits).",
        "password" => "Password must be at least 8 characters.",
        "state" => "Please enter your state.",
        "district" => "Please enter your district.",
        "area" => "Please enter your area.",
        "pincode" => "Pincode must be exactly 6 digits.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Error code for a rejected registration or address form.
///
/// Returns `None` for errors that are not the visitor's fault.
fn error_code(err: &AuthError) -> Option<&'static str> {
    match err {
        AuthError::InvalidEmail(_) => Some("email"),
        AuthError::InvalidPhone(_) => Some("phone"),
        AuthError::WeakPassword(_) => Some("password"),
        AuthError::InvalidAddress(bazaar_core::AddressError::MissingField(field)) => Some(*field),
        AuthError::InvalidAddress(bazaar_core::AddressError::Pincode(_)) => Some("pincode"),
        AuthError::UserAlreadyExists => Some("exists"),
        AuthError::InvalidCredentials => Some("credentials"),
        AuthError::Repository(_) | AuthError::PasswordHash => None,
    }
}

/// Accept a post-login redirect only if it stays on this site.
fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.contains("://")
        && !next.starts_with("/auth/");
    local.then_some(next)
}

fn login_error_url(next: Option<&str>) -> String {
    safe_next(next).map_or_else(
        || "/auth/login?error=credentials".to_string(),
        |next| {
            format!(
                "/auth/login?error=credentials&next={}",
                urlencoding::encode(next)
            )
        },
    )
}

async fn pending_registration(session: &Session) -> Option<PendingRegistration> {
    session
        .get::<PendingRegistration>(session_keys::PENDING_REGISTRATION)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> LoginTemplate {
    LoginTemplate {
        current_user,
        error: query.error.as_deref().map(|c| error_message(c).to_string()),
        next: safe_next(query.next.as_deref())
            .unwrap_or_default()
            .to_string(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed: invalid credentials");
            return Ok(Redirect::to(&login_error_url(form.next.as_deref())).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    // New session id so a pre-login cookie can't ride along
    session.cycle_id().await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };
    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, "User logged in");

    let target = safe_next(form.next.as_deref()).unwrap_or("/home");
    Ok(Redirect::to(target).into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display registration step 1.
pub async fn register_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        current_user,
        error: query.error.as_deref().map(|c| error_message(c).to_string()),
    }
}

/// Validate step 1 and hold it in the session.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let pending = match AuthService::new(state.pool())
        .begin_registration(&form.email, &form.phone, &form.password)
        .await
    {
        Ok(pending) => pending,
        Err(e) => {
            let Some(code) = error_code(&e) else {
                return Err(e.into());
            };
            tracing::info!(reason = code, "Registration step 1 rejected");
            return Ok(Redirect::to(&format!("/auth/register?error={code}")).into_response());
        }
    };

    session
        .insert(session_keys::PENDING_REGISTRATION, &pending)
        .await?;

    Ok(Redirect::to("/auth/register/address").into_response())
}

/// Display registration step 2.
pub async fn address_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let Some(pending) = pending_registration(&session).await else {
        return Redirect::to("/auth/register").into_response();
    };

    AddressTemplate {
        current_user: None,
        email: pending.email.into_inner(),
        error: query.error.as_deref().map(|c| error_message(c).to_string()),
    }
    .into_response()
}

/// Create the account from the pending registration and the address.
#[instrument(skip(state, session, form))]
pub async fn register_address(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let Some(pending) = pending_registration(&session).await else {
        return Ok(Redirect::to("/auth/register").into_response());
    };

    let result = AuthService::new(state.pool())
        .complete_registration(
            pending,
            &form.state,
            &form.district,
            &form.area_name,
            &form.pincode,
        )
        .await;

    match result {
        Ok(user) => {
            session
                .remove::<PendingRegistration>(session_keys::PENDING_REGISTRATION)
                .await?;
            tracing::info!(user_id = %user.id, "User registered");

            Ok(RegisterSuccessTemplate {
                current_user: None,
                email: user.email.into_inner(),
            }
            .into_response())
        }
        Err(AuthError::UserAlreadyExists) => {
            session
                .remove::<PendingRegistration>(session_keys::PENDING_REGISTRATION)
                .await?;
            Ok(Redirect::to("/auth/register?error=exists").into_response())
        }
        Err(e) => match error_code(&e) {
            Some(code) => {
                Ok(Redirect::to(&format!("/auth/register/address?error={code}")).into_response())
            }
            None => Err(AppError::from(e)),
        },
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout by destroying the whole session.
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use bazaar_core::{AddressError, EmailError, PincodeError};

    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/cart")), Some("/cart"));
        assert_eq!(safe_next(Some("/products/3")), Some("/products/3"));
    }

    #[test]
    fn test_safe_next_rejects_offsite_and_auth() {
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(Some("/auth/logout")), None);
        assert_eq!(safe_next(Some("")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn test_login_error_url_keeps_next() {
        assert_eq!(login_error_url(None), "/auth/login?error=credentials");
        assert_eq!(
            login_error_url(Some("/orders")),
            "/auth/login?error=credentials&next=%2Forders"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            error_code(&AuthError::InvalidEmail(EmailError::MissingAtSymbol)),
            Some("email")
        );
        assert_eq!(
            error_code(&AuthError::InvalidAddress(AddressError::MissingField("district"))),
            Some("district")
        );
        assert_eq!(
            error_code(&AuthError::InvalidAddress(AddressError::Pincode(
                PincodeError::Format
            ))),
            Some("pincode")
        );
        assert_eq!(error_code(&AuthError::PasswordHash), None);
    }

    #[test]
    fn test_every_code_has_a_message() {
        for code in [
            "credentials",
            "exists",
            "email",
            "phone",
            "password",
            "state",
            "district",
            "area",
            "pincode",
        ] {
            assert!(!error_message(code).starts_with("Something went wrong"));
        }
    }
}
