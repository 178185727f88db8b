//! Authentication route handlers for admin.
//!
//! Provides the login form and logout.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, render, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    current_admin: Option<CurrentAdmin>,
    error: Option<&'static str>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<LoginQuery>,
) -> Result<Response> {
    if admin.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let template = LoginPageTemplate {
        current_admin: None,
        error: query.error.as_deref().map(error_message),
    };
    Ok(render(&template)?.into_response())
}

/// Check credentials and start an admin session.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let user = match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AdminAuthError::InvalidCredentials) => {
            tracing::warn!("Admin login failed");
            return Ok(Redirect::to("/auth/login?error=credentials"));
        }
        Err(e) => return Err(e.into()),
    };

    // Fresh session id on privilege change
    session.cycle_id().await?;
    set_current_admin(&session, &CurrentAdmin::from(&user)).await?;
    set_sentry_user(user.id.as_i32(), Some(user.email.as_str()));

    tracing::info!(admin_id = %user.id, role = user.role.as_str(), "Admin logged in");
    Ok(Redirect::to("/"))
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/auth/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(error_message("credentials"), "Invalid email or password.");
        assert!(error_message("other").starts_with("Something went wrong"));
    }

    #[test]
    fn test_login_page_renders_error() {
        let html = LoginPageTemplate {
            current_admin: None,
            error: Some(error_message("credentials")),
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains("Invalid email or password."));
        assert!(html.contains("name=\"password\""));
    }
}
