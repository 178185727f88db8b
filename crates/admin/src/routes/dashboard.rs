//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::{
    db::DashboardRepository,
    error::{Result, render},
    filters,
    middleware::RequireAdminAuth,
    models::{CurrentAdmin, DashboardStats},
    state::AppState,
};

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub stats: DashboardStats,
}

/// Dashboard overview.
///
/// GET /
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Html<String>> {
    let stats = DashboardRepository::new(state.pool()).stats().await?;

    render(&DashboardTemplate {
        current_admin: Some(admin),
        stats,
    })
}
