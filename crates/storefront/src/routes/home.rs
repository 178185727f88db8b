//! Landing page and catalog grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{CurrentUser, ProductCard};
use crate::state::AppState;

/// Catalog search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

impl SearchQuery {
    /// The trimmed search term, if any.
    fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct LandingTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Catalog grid template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<ProductCard>,
    pub search: String,
}

/// Display the landing page.
pub async fn landing(OptionalAuth(current_user): OptionalAuth) -> LandingTemplate {
    LandingTemplate { current_user }
}

/// Display the catalog, optionally filtered by name.
#[instrument(skip(state, user))]
pub async fn catalog(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SearchQuery>,
) -> Result<CatalogTemplate> {
    let term = query.term();
    let products = ProductRepository::new(state.pool()).list_active(term).await?;

    Ok(CatalogTemplate {
        current_user: Some(user),
        search: term.unwrap_or_default().to_string(),
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        let query = SearchQuery {
            search: Some("   ".to_string()),
        };
        assert_eq!(query.term(), None);

        let query = SearchQuery {
            search: Some(" saree ".to_string()),
        };
        assert_eq!(query.term(), Some("saree"));
    }
}
