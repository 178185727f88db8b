//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (stricter CSP for admin)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Auth extractors (`RequireAdminAuth`, `RequireEditor`) per handler

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAdminAuth, RequireAdminAuth, RequireEditor, clear_current_admin, set_current_admin,
};
pub use security_headers::security_headers_middleware;
pub use session::{EXPIRED_SESSION_SWEEP, create_session_layer, spawn_expired_session_cleanup};
