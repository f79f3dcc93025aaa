use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
mod repo;
pub mod repo_types;
pub mod services;

/// Public session routes.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Identity routes; mount behind [`extractors::require_auth`].
pub fn protected_router() -> Router<AppState> {
    handlers::profile_routes()
}
