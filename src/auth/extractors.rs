use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState};

/// Verified identity, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

/// Reads the `Authorization: Bearer <token>` header and verifies the token.
///
/// Every failure maps to [`AppError::Unauthenticated`] so callers cannot tell
/// a missing header from a forged or expired token.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            debug!("missing Authorization header");
            AppError::Unauthenticated
        })?
        .to_str()
        .map_err(|_| AppError::Unauthenticated)?;

    let mut parts = header.split(' ');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => token,
        _ => {
            debug!("malformed Authorization header");
            return Err(AppError::Unauthenticated);
        }
    };

    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::Unauthenticated
    })?;

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
    })
}

/// Gate for protected routes. Rejections never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.keys)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
