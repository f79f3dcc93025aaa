use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, ProfileResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        services,
    },
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Routes behind the authentication gate.
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/api/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session =
        services::register(state.store.as_ref(), &state.keys, &payload.email, &payload.password)
            .await?;
    Ok(Json(AuthResponse {
        status: "ok",
        message: "User registered successfully",
        token: session.token,
        user: session.user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session =
        services::login(state.store.as_ref(), &state.keys, &payload.email, &payload.password)
            .await?;
    Ok(Json(AuthResponse {
        status: "ok",
        message: "Login successful",
        token: session.token,
        user: session.user,
    }))
}

/// Tokens are stateless: the client discards its copy, nothing is revoked here.
#[instrument]
pub async fn logout() -> Json<MessageResponse> {
    info!("logout requested");
    Json(MessageResponse {
        status: "ok",
        message: "Logged out successfully; discard your token",
    })
}

#[instrument(skip(user), fields(user_id = user.user_id))]
pub async fn profile(user: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        status: "ok",
        user: PublicUser {
            id: user.user_id,
            email: user.email,
        },
    })
}
