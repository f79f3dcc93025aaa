use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{Preferences, PreferencesResponse};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn preferences_routes() -> Router<AppState> {
    Router::new().route("/api/preferences", get(get_preferences).put(update_preferences))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_preferences(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = state
        .store
        .get_preferences(user.user_id)
        .await?
        .unwrap_or_default();
    Ok(Json(PreferencesResponse {
        status: "ok",
        preferences,
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = user.user_id))]
pub async fn update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<Preferences>,
) -> Result<Json<PreferencesResponse>, AppError> {
    payload.validate()?;
    state
        .store
        .upsert_preferences(user.user_id, &payload)
        .await?;
    info!("preferences updated");
    Ok(Json(PreferencesResponse {
        status: "ok",
        preferences: payload,
    }))
}
