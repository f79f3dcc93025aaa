use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::UsageResponse, ledger};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn usage_routes() -> Router<AppState> {
    Router::new().route("/api/usage", get(get_usage))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_usage(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UsageResponse>, AppError> {
    let usage = ledger::check_and_reserve(state.store.as_ref(), user.user_id).await?;
    Ok(Json(UsageResponse {
        status: "ok",
        usage,
    }))
}
