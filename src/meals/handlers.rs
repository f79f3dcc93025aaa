use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{MealRequest, MealResponse},
    services::suggest_meal,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new().route("/llm", post(create_suggestion))
}

#[instrument(skip(state, user, body), fields(user_id = user.user_id))]
pub async fn create_suggestion(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<MealRequest>,
) -> Result<Json<MealResponse>, AppError> {
    let suggestion = suggest_meal(&state, &user, &body.message).await?;
    Ok(Json(MealResponse {
        status: "ok",
        response: suggestion.response,
        usage: suggestion.usage,
    }))
}
