use tracing::{info, instrument};

use super::dto::MealSuggestion;
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    llm::prompt::build_meal_prompt,
    state::AppState,
    usage::ledger,
};

const MAX_MESSAGE_CHARS: usize = 4000;

/// Quota check, prompt, remote call, then count the use.
///
/// A failed remote call is not counted. A failed count after a successful call
/// is logged and the suggestion is still returned.
#[instrument(skip(state, user, message), fields(user_id = user.user_id))]
pub async fn suggest_meal(
    state: &AppState,
    user: &AuthUser,
    message: &str,
) -> Result<MealSuggestion, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message", "must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::validation(
            "message",
            format!("must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    let store = state.store.as_ref();
    let usage = ledger::check_and_reserve(store, user.user_id)
        .await?
        .into_result()?;

    let prefs = store.get_preferences(user.user_id).await?;
    let prompt = build_meal_prompt(message, prefs.as_ref());

    let response = state
        .llm
        .invoke(&state.config.llm.system_prompt, &prompt)
        .await?;

    let usage = match ledger::record_success(store, user.user_id).await {
        Some(used) => usage.with_used(used),
        None => usage,
    };
    info!(used = usage.used, limit = usage.limit, "meal suggestion served");

    Ok(MealSuggestion { response, usage })
}
