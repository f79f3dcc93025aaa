use serde::{Deserialize, Serialize};

use crate::usage::ledger::UsageSnapshot;

#[derive(Debug, Deserialize)]
pub struct MealRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub status: &'static str,
    pub response: String,
    pub usage: UsageSnapshot,
}

/// Result of one metered suggestion.
#[derive(Debug)]
pub struct MealSuggestion {
    pub response: String,
    pub usage: UsageSnapshot,
}
