use serde::{Deserialize, Serialize};

use crate::error::AppError;

const MAX_RESTRICTIONS_LEN: usize = 500;
const MAX_COOKING_MINUTES: i32 = 24 * 60;

/// Per-user meal preferences, stored as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dietary_restrictions: String,
    /// Minutes; 0 means no limit.
    #[serde(default)]
    pub max_cooking_time: i32,
}

impl Preferences {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.dietary_restrictions.chars().count() > MAX_RESTRICTIONS_LEN {
            return Err(AppError::validation(
                "dietary_restrictions",
                format!("must be at most {MAX_RESTRICTIONS_LEN} characters"),
            ));
        }
        if !(0..=MAX_COOKING_MINUTES).contains(&self.max_cooking_time) {
            return Err(AppError::validation(
                "max_cooking_time",
                format!("must be between 0 and {MAX_COOKING_MINUTES} minutes"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub preferences: Preferences,
}
