use serde::Serialize;
use tracing::{debug, error, instrument};

use super::repo_types::{UsageRecord, DEFAULT_MAX_MEALS};
use crate::error::AppError;
use crate::store::CredentialStore;

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    #[serde(skip)]
    pub allowed: bool,
    pub used: i32,
    pub remaining: i32,
    pub limit: i32,
}

impl From<UsageRecord> for UsageSnapshot {
    fn from(r: UsageRecord) -> Self {
        Self {
            allowed: r.meal_count < r.max_meals,
            used: r.meal_count,
            remaining: (r.max_meals - r.meal_count).max(0),
            limit: r.max_meals,
        }
    }
}

impl UsageSnapshot {
    /// Same limit, with `used` taken from the stored count.
    pub fn with_used(self, used: i32) -> Self {
        UsageRecord {
            user_id: 0,
            meal_count: used,
            max_meals: self.limit,
        }
        .into()
    }

    pub fn into_result(self) -> Result<Self, AppError> {
        if self.allowed {
            Ok(self)
        } else {
            Err(AppError::QuotaExceeded {
                used: self.used,
                limit: self.limit,
            })
        }
    }
}

/// Reads the user's quota record, creating it on first use.
///
/// Does not count anything: the caller runs the metered action and then calls
/// [`record_success`].
#[instrument(skip(store))]
pub async fn check_and_reserve(
    store: &dyn CredentialStore,
    user_id: i64,
) -> Result<UsageSnapshot, AppError> {
    let record = match store.get_usage(user_id).await? {
        Some(record) => record,
        None => {
            store.create_usage(user_id, DEFAULT_MAX_MEALS).await?;
            debug!(user_id, "usage record created");
            // Re-read: a concurrent request may have created it first.
            store.get_usage(user_id).await?.unwrap_or(UsageRecord {
                user_id,
                meal_count: 0,
                max_meals: DEFAULT_MAX_MEALS,
            })
        }
    };
    Ok(record.into())
}

/// Counts one successful metered action.
///
/// Failure is logged and swallowed: the user already has the result, so the
/// quota may under-count but never over-counts. Returns the stored count
/// after the increment, or `None` when it was not counted.
#[instrument(skip(store))]
pub async fn record_success(store: &dyn CredentialStore, user_id: i64) -> Option<i32> {
    match store.increment_usage(user_id).await {
        Ok(used) => Some(used),
        Err(e) => {
            error!(user_id, error = %e, "failed to increment usage after successful call");
            None
        }
    }
}
