use sqlx::FromRow;

/// Ceiling applied to a quota record created on first use.
pub const DEFAULT_MAX_MEALS: i32 = 20;

/// Row of `users_tracking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct UsageRecord {
    pub user_id: i64,
    pub meal_count: i32,
    pub max_meals: i32,
}
