use sqlx::PgPool;

use super::repo_types::UsageRecord;

pub async fn get_usage(db: &PgPool, user_id: i64) -> sqlx::Result<Option<UsageRecord>> {
    sqlx::query_as::<_, UsageRecord>(
        r#"
        SELECT user_id, meal_count, max_meals
          FROM users_tracking
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Insert a fresh record. A concurrent insert for the same user wins silently.
pub async fn create_usage(db: &PgPool, user_id: i64, max_meals: i32) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users_tracking (user_id, meal_count, max_meals)
        VALUES ($1, 0, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(max_meals)
    .execute(db)
    .await?;
    Ok(())
}

/// Single-statement increment. `None` when the user has no record.
pub async fn increment_usage(db: &PgPool, user_id: i64) -> sqlx::Result<Option<i32>> {
    sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE users_tracking
           SET meal_count = meal_count + 1,
               updated_at = now()
         WHERE user_id = $1
        RETURNING meal_count
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}
