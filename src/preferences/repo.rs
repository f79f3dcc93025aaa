use sqlx::{types::Json, PgPool};

use super::dto::Preferences;

pub async fn get_preferences(db: &PgPool, user_id: i64) -> sqlx::Result<Option<Preferences>> {
    let row = sqlx::query_scalar::<_, Option<Json<Preferences>>>(
        r#"SELECT user_preference FROM user_preference WHERE user_id = $1"#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row.flatten().map(|Json(p)| p))
}

pub async fn upsert_preferences(db: &PgPool, user_id: i64, prefs: &Preferences) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_preference (user_id, user_preference, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id) DO UPDATE
           SET user_preference = EXCLUDED.user_preference,
               updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user_id)
    .bind(Json(prefs))
    .execute(db)
    .await?;
    Ok(())
}
