use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Notification;

pub async fn create(db: &PgPool, title: &str, message: &str) -> anyhow::Result<Notification> {
    let n = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (title, message)
        VALUES ($1, $2)
        RETURNING id, title, message, read_by_id, created_at
        "#,
    )
    .bind(title)
    .bind(message)
    .fetch_one(db)
    .await
    .context("insert notification")?;
    Ok(n)
}

/// All notifications, newest first.
pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, title, message, read_by_id, created_at
          FROM notifications
         ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list notifications")?;
    Ok(rows)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete notification")?;
    Ok(res.rows_affected() > 0)
}
