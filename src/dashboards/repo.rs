use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Dashboard;
use crate::access::{NormalizedDashboard, Visibility};
use crate::cards;

const DASHBOARD_COLUMNS: &str =
    "id, name, description, visibility, permissions, user_id, created_at";

pub async fn create(
    db: &PgPool,
    name: &str,
    description: &str,
    access: &NormalizedDashboard,
) -> anyhow::Result<Dashboard> {
    let dashboard = sqlx::query_as::<_, Dashboard>(&format!(
        r#"
        INSERT INTO dashboards (name, description, visibility, permissions, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {DASHBOARD_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(description)
    .bind(access.visibility_tags())
    .bind(access.permission_tags())
    .bind(access.owner_user_id)
    .fetch_one(db)
    .await
    .context("insert dashboard")?;
    Ok(dashboard)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Dashboard>> {
    let dashboard = sqlx::query_as::<_, Dashboard>(&format!(
        "SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find dashboard")?;
    Ok(dashboard)
}

/// Private dashboards owned by `user_id`, newest first.
pub async fn list_private(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Dashboard>> {
    let rows = sqlx::query_as::<_, Dashboard>(&format!(
        r#"
        SELECT {DASHBOARD_COLUMNS}
          FROM dashboards
         WHERE user_id = $1 AND 'PRIVATE' = ANY(visibility)
         ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list private dashboards")?;
    Ok(rows)
}

/// Unowned dashboards of one tier, newest first.
pub async fn list_shared(db: &PgPool, visibility: Visibility) -> anyhow::Result<Vec<Dashboard>> {
    let rows = sqlx::query_as::<_, Dashboard>(&format!(
        r#"
        SELECT {DASHBOARD_COLUMNS}
          FROM dashboards
         WHERE user_id IS NULL AND $1 = ANY(visibility)
         ORDER BY created_at DESC
        "#
    ))
    .bind(visibility.as_str())
    .fetch_all(db)
    .await
    .with_context(|| format!("list {visibility} dashboards"))?;
    Ok(rows)
}

/// Writes name, description and the normalized access fields. A `None`
/// owner clears any previous owner.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: &str,
    description: &str,
    access: &NormalizedDashboard,
) -> anyhow::Result<Dashboard> {
    let dashboard = sqlx::query_as::<_, Dashboard>(&format!(
        r#"
        UPDATE dashboards
           SET name = $2, description = $3, visibility = $4, permissions = $5, user_id = $6
         WHERE id = $1
        RETURNING {DASHBOARD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(access.visibility_tags())
    .bind(access.permission_tags())
    .bind(access.owner_user_id)
    .fetch_one(db)
    .await
    .context("update dashboard")?;
    Ok(dashboard)
}

/// Deletes a dashboard and its cards in one transaction. Returns the number
/// of cards removed, or `None` if the dashboard did not exist.
pub async fn delete_with_cards(db: &PgPool, id: Uuid) -> anyhow::Result<Option<u64>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let removed_cards = cards::repo::delete_by_dashboard_tx(&mut tx, id).await?;
    let res = sqlx::query("DELETE FROM dashboards WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("delete dashboard")?;
    if res.rows_affected() == 0 {
        tx.rollback().await.context("rollback tx")?;
        return Ok(None);
    }
    tx.commit().await.context("commit tx")?;
    Ok(Some(removed_cards))
}
