use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{Card, CardFields};

const CARD_COLUMNS: &str =
    "id, dashboard_id, name, url, image_url, card_group, position, size, created_at";

pub async fn create(db: &PgPool, dashboard_id: Uuid, fields: &CardFields) -> anyhow::Result<Card> {
    let card = sqlx::query_as::<_, Card>(&format!(
        r#"
        INSERT INTO cards (dashboard_id, name, url, image_url, card_group, position, size)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(dashboard_id)
    .bind(&fields.name)
    .bind(&fields.url)
    .bind(&fields.image_url)
    .bind(&fields.card_group)
    .bind(fields.position)
    .bind(fields.size.as_str())
    .fetch_one(db)
    .await
    .context("insert card")?;
    Ok(card)
}

/// Cards of a dashboard in creation order.
pub async fn list_by_dashboard(db: &PgPool, dashboard_id: Uuid) -> anyhow::Result<Vec<Card>> {
    let rows = sqlx::query_as::<_, Card>(&format!(
        r#"
        SELECT {CARD_COLUMNS}
          FROM cards
         WHERE dashboard_id = $1
         ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(dashboard_id)
    .fetch_all(db)
    .await
    .context("list cards by dashboard")?;
    Ok(rows)
}

/// (group, position) pairs used to suggest the next free position.
pub async fn layout_info(
    db: &PgPool,
    dashboard_id: Uuid,
) -> anyhow::Result<Vec<(Option<String>, i32)>> {
    let rows = sqlx::query_as::<_, (Option<String>, i32)>(
        r#"
        SELECT card_group, position
          FROM cards
         WHERE dashboard_id = $1
         ORDER BY created_at ASC
        "#,
    )
    .bind(dashboard_id)
    .fetch_all(db)
    .await
    .context("load card layout")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, card_id: Uuid) -> anyhow::Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(&format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"
    ))
    .bind(card_id)
    .fetch_optional(db)
    .await
    .context("find card")?;
    Ok(card)
}

pub async fn update(db: &PgPool, card_id: Uuid, fields: &CardFields) -> anyhow::Result<Card> {
    let card = sqlx::query_as::<_, Card>(&format!(
        r#"
        UPDATE cards
           SET name = $2, url = $3, image_url = $4, card_group = $5, position = $6, size = $7
         WHERE id = $1
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(card_id)
    .bind(&fields.name)
    .bind(&fields.url)
    .bind(&fields.image_url)
    .bind(&fields.card_group)
    .bind(fields.position)
    .bind(fields.size.as_str())
    .fetch_one(db)
    .await
    .context("update card")?;
    Ok(card)
}

pub async fn delete(db: &PgPool, card_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM cards WHERE id = $1")
        .bind(card_id)
        .execute(db)
        .await
        .context("delete card")?;
    Ok(res.rows_affected() > 0)
}

/// Removes every card of a dashboard inside the caller's transaction.
pub async fn delete_by_dashboard_tx(
    tx: &mut Transaction<'_, Postgres>,
    dashboard_id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM cards WHERE dashboard_id = $1")
        .bind(dashboard_id)
        .execute(&mut **tx)
        .await
        .context("delete cards of dashboard")?;
    Ok(res.rows_affected())
}
