use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{AppSettings, SETTINGS_ID};

const SETTINGS_COLUMNS: &str =
    "id, login_name, login_img_url, landing_enabled, landing_dashboard_id, updated_at";

/// Inserts the settings row if it does not exist yet. Returns true when a
/// row was created.
pub async fn ensure_defaults(db: &PgPool, login_name: &str) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO app_settings (id, login_name, login_img_url, landing_enabled)
        VALUES ($1, $2, '', FALSE)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(login_name)
    .execute(db)
    .await
    .context("bootstrap app settings")?;
    Ok(res.rows_affected() > 0)
}

/// Reads the settings row. A missing row means bootstrap never ran.
pub async fn get(db: &PgPool) -> anyhow::Result<AppSettings> {
    let settings = sqlx::query_as::<_, AppSettings>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM app_settings WHERE id = $1"
    ))
    .bind(SETTINGS_ID)
    .fetch_optional(db)
    .await
    .context("load app settings")?
    .context("app settings row missing; bootstrap has not run")?;
    Ok(settings)
}

pub async fn update_login(
    db: &PgPool,
    login_name: &str,
    login_img_url: &str,
) -> anyhow::Result<AppSettings> {
    let settings = sqlx::query_as::<_, AppSettings>(&format!(
        r#"
        INSERT INTO app_settings (id, login_name, login_img_url, landing_enabled)
        VALUES ($1, $2, $3, FALSE)
        ON CONFLICT (id) DO UPDATE
           SET login_name = EXCLUDED.login_name,
               login_img_url = EXCLUDED.login_img_url,
               updated_at = now()
        RETURNING {SETTINGS_COLUMNS}
        "#
    ))
    .bind(SETTINGS_ID)
    .bind(login_name)
    .bind(login_img_url)
    .fetch_one(db)
    .await
    .context("update login settings")?;
    Ok(settings)
}

pub async fn update_landing(
    db: &PgPool,
    default_login_name: &str,
    landing_enabled: bool,
    landing_dashboard_id: Option<Uuid>,
) -> anyhow::Result<AppSettings> {
    let settings = sqlx::query_as::<_, AppSettings>(&format!(
        r#"
        INSERT INTO app_settings (id, login_name, login_img_url, landing_enabled, landing_dashboard_id)
        VALUES ($1, $2, '', $3, $4)
        ON CONFLICT (id) DO UPDATE
           SET landing_enabled = EXCLUDED.landing_enabled,
               landing_dashboard_id = EXCLUDED.landing_dashboard_id,
               updated_at = now()
        RETURNING {SETTINGS_COLUMNS}
        "#
    ))
    .bind(SETTINGS_ID)
    .bind(default_login_name)
    .bind(landing_enabled)
    .bind(landing_dashboard_id)
    .fetch_one(db)
    .await
    .context("update landing settings")?;
    Ok(settings)
}
