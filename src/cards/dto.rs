use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Card, CardSize};

#[derive(Debug, Default, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    pub card_group: Option<String>,
    pub position: Option<i32>,
    pub size: Option<String>,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub card_group: Option<String>,
    pub position: Option<i32>,
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub dashboard_id: Uuid,
    pub name: String,
    pub url: String,
    pub image_url: String,
    pub card_group: String,
    pub position: i32,
    pub size: CardSize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Card> for CardResponse {
    fn from(c: Card) -> Self {
        let size = c.size();
        Self {
            id: c.id,
            dashboard_id: c.dashboard_id,
            card_group: super::services::group_label(c.card_group.as_deref()).to_string(),
            name: c.name,
            url: c.url,
            image_url: c.image_url,
            position: c.position,
            size,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardGroupView {
    pub group: String,
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct GroupLayout {
    pub group: String,
    pub positions: Vec<i32>,
    pub next_position: i32,
}
