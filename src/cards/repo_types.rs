use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub dashboard_id: Uuid,
    pub name: String,
    pub url: String,
    pub image_url: String,
    pub card_group: Option<String>,
    pub position: i32,
    pub size: String, // one of CardSize, stored as text
    pub created_at: OffsetDateTime,
}

/// Validated column values for an insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub name: String,
    pub url: String,
    pub image_url: String,
    pub card_group: String,
    pub position: i32,
    pub size: CardSize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardSize {
    #[default]
    Sm,
    Md,
    Lg,
    Xl,
}

impl CardSize {
    pub fn as_str(self) -> &'static str {
        match self {
            CardSize::Sm => "SM",
            CardSize::Md => "MD",
            CardSize::Lg => "LG",
            CardSize::Xl => "XL",
        }
    }
}

impl fmt::Display for CardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card size `{0}`, expected SM, MD, LG or XL")]
pub struct UnknownCardSize(pub String);

impl FromStr for CardSize {
    type Err = UnknownCardSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SM" => Ok(CardSize::Sm),
            "MD" => Ok(CardSize::Md),
            "LG" => Ok(CardSize::Lg),
            "XL" => Ok(CardSize::Xl),
            _ => Err(UnknownCardSize(s.trim().to_string())),
        }
    }
}

impl Card {
    /// Sizes written by older clients may be missing; they render as SM.
    pub fn size(&self) -> CardSize {
        self.size.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing_is_case_insensitive() {
        assert_eq!(" lg ".parse::<CardSize>(), Ok(CardSize::Lg));
        assert_eq!(
            "huge".parse::<CardSize>(),
            Err(UnknownCardSize("huge".into()))
        );
    }
}
