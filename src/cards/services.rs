use super::dto::{CardGroupView, CardResponse, CreateCardRequest, GroupLayout, UpdateCardRequest};
use super::repo_types::{Card, CardFields, CardSize, UnknownCardSize};
use crate::error::{ApiError, ApiResult};

pub const DEFAULT_GROUP: &str = "Ungrouped";

pub fn group_label(group: Option<&str>) -> &str {
    match group.map(str::trim) {
        Some(g) if !g.is_empty() => g,
        _ => DEFAULT_GROUP,
    }
}

/// One past the highest position used in `group`, starting at 1.
pub fn next_position(layout: &[(Option<String>, i32)], group: &str) -> i32 {
    layout
        .iter()
        .filter(|(g, _)| group_label(g.as_deref()) == group)
        .map(|(_, p)| *p)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Used positions per group, in order of each group's first card.
pub fn layout(entries: &[(Option<String>, i32)]) -> Vec<GroupLayout> {
    let mut groups: Vec<GroupLayout> = Vec::new();
    for (group, position) in entries {
        let label = group_label(group.as_deref());
        match groups.iter_mut().find(|g| g.group == label) {
            Some(g) => g.positions.push(*position),
            None => groups.push(GroupLayout {
                group: label.to_string(),
                positions: vec![*position],
                next_position: 0,
            }),
        }
    }
    for g in &mut groups {
        g.positions.sort_unstable();
        g.next_position = g.positions.last().map_or(1, |max| max.saturating_add(1));
    }
    groups
}

/// Groups cards for display: groups keep first-seen order, cards inside a
/// group are ordered by position.
pub fn group_cards(cards: Vec<Card>) -> Vec<CardGroupView> {
    let mut groups: Vec<CardGroupView> = Vec::new();
    for card in cards {
        let card = CardResponse::from(card);
        match groups.iter_mut().find(|g| g.group == card.card_group) {
            Some(g) => g.cards.push(card),
            None => groups.push(CardGroupView {
                group: card.card_group.clone(),
                cards: vec![card],
            }),
        }
    }
    for g in &mut groups {
        g.cards.sort_by_key(|c| c.position);
    }
    groups
}

fn parse_size(size: Option<&str>, fallback: CardSize) -> ApiResult<CardSize> {
    match size.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(s) => s.parse().map_err(|e: UnknownCardSize| ApiError::Validation(e.to_string())),
    }
}

fn check_position(position: i32) -> ApiResult<i32> {
    if position < 1 {
        return Err(ApiError::Validation("Position must be at least 1".into()));
    }
    Ok(position)
}

fn check_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Card name is required".into()));
    }
    Ok(name.to_string())
}

pub fn fields_for_create(
    req: CreateCardRequest,
    layout: &[(Option<String>, i32)],
) -> ApiResult<CardFields> {
    let card_group = group_label(req.card_group.as_deref()).to_string();
    let position = match req.position {
        Some(p) => check_position(p)?,
        None => next_position(layout, &card_group),
    };
    Ok(CardFields {
        name: check_name(&req.name)?,
        url: req.url.trim().to_string(),
        image_url: req.image_url.trim().to_string(),
        size: parse_size(req.size.as_deref(), CardSize::default())?,
        card_group,
        position,
    })
}

pub fn fields_for_update(existing: &Card, req: UpdateCardRequest) -> ApiResult<CardFields> {
    let card_group = match req.card_group.as_deref() {
        Some(g) => group_label(Some(g)),
        None => group_label(existing.card_group.as_deref()),
    }
    .to_string();
    Ok(CardFields {
        name: check_name(req.name.as_deref().unwrap_or(&existing.name))?,
        url: req.url.map_or_else(|| existing.url.clone(), |u| u.trim().to_string()),
        image_url: req
            .image_url
            .map_or_else(|| existing.image_url.clone(), |u| u.trim().to_string()),
        position: check_position(req.position.unwrap_or(existing.position))?,
        size: parse_size(req.size.as_deref(), existing.size())?,
        card_group,
    })
}
