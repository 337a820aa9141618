//! Display values for collection and item cards.

use shared::domain::{Collection, CollectionId, Item, ItemId, ItemKind};

use crate::timeline::parse_created_at;

pub const CARD_PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";
pub const HEADER_PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=96&width=96";
const DIARY_PREVIEW_CHARS: usize = 100;

fn image_or(image: Option<&str>, placeholder: &str) -> String {
    image
        .filter(|image| !image.trim().is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

pub fn item_count_label(count: Option<u32>) -> String {
    match count.unwrap_or(0) {
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCard {
    pub id: CollectionId,
    pub title: String,
    pub image: String,
    pub count_label: String,
}

impl From<&Collection> for CollectionCard {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id.clone(),
            title: collection.title.clone(),
            image: image_or(collection.image.as_deref(), CARD_PLACEHOLDER_IMAGE),
            count_label: item_count_label(collection.item_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHeader {
    pub title: String,
    pub image: String,
    pub saved_label: String,
}

impl From<&Collection> for CollectionHeader {
    fn from(collection: &Collection) -> Self {
        Self {
            title: collection.title.clone(),
            image: image_or(collection.image.as_deref(), HEADER_PLACEHOLDER_IMAGE),
            saved_label: format!("{} saved", item_count_label(collection.item_count)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard {
    pub id: ItemId,
    pub title: String,
    pub kind: ItemKind,
    pub kind_label: &'static str,
    /// Present for links; opening the card follows it.
    pub url: Option<String>,
    pub image: Option<String>,
    pub preview: Option<String>,
    pub date_label: Option<String>,
}

impl From<&Item> for ItemCard {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind(),
            kind_label: item.kind().label(),
            url: item.url().map(str::to_string),
            image: item.image.clone().filter(|image| !image.trim().is_empty()),
            preview: item.content().and_then(diary_preview),
            date_label: short_date(&item.created_at),
        }
    }
}

/// Removes `<...>` markup. An unterminated `<` is kept as text.
pub fn strip_markup(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                text.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    text.push_str(rest);
    text
}

pub fn diary_preview(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    let mut preview: String = strip_markup(content)
        .chars()
        .take(DIARY_PREVIEW_CHARS)
        .collect();
    preview.push_str("...");
    Some(preview)
}

/// `Jan 5` style label.
pub fn short_date(created_at: &str) -> Option<String> {
    parse_created_at(created_at).map(|timestamp| timestamp.format("%b %-d").to_string())
}

pub fn delete_collection_prompt(title: &str) -> String {
    format!(
        "Are you sure you want to delete \"{title}\" and all its items? This action cannot be undone."
    )
}

pub fn delete_item_prompt(title: &str) -> String {
    format!("Are you sure you want to delete \"{title}\"? This action cannot be undone.")
}
