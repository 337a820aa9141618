use std::fmt::Write;

use client_core::{
    timeline::Timeline,
    view::{CollectionCard, CollectionHeader, ItemCard},
};
use shared::domain::Collection;

pub fn collections_grid(collections: &[Collection]) -> String {
    if collections.is_empty() {
        return "No collections yet. Create one with `add-collection`.\n".to_string();
    }

    let mut out = String::new();
    for card in collections.iter().map(CollectionCard::from) {
        let _ = writeln!(out, "{}  {}  ({})", card.id, card.title, card.count_label);
        let _ = writeln!(out, "    image: {}", card.image);
    }
    out
}

pub fn collection_page(collection: &Collection, timeline: &Timeline) -> String {
    let header = CollectionHeader::from(collection);
    let mut out = String::new();
    let _ = writeln!(out, "{}", header.title);
    let _ = writeln!(out, "{}  |  image: {}", header.saved_label, header.image);

    if timeline.is_empty() && timeline.skipped().is_empty() {
        let _ = writeln!(out, "\nThis collection is empty.");
        return out;
    }

    for group in timeline.groups() {
        let _ = writeln!(out, "\n{}", group.label);
        for card in group.items.iter().map(ItemCard::from) {
            let date = card.date_label.as_deref().unwrap_or("");
            let _ = writeln!(
                out,
                "  [{}] {}  {}  ({})",
                card.kind_label, card.title, date, card.id
            );
            if let Some(url) = &card.url {
                let _ = writeln!(out, "      {url}");
            }
            if let Some(preview) = &card.preview {
                let _ = writeln!(out, "      {preview}");
            }
            if let Some(image) = &card.image {
                let _ = writeln!(out, "      image: {image}");
            }
        }
    }

    if !timeline.skipped().is_empty() {
        let _ = writeln!(out, "\nNot shown (unreadable date):");
        for skipped in timeline.skipped() {
            let _ = writeln!(out, "  {}  created_at={:?}", skipped.id, skipped.created_at);
        }
    }
    out
}
