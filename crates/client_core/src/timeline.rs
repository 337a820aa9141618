//! Month-bucketed, newest-first view of a collection's items.
//!
//! Timestamps are read at face value: the calendar fields written in
//! `createdAt` decide the bucket, without converting between offsets.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use shared::domain::{Item, ItemId};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// `MM/YYYY`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineGroup {
    pub key: MonthKey,
    pub label: String,
    pub items: Vec<Item>,
}

/// An item left out of the timeline because its timestamp is unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub id: ItemId,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    groups: Vec<TimelineGroup>,
    skipped: Vec<SkippedItem>,
}

impl Timeline {
    pub fn groups(&self) -> &[TimelineGroup] {
        &self.groups
    }

    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Grouped items in display order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    pub fn into_groups(self) -> Vec<TimelineGroup> {
        self.groups
    }
}

/// Parses `createdAt` into its face-value local date and time.
///
/// Accepts RFC 3339 (any offset), naive ISO 8601 date-times and bare dates.
pub fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn group_by_month<I>(items: I) -> Timeline
where
    I: IntoIterator<Item = Item>,
{
    let mut buckets: BTreeMap<MonthKey, Vec<(NaiveDateTime, Item)>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for item in items {
        match parse_created_at(&item.created_at) {
            Some(timestamp) => buckets
                .entry(MonthKey::of(&timestamp))
                .or_default()
                .push((timestamp, item)),
            None => {
                warn!(
                    item_id = %item.id,
                    created_at = %item.created_at,
                    "excluding item with unreadable timestamp from timeline"
                );
                skipped.push(SkippedItem {
                    id: item.id,
                    created_at: item.created_at,
                });
            }
        }
    }

    let groups = buckets
        .into_iter()
        .rev()
        .map(|(key, mut entries)| {
            // Stable: equal timestamps keep their input order.
            entries.sort_by(|a, b| b.0.cmp(&a.0));
            TimelineGroup {
                key,
                label: key.label(),
                items: entries.into_iter().map(|(_, item)| item).collect(),
            }
        })
        .collect();

    Timeline { groups, skipped }
}

#[cfg(test)]
#[path = "tests/timeline_tests.rs"]
mod tests;
