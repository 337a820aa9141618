use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(CollectionId);
id_newtype!(ItemId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Link,
    Diary,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Diary => "diary",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "link" => Some(Self::Link),
            "diary" => Some(Self::Diary),
            _ => None,
        }
    }

    /// Display label used on cards and dialog titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Link => "Link",
            Self::Diary => "Diary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub image: Option<String>,
    pub created_at: String,
    /// Server-derived. Only ever replaced by a re-fetch.
    pub item_count: Option<u32>,
}

/// Kind-specific payload of an item. A link always carries its URL and a
/// diary entry always carries its (possibly empty) rich-text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemBody {
    Link { url: String },
    Diary { content: String },
}

impl ItemBody {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Link { .. } => ItemKind::Link,
            Self::Diary { .. } => ItemKind::Diary,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Link { url } => Some(url),
            Self::Diary { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Link { .. } => None,
            Self::Diary { content } => Some(content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(flatten)]
    pub body: ItemBody,
    pub image: Option<String>,
    /// Raw timestamp as delivered by the API; parsed lazily by the timeline.
    pub created_at: String,
    pub collection_id: CollectionId,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }

    pub fn url(&self) -> Option<&str> {
        self.body.url()
    }

    pub fn content(&self) -> Option<&str> {
        self.body.content()
    }
}
