//! In-memory projection of fetched query results.
//!
//! The store is never patched by mutations: entries are only replaced
//! wholesale by completed fetches, or marked stale when a mutation declares
//! them dependent.

use std::{collections::HashMap, fmt};

use shared::domain::{Collection, CollectionId, Item};
use tokio::sync::{broadcast, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Collections,
    Collection(CollectionId),
    Items(CollectionId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collections => f.write_str("collections"),
            Self::Collection(id) => write!(f, "collection({id})"),
            Self::Items(collection_id) => write!(f, "items({collection_id})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Collections(Vec<Collection>),
    Collection(Option<Collection>),
    Items(Vec<Item>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedQuery {
    pub value: QueryValue,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Replaced(QueryKey),
    Invalidated(QueryKey),
    Cleared,
}

pub struct QueryStore {
    entries: RwLock<HashMap<QueryKey, CachedQuery>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| entry.stale)
    }

    pub async fn replace(&self, key: QueryKey, value: QueryValue) {
        self.entries
            .write()
            .await
            .insert(key.clone(), CachedQuery { value, stale: false });
        let _ = self.events.send(StoreEvent::Replaced(key));
    }

    /// Marks entries stale. Keys that were never fetched are left absent.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            if let Some(entry) = entries.get_mut(key) {
                entry.stale = true;
            }
            let _ = self.events.send(StoreEvent::Invalidated(key.clone()));
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
        let _ = self.events.send(StoreEvent::Cleared);
    }

    pub async fn collections(&self) -> Option<Vec<Collection>> {
        match self.get(&QueryKey::Collections).await?.value {
            QueryValue::Collections(collections) => Some(collections),
            _ => None,
        }
    }

    pub async fn collection(&self, id: &CollectionId) -> Option<Collection> {
        match self.get(&QueryKey::Collection(id.clone())).await?.value {
            QueryValue::Collection(collection) => collection,
            _ => None,
        }
    }

    pub async fn items(&self, collection_id: &CollectionId) -> Option<Vec<Item>> {
        match self.get(&QueryKey::Items(collection_id.clone())).await?.value {
            QueryValue::Items(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
