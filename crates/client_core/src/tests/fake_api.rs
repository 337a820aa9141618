//! In-memory stand-in for the remote API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{Collection, CollectionId, Item, ItemBody, ItemId, ItemKind},
    error::RecordError,
    protocol::{CollectionInput, CreateItemInput, DeleteResult, UpdateItemInput},
};
use tokio::sync::{Mutex, Notify};

use crate::{error::ClientError, CollectionsApi};

#[derive(Default)]
struct FakeState {
    collections: Vec<Collection>,
    items: Vec<Item>,
    calls: Vec<&'static str>,
    mutation_failure: Option<ClientError>,
    reject_deletes: bool,
    corrupt_item_replies: bool,
    list_gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn reply_with(state: &FakeState, item: Item) -> Result<Item, ClientError> {
    if state.corrupt_item_replies {
        return Err(RecordError::MissingUrl { id: item.id }.into());
    }
    Ok(item)
}

fn not_found(operation: &'static str, id: &str) -> ClientError {
    ClientError::Server {
        operation,
        message: format!("{id} not found"),
    }
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn seed_collection(&self, title: &str) -> Collection {
        let collection = Collection {
            id: CollectionId::new(fresh_id()),
            title: title.to_string(),
            image: None,
            created_at: Utc::now().to_rfc3339(),
            item_count: Some(0),
        };
        self.state.lock().await.collections.push(collection.clone());
        collection
    }

    pub(crate) async fn seed_item(
        &self,
        collection_id: &CollectionId,
        title: &str,
        body: ItemBody,
        created_at: &str,
    ) -> Item {
        let item = Item {
            id: ItemId::new(fresh_id()),
            title: title.to_string(),
            body,
            image: None,
            created_at: created_at.to_string(),
            collection_id: collection_id.clone(),
        };
        self.state.lock().await.items.push(item.clone());
        item
    }

    /// Every mutation fails with `err` until [`FakeApi::heal`].
    pub(crate) async fn fail_mutations_with(&self, err: ClientError) {
        self.state.lock().await.mutation_failure = Some(err);
    }

    pub(crate) async fn heal(&self) {
        self.state.lock().await.mutation_failure = None;
    }

    pub(crate) async fn reject_deletes(&self) {
        self.state.lock().await.reject_deletes = true;
    }

    /// Item writes are applied, but their replies fail record conversion.
    pub(crate) async fn corrupt_item_replies(&self) {
        self.state.lock().await.corrupt_item_replies = true;
    }

    /// `list_collections` waits until the returned gate is notified.
    pub(crate) async fn hold_collection_lists(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().await.list_gate = Some(gate.clone());
        gate
    }

    pub(crate) async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn count_calls(&self, name: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    async fn begin_mutation(&self, name: &'static str) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(name);
        match &state.mutation_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionsApi for FakeApi {
    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        let gate = self.state.lock().await.list_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.state.lock().await;
        state.calls.push("list_collections");
        let items = state.items.clone();
        Ok(state
            .collections
            .iter()
            .map(|collection| {
                let count = items
                    .iter()
                    .filter(|item| item.collection_id == collection.id)
                    .count();
                Collection {
                    item_count: u32::try_from(count).ok(),
                    ..collection.clone()
                }
            })
            .collect())
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push("get_collection");
        Ok(state
            .collections
            .iter()
            .find(|collection| &collection.id == id)
            .map(|collection| Collection {
                item_count: None,
                ..collection.clone()
            }))
    }

    async fn list_items(&self, collection_id: &CollectionId) -> Result<Vec<Item>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push("list_items");
        Ok(state
            .items
            .iter()
            .filter(|item| &item.collection_id == collection_id)
            .cloned()
            .collect())
    }

    async fn create_collection(&self, input: CollectionInput) -> Result<Collection, ClientError> {
        self.begin_mutation("create_collection").await?;
        let collection = Collection {
            id: CollectionId::new(fresh_id()),
            title: input.title,
            image: input.image,
            created_at: Utc::now().to_rfc3339(),
            item_count: Some(0),
        };
        self.state.lock().await.collections.push(collection.clone());
        Ok(collection)
    }

    async fn update_collection(
        &self,
        id: &CollectionId,
        input: CollectionInput,
    ) -> Result<Collection, ClientError> {
        self.begin_mutation("update_collection").await?;
        let mut state = self.state.lock().await;
        let collection = state
            .collections
            .iter_mut()
            .find(|collection| &collection.id == id)
            .ok_or_else(|| not_found("UpdateCollection", id.as_str()))?;
        collection.title = input.title;
        collection.image = input.image;
        Ok(collection.clone())
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<DeleteResult, ClientError> {
        self.begin_mutation("delete_collection").await?;
        let mut state = self.state.lock().await;
        if state.reject_deletes {
            return Ok(DeleteResult {
                id: id.to_string(),
                success: false,
            });
        }
        state.collections.retain(|collection| &collection.id != id);
        state.items.retain(|item| &item.collection_id != id);
        Ok(DeleteResult {
            id: id.to_string(),
            success: true,
        })
    }

    async fn create_item(&self, input: CreateItemInput) -> Result<Item, ClientError> {
        self.begin_mutation("create_item").await?;
        let body = match input.kind {
            ItemKind::Link => ItemBody::Link {
                url: input.url.unwrap_or_default(),
            },
            ItemKind::Diary => ItemBody::Diary {
                content: input.content.unwrap_or_default(),
            },
        };
        let item = Item {
            id: ItemId::new(fresh_id()),
            title: input.title,
            body,
            image: input.image,
            created_at: Utc::now().to_rfc3339(),
            collection_id: CollectionId::new(input.collection_id),
        };
        let mut state = self.state.lock().await;
        state.items.push(item.clone());
        reply_with(&state, item)
    }

    async fn update_item(&self, id: &ItemId, input: UpdateItemInput) -> Result<Item, ClientError> {
        self.begin_mutation("update_item").await?;
        let mut state = self.state.lock().await;
        let item = state
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| not_found("UpdateItem", id.as_str()))?;
        item.title = input.title;
        item.image = input.image;
        match &mut item.body {
            ItemBody::Link { url } => {
                if let Some(new_url) = input.url {
                    *url = new_url;
                }
            }
            ItemBody::Diary { content } => {
                if let Some(new_content) = input.content {
                    *content = new_content;
                }
            }
        }
        let item = item.clone();
        reply_with(&state, item)
    }

    async fn delete_item(&self, id: &ItemId) -> Result<DeleteResult, ClientError> {
        self.begin_mutation("delete_item").await?;
        let mut state = self.state.lock().await;
        if state.reject_deletes {
            return Ok(DeleteResult {
                id: id.to_string(),
                success: false,
            });
        }
        state.items.retain(|item| &item.id != id);
        Ok(DeleteResult {
            id: id.to_string(),
            success: true,
        })
    }
}
