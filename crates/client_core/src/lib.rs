use async_trait::async_trait;
use shared::{
    domain::{Collection, CollectionId, Item, ItemId},
    protocol::{CollectionInput, CreateItemInput, DeleteResult, UpdateItemInput},
};

pub mod config;
pub mod coordinator;
pub mod error;
pub mod forms;
pub mod mutation;
pub mod refetch;
pub mod store;
pub mod timeline;
pub mod transport;
pub mod view;

pub use config::{load_settings, ClientSettings};
pub use coordinator::{ConsistencyCoordinator, MutationOutcome};
pub use error::{ClientError, Field, MutationError, QueryError, ValidationError};
pub use mutation::{CollectionDraft, ItemDraft, MutatedEntity, Mutation};
pub use store::{QueryKey, QueryStore, QueryValue, StoreEvent};
pub use timeline::{group_by_month, Timeline, TimelineGroup};
pub use transport::GraphqlTransport;

/// The remote API as seen by the client. Every call is one atomic
/// request/response.
///
/// Deletes return the server's acknowledgement as is; a `success: false`
/// result is not an `Err` at this layer.
#[async_trait]
pub trait CollectionsApi: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError>;
    async fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, ClientError>;
    async fn list_items(&self, collection_id: &CollectionId) -> Result<Vec<Item>, ClientError>;
    async fn create_collection(&self, input: CollectionInput) -> Result<Collection, ClientError>;
    async fn update_collection(
        &self,
        id: &CollectionId,
        input: CollectionInput,
    ) -> Result<Collection, ClientError>;
    async fn delete_collection(&self, id: &CollectionId) -> Result<DeleteResult, ClientError>;
    async fn create_item(&self, input: CreateItemInput) -> Result<Item, ClientError>;
    async fn update_item(&self, id: &ItemId, input: UpdateItemInput) -> Result<Item, ClientError>;
    async fn delete_item(&self, id: &ItemId) -> Result<DeleteResult, ClientError>;
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
mod fake_api;
