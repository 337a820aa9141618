use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Collection, CollectionId, Item, ItemId},
    protocol::{
        CollectionData, CollectionInput, CollectionItemsVariables, CollectionsData,
        CreateCollectionData, CreateItemData, CreateItemInput, DeleteCollectionData,
        DeleteItemData, DeleteResult, GraphqlRequest, GraphqlResponse, IdInputVariables,
        IdVariables, InputVariables, ItemsData, NoVariables, Operation, UpdateCollectionData,
        UpdateItemData, UpdateItemInput,
    },
};
use tracing::debug;

use crate::{config::ClientSettings, error::ClientError, CollectionsApi};

/// GraphQL over HTTP POST.
pub struct GraphqlTransport {
    http: Client,
    endpoint: String,
}

impl GraphqlTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::with_client(http, settings.graphql_url.clone()))
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<V, T>(&self, operation: Operation, variables: V) -> Result<T, ClientError>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        debug!(
            operation = operation.name(),
            endpoint = %self.endpoint,
            "graphql request"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphqlRequest::new(operation, variables))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        // GraphQL servers may report errors with a non-2xx status; the body
        // decides before the status does.
        match serde_json::from_slice::<GraphqlResponse<T>>(&body) {
            Ok(GraphqlResponse {
                errors: Some(errors),
                ..
            }) if !errors.is_empty() => Err(ClientError::server(operation.name(), &errors)),
            _ if !status.is_success() => Err(ClientError::Transport(format!(
                "http status {status} from {}",
                self.endpoint
            ))),
            Ok(GraphqlResponse { data: Some(data), .. }) => Ok(data),
            Ok(GraphqlResponse { data: None, .. }) => {
                Err(ClientError::server(operation.name(), &[]))
            }
            Err(err) => Err(ClientError::Transport(format!(
                "undecodable response from {}: {err}",
                self.endpoint
            ))),
        }
    }
}

#[async_trait]
impl CollectionsApi for GraphqlTransport {
    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        let data: CollectionsData = self
            .execute(Operation::GetCollections, NoVariables {})
            .await?;
        Ok(data.collections.into_iter().map(Collection::from).collect())
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, ClientError> {
        let data: CollectionData = self
            .execute(
                Operation::GetCollection,
                IdVariables { id: id.to_string() },
            )
            .await?;
        Ok(data.collection.map(Collection::from))
    }

    async fn list_items(&self, collection_id: &CollectionId) -> Result<Vec<Item>, ClientError> {
        let data: ItemsData = self
            .execute(
                Operation::GetCollectionItems,
                CollectionItemsVariables {
                    collection_id: collection_id.to_string(),
                },
            )
            .await?;
        data.items
            .into_iter()
            .map(|record| Item::try_from(record).map_err(ClientError::from))
            .collect()
    }

    async fn create_collection(&self, input: CollectionInput) -> Result<Collection, ClientError> {
        let data: CreateCollectionData = self
            .execute(Operation::CreateCollection, InputVariables { input })
            .await?;
        Ok(data.create_collection.into())
    }

    async fn update_collection(
        &self,
        id: &CollectionId,
        input: CollectionInput,
    ) -> Result<Collection, ClientError> {
        let data: UpdateCollectionData = self
            .execute(
                Operation::UpdateCollection,
                IdInputVariables {
                    id: id.to_string(),
                    input,
                },
            )
            .await?;
        Ok(data.update_collection.into())
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<DeleteResult, ClientError> {
        let data: DeleteCollectionData = self
            .execute(
                Operation::DeleteCollection,
                IdVariables { id: id.to_string() },
            )
            .await?;
        Ok(data.delete_collection)
    }

    async fn create_item(&self, input: CreateItemInput) -> Result<Item, ClientError> {
        let data: CreateItemData = self
            .execute(Operation::CreateItem, InputVariables { input })
            .await?;
        Ok(Item::try_from(data.create_item)?)
    }

    async fn update_item(&self, id: &ItemId, input: UpdateItemInput) -> Result<Item, ClientError> {
        let data: UpdateItemData = self
            .execute(
                Operation::UpdateItem,
                IdInputVariables {
                    id: id.to_string(),
                    input,
                },
            )
            .await?;
        Ok(Item::try_from(data.update_item)?)
    }

    async fn delete_item(&self, id: &ItemId) -> Result<DeleteResult, ClientError> {
        let data: DeleteItemData = self
            .execute(Operation::DeleteItem, IdVariables { id: id.to_string() })
            .await?;
        Ok(data.delete_item)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
