//! Mutations with declarative refetch-on-success.
//!
//! A mutation resolves once the server acknowledges the write. Before it
//! resolves, every query its [`MutationKind`] depends on is marked stale and a
//! re-fetch task is spawned for it. Those re-fetches run independently of the
//! caller; [`ConsistencyCoordinator::settle`] waits for them.
//!
//! A write the server committed but answered with a malformed record still
//! schedules its re-fetches before the `DataIntegrity` error is returned.

use std::sync::Arc;

use shared::{
    domain::{Collection, CollectionId, Item},
    protocol::DeleteResult,
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    error::{ClientError, MutationError, QueryError},
    mutation::{MutatedEntity, Mutation},
    refetch::{refetch_keys, MutationKind},
    store::{QueryKey, QueryStore, QueryValue},
    CollectionsApi,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    pub entity: MutatedEntity,
    /// Queries scheduled for re-fetch by this mutation.
    pub refetch: Vec<QueryKey>,
}

pub struct ConsistencyCoordinator {
    api: Arc<dyn CollectionsApi>,
    store: Arc<QueryStore>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl ConsistencyCoordinator {
    pub fn new(api: Arc<dyn CollectionsApi>, store: Arc<QueryStore>) -> Self {
        Self {
            api,
            store,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<QueryStore> {
        &self.store
    }

    pub async fn submit_mutation(
        &self,
        mutation: Mutation,
    ) -> Result<MutationOutcome, MutationError> {
        let mutation = mutation.normalized();
        mutation.validate()?;

        let kind = mutation.kind();
        let refetch = refetch_keys(kind, &mutation.scope());
        let entity = match self.send(&mutation).await {
            Ok(entity) => entity,
            Err(err) => {
                warn!(mutation = %kind, error_kind = %err.kind(), "mutation failed: {err}");
                // The server committed the write; only its reply was unreadable.
                if matches!(err, ClientError::DataIntegrity(_)) {
                    self.schedule_refetch(&refetch).await;
                }
                return Err(err);
            }
        };

        self.schedule_refetch(&refetch).await;
        info!(
            mutation = %kind,
            refetch = ?refetch.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "mutation acknowledged"
        );

        Ok(MutationOutcome {
            kind,
            entity,
            refetch,
        })
    }

    async fn send(&self, mutation: &Mutation) -> Result<MutatedEntity, ClientError> {
        let entity = match mutation {
            Mutation::CreateCollection(draft) => {
                MutatedEntity::Collection(self.api.create_collection(draft.to_input()).await?)
            }
            Mutation::UpdateCollection { id, draft } => MutatedEntity::Collection(
                self.api.update_collection(id, draft.to_input()).await?,
            ),
            Mutation::DeleteCollection { id } => {
                let result = self.api.delete_collection(id).await?;
                acknowledged(mutation.kind(), result)?
            }
            Mutation::CreateItem {
                collection_id,
                draft,
            } => MutatedEntity::Item(
                self.api
                    .create_item(draft.create_input(collection_id))
                    .await?,
            ),
            Mutation::UpdateItem { id, draft, .. } => {
                MutatedEntity::Item(self.api.update_item(id, draft.update_input()).await?)
            }
            Mutation::DeleteItem { id, .. } => {
                let result = self.api.delete_item(id).await?;
                acknowledged(mutation.kind(), result)?
            }
        };
        Ok(entity)
    }

    async fn schedule_refetch(&self, keys: &[QueryKey]) {
        self.store.invalidate(keys).await;

        let mut pending = self.pending.lock().await;
        pending.retain(|task| !task.is_finished());
        for key in keys {
            let api = Arc::clone(&self.api);
            let store = Arc::clone(&self.store);
            let key = key.clone();
            pending.push(tokio::spawn(async move {
                if let Err(err) = refresh(api.as_ref(), &store, &key).await {
                    warn!(query = %key, error_kind = %err.kind(), "refetch failed: {err}");
                }
            }));
        }
    }

    /// Waits for every re-fetch scheduled so far, including ones scheduled
    /// while waiting. Mutations are never blocked by a running `settle`.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.pending.lock().await);
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(err) = task.await {
                    warn!("refetch task aborted: {err}");
                }
            }
        }
    }

    /// Network fetch that replaces the cached entry on success.
    pub async fn fetch(&self, key: &QueryKey) -> Result<QueryValue, QueryError> {
        refresh(self.api.as_ref(), &self.store, key).await
    }

    pub async fn cached(&self, key: &QueryKey) -> Option<QueryValue> {
        self.store.get(key).await.map(|entry| entry.value)
    }

    pub async fn collections(&self) -> Result<Vec<Collection>, QueryError> {
        match self.fetch(&QueryKey::Collections).await? {
            QueryValue::Collections(collections) => Ok(collections),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn collection(&self, id: &CollectionId) -> Result<Option<Collection>, QueryError> {
        match self.fetch(&QueryKey::Collection(id.clone())).await? {
            QueryValue::Collection(collection) => Ok(collection),
            _ => Ok(None),
        }
    }

    pub async fn items(&self, collection_id: &CollectionId) -> Result<Vec<Item>, QueryError> {
        match self.fetch(&QueryKey::Items(collection_id.clone())).await? {
            QueryValue::Items(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }
}

fn acknowledged(kind: MutationKind, result: DeleteResult) -> Result<MutatedEntity, ClientError> {
    if result.success {
        Ok(MutatedEntity::Deleted { id: result.id })
    } else {
        Err(ClientError::Server {
            operation: kind.operation().name(),
            message: format!("delete of {} was not applied", result.id),
        })
    }
}

async fn refresh(
    api: &dyn CollectionsApi,
    store: &QueryStore,
    key: &QueryKey,
) -> Result<QueryValue, QueryError> {
    let value = match key {
        QueryKey::Collections => QueryValue::Collections(api.list_collections().await?),
        QueryKey::Collection(id) => QueryValue::Collection(api.get_collection(id).await?),
        QueryKey::Items(collection_id) => QueryValue::Items(api.list_items(collection_id).await?),
    };
    store.replace(key.clone(), value.clone()).await;
    Ok(value)
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
