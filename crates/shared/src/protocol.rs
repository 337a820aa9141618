use serde::{Deserialize, Serialize};

use crate::{
    domain::{Collection, CollectionId, Item, ItemBody, ItemId, ItemKind},
    error::{GraphqlError, RecordError},
};

macro_rules! collection_fields {
    () => {
        "fragment CollectionFields on Collection { id title image createdAt itemCount }"
    };
}

macro_rules! collection_detail_fields {
    () => {
        "fragment CollectionDetailFields on Collection { id title image createdAt }"
    };
}

macro_rules! item_fields {
    () => {
        "fragment ItemFields on Item { id title type url image content createdAt collectionId }"
    };
}

pub const GET_COLLECTIONS: &str = concat!(
    "query GetCollections { collections { ...CollectionFields } }\n",
    collection_fields!()
);

pub const GET_COLLECTION: &str = concat!(
    "query GetCollection($id: ID!) { collection(id: $id) { ...CollectionDetailFields } }\n",
    collection_detail_fields!()
);

pub const GET_COLLECTION_ITEMS: &str = concat!(
    "query GetCollectionItems($collectionId: ID!) { items(collectionId: $collectionId) { ...ItemFields } }\n",
    item_fields!()
);

pub const CREATE_COLLECTION: &str = concat!(
    "mutation CreateCollection($input: CreateCollectionInput!) { createCollection(input: $input) { ...CollectionFields } }\n",
    collection_fields!()
);

pub const UPDATE_COLLECTION: &str = concat!(
    "mutation UpdateCollection($id: ID!, $input: UpdateCollectionInput!) { updateCollection(id: $id, input: $input) { ...CollectionFields } }\n",
    collection_fields!()
);

pub const DELETE_COLLECTION: &str =
    "mutation DeleteCollection($id: ID!) { deleteCollection(id: $id) { id success } }";

pub const CREATE_ITEM: &str = concat!(
    "mutation CreateItem($input: CreateItemInput!) { createItem(input: $input) { ...ItemFields } }\n",
    item_fields!()
);

pub const UPDATE_ITEM: &str = concat!(
    "mutation UpdateItem($id: ID!, $input: UpdateItemInput!) { updateItem(id: $id, input: $input) { ...ItemFields } }\n",
    item_fields!()
);

pub const DELETE_ITEM: &str =
    "mutation DeleteItem($id: ID!) { deleteItem(id: $id) { id success } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetCollections,
    GetCollection,
    GetCollectionItems,
    CreateCollection,
    UpdateCollection,
    DeleteCollection,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::GetCollections => "GetCollections",
            Self::GetCollection => "GetCollection",
            Self::GetCollectionItems => "GetCollectionItems",
            Self::CreateCollection => "CreateCollection",
            Self::UpdateCollection => "UpdateCollection",
            Self::DeleteCollection => "DeleteCollection",
            Self::CreateItem => "CreateItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
        }
    }

    pub fn document(self) -> &'static str {
        match self {
            Self::GetCollections => GET_COLLECTIONS,
            Self::GetCollection => GET_COLLECTION,
            Self::GetCollectionItems => GET_COLLECTION_ITEMS,
            Self::CreateCollection => CREATE_COLLECTION,
            Self::UpdateCollection => UPDATE_COLLECTION,
            Self::DeleteCollection => DELETE_COLLECTION,
            Self::CreateItem => CREATE_ITEM,
            Self::UpdateItem => UPDATE_ITEM,
            Self::DeleteItem => DELETE_ITEM,
        }
    }

    pub fn is_mutation(self) -> bool {
        !matches!(
            self,
            Self::GetCollections | Self::GetCollection | Self::GetCollectionItems
        )
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::GetCollections,
            Self::GetCollection,
            Self::GetCollectionItems,
            Self::CreateCollection,
            Self::UpdateCollection,
            Self::DeleteCollection,
            Self::CreateItem,
            Self::UpdateItem,
            Self::DeleteItem,
        ]
        .into_iter()
        .find(|operation| operation.name() == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<V> {
    pub query: String,
    pub operation_name: String,
    pub variables: V,
}

impl<V> GraphqlRequest<V> {
    pub fn new(operation: Operation, variables: V) -> Self {
        Self {
            query: operation.document().to_string(),
            operation_name: operation.name().to_string(),
            variables,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    pub fn errors(errors: Vec<GraphqlError>) -> Self {
        Self {
            data: None,
            errors: Some(errors),
        }
    }
}

// Variables

/// Serializes as `{}` for operations without arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoVariables {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdVariables {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemsVariables {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputVariables<I> {
    pub input: I,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInputVariables<I> {
    pub id: String,
    pub input: I,
}

/// Shared by `CreateCollectionInput` and `UpdateCollectionInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub collection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// Records

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub item_count: Option<u32>,
}

impl From<CollectionRecord> for Collection {
    fn from(record: CollectionRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            image: record.image,
            created_at: record.created_at,
            item_count: record.item_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: String,
    pub collection_id: CollectionId,
}

impl TryFrom<ItemRecord> for Item {
    type Error = RecordError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let body = match ItemKind::parse(&record.kind) {
            Some(ItemKind::Link) => match record.url {
                Some(url) if !url.trim().is_empty() => ItemBody::Link { url },
                _ => return Err(RecordError::MissingUrl { id: record.id }),
            },
            Some(ItemKind::Diary) => ItemBody::Diary {
                content: record.content.unwrap_or_default(),
            },
            None => {
                return Err(RecordError::UnknownItemKind {
                    id: record.id,
                    kind: record.kind,
                })
            }
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            body,
            image: record.image,
            created_at: record.created_at,
            collection_id: record.collection_id,
        })
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind().as_str().to_string(),
            url: item.url().map(str::to_string),
            image: item.image.clone(),
            content: item.content().map(str::to_string),
            created_at: item.created_at.clone(),
            collection_id: item.collection_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub id: String,
    pub success: bool,
}

// Response payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsData {
    pub collections: Vec<CollectionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionData {
    pub collection: Option<CollectionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsData {
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionData {
    pub create_collection: CollectionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionData {
    pub update_collection: CollectionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCollectionData {
    pub delete_collection: DeleteResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemData {
    pub create_item: ItemRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemData {
    pub update_item: ItemRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemData {
    pub delete_item: DeleteResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_embed_their_fragments() {
        assert!(GET_COLLECTIONS.contains("fragment CollectionFields on Collection"));
        assert!(GET_COLLECTION.contains("...CollectionDetailFields"));
        assert!(GET_COLLECTION.contains("fragment CollectionDetailFields"));
        assert!(UPDATE_ITEM.contains("fragment ItemFields on Item"));
        assert!(!DELETE_ITEM.contains("fragment"));
    }

    #[test]
    fn operation_names_round_trip() {
        for name in ["GetCollections", "CreateItem", "DeleteCollection"] {
            let operation = Operation::from_name(name).expect("known operation");
            assert_eq!(operation.name(), name);
        }
        assert!(Operation::from_name("Subscribe").is_none());
        assert!(Operation::UpdateItem.is_mutation());
        assert!(!Operation::GetCollectionItems.is_mutation());
    }

    #[test]
    fn create_item_input_omits_absent_fields() {
        let input = CreateItemInput {
            title: "Notes".into(),
            kind: ItemKind::Diary,
            url: None,
            image: None,
            content: Some("<p>hi</p>".into()),
            collection_id: "c1".into(),
        };
        let json = serde_json::to_value(GraphqlRequest::new(
            Operation::CreateItem,
            InputVariables { input },
        ))
        .expect("serialize");

        assert_eq!(json["operationName"], "CreateItem");
        assert_eq!(json["variables"]["input"]["type"], "diary");
        assert_eq!(json["variables"]["input"]["collectionId"], "c1");
        assert!(json["variables"]["input"].get("url").is_none());
        assert!(json["variables"]["input"].get("image").is_none());
    }

    #[test]
    fn link_record_without_url_is_rejected() {
        let record: ItemRecord = serde_json::from_value(serde_json::json!({
            "id": "i1",
            "title": "Broken",
            "type": "link",
            "url": null,
            "createdAt": "2024-01-05T00:00:00Z",
            "collectionId": "c1"
        }))
        .expect("record");

        assert_eq!(
            Item::try_from(record),
            Err(RecordError::MissingUrl {
                id: ItemId::new("i1")
            })
        );
    }

    #[test]
    fn diary_record_without_content_becomes_empty_diary() {
        let record: ItemRecord = serde_json::from_value(serde_json::json!({
            "id": "i2",
            "title": "Quiet day",
            "type": "diary",
            "createdAt": "2024-01-05T00:00:00Z",
            "collectionId": "c1"
        }))
        .expect("record");

        let item = Item::try_from(record).expect("item");
        assert_eq!(item.kind(), ItemKind::Diary);
        assert_eq!(item.content(), Some(""));
        assert_eq!(item.url(), None);
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let record = ItemRecord {
            id: ItemId::new("i3"),
            title: "Video".into(),
            kind: "video".into(),
            url: None,
            image: None,
            content: None,
            created_at: "2024-01-05".into(),
            collection_id: CollectionId::new("c1"),
        };

        assert!(matches!(
            Item::try_from(record),
            Err(RecordError::UnknownItemKind { kind, .. }) if kind == "video"
        ));
    }

    #[test]
    fn response_errors_decode_with_code() {
        let response: GraphqlResponse<CollectionsData> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"boom","extensions":{"code":"INTERNAL"}}]}"#,
        )
        .expect("decode");

        assert!(response.data.is_none());
        let errors = response.errors.expect("errors");
        assert_eq!(errors[0].message, "boom");
        assert_eq!(errors[0].code(), Some("INTERNAL"));
    }

    fn decode_envelope<T: serde::de::DeserializeOwned>(raw: &str) -> GraphqlResponse<T> {
        serde_json::from_str(raw).expect("decode")
    }

    #[test]
    fn envelope_decodes_for_any_payload_without_default() {
        let response: GraphqlResponse<DeleteItemData> =
            decode_envelope(r#"{"errors":[{"message":"denied"}]}"#);
        assert!(response.data.is_none());
        assert_eq!(response.errors.map(|errors| errors.len()), Some(1));

        let response: GraphqlResponse<DeleteItemData> =
            decode_envelope(r#"{"data":{"deleteItem":{"id":"i1","success":true}}}"#);
        assert!(response.errors.is_none());
        assert!(response.data.expect("data").delete_item.success);
    }
}
