use shared::{
    domain::{Collection, CollectionId, Item, ItemBody, ItemId},
    protocol::{CollectionInput, CreateItemInput, UpdateItemInput},
};

use crate::{
    error::ValidationError,
    refetch::{MutationKind, RefetchScope},
};

fn trimmed_image(image: Option<String>) -> Option<String> {
    image
        .map(|image| image.trim().to_string())
        .filter(|image| !image.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
    pub title: String,
    pub image: Option<String>,
}

impl CollectionDraft {
    pub fn new(title: impl Into<String>, image: Option<String>) -> Self {
        Self {
            title: title.into(),
            image,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            image: trimmed_image(self.image),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_title());
        }
        Ok(())
    }

    pub fn to_input(&self) -> CollectionInput {
        CollectionInput {
            title: self.title.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub image: Option<String>,
    pub body: ItemBody,
}

impl ItemDraft {
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
            body: ItemBody::Link { url: url.into() },
        }
    }

    pub fn diary(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
            body: ItemBody::Diary {
                content: content.into(),
            },
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Diary content is rich text and is passed through untouched.
    pub fn normalized(self) -> Self {
        let body = match self.body {
            ItemBody::Link { url } => ItemBody::Link {
                url: url.trim().to_string(),
            },
            diary @ ItemBody::Diary { .. } => diary,
        };
        Self {
            title: self.title.trim().to_string(),
            image: trimmed_image(self.image),
            body,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_title());
        }
        if let ItemBody::Link { url } = &self.body {
            if url.trim().is_empty() {
                return Err(ValidationError::empty_url());
            }
        }
        Ok(())
    }

    pub fn create_input(&self, collection_id: &CollectionId) -> CreateItemInput {
        CreateItemInput {
            title: self.title.clone(),
            kind: self.body.kind(),
            url: self.body.url().map(str::to_string),
            image: self.image.clone(),
            content: self.body.content().map(str::to_string),
            collection_id: collection_id.to_string(),
        }
    }

    pub fn update_input(&self) -> UpdateItemInput {
        UpdateItemInput {
            title: self.title.clone(),
            url: self.body.url().map(str::to_string),
            image: self.image.clone(),
            content: self.body.content().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateCollection(CollectionDraft),
    UpdateCollection {
        id: CollectionId,
        draft: CollectionDraft,
    },
    DeleteCollection {
        id: CollectionId,
    },
    CreateItem {
        collection_id: CollectionId,
        draft: ItemDraft,
    },
    UpdateItem {
        id: ItemId,
        collection_id: CollectionId,
        draft: ItemDraft,
    },
    DeleteItem {
        id: ItemId,
        collection_id: CollectionId,
    },
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::CreateCollection(_) => MutationKind::CreateCollection,
            Self::UpdateCollection { .. } => MutationKind::UpdateCollection,
            Self::DeleteCollection { .. } => MutationKind::DeleteCollection,
            Self::CreateItem { .. } => MutationKind::CreateItem,
            Self::UpdateItem { .. } => MutationKind::UpdateItem,
            Self::DeleteItem { .. } => MutationKind::DeleteItem,
        }
    }

    pub fn scope(&self) -> RefetchScope {
        let collection_id = match self {
            Self::CreateCollection(_) => None,
            Self::UpdateCollection { id, .. } | Self::DeleteCollection { id } => Some(id.clone()),
            Self::CreateItem { collection_id, .. }
            | Self::UpdateItem { collection_id, .. }
            | Self::DeleteItem { collection_id, .. } => Some(collection_id.clone()),
        };
        RefetchScope { collection_id }
    }

    pub fn normalized(self) -> Self {
        match self {
            Self::CreateCollection(draft) => Self::CreateCollection(draft.normalized()),
            Self::UpdateCollection { id, draft } => Self::UpdateCollection {
                id,
                draft: draft.normalized(),
            },
            Self::CreateItem {
                collection_id,
                draft,
            } => Self::CreateItem {
                collection_id,
                draft: draft.normalized(),
            },
            Self::UpdateItem {
                id,
                collection_id,
                draft,
            } => Self::UpdateItem {
                id,
                collection_id,
                draft: draft.normalized(),
            },
            delete @ (Self::DeleteCollection { .. } | Self::DeleteItem { .. }) => delete,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::CreateCollection(draft) | Self::UpdateCollection { draft, .. } => {
                draft.validate()
            }
            Self::CreateItem { draft, .. } | Self::UpdateItem { draft, .. } => draft.validate(),
            Self::DeleteCollection { .. } | Self::DeleteItem { .. } => Ok(()),
        }
    }
}

/// What the server acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutatedEntity {
    Collection(Collection),
    Item(Item),
    Deleted { id: String },
}
