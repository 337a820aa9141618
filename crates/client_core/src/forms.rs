//! Input buffers and submit state behind the create/edit dialogs.
//!
//! Buffers survive a failed submit so the user can retry without retyping.
//! A successful create clears them; a successful edit keeps what was saved.

use shared::domain::{Collection, CollectionId, Item, ItemBody, ItemId, ItemKind};

use crate::{
    coordinator::{ConsistencyCoordinator, MutationOutcome},
    error::{ClientError, Field, MutationError, ValidationError},
    mutation::{CollectionDraft, ItemDraft, MutatedEntity, Mutation},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

fn optional(buffer: &str) -> Option<String> {
    Some(buffer.to_string()).filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionForm {
    editing: Option<Collection>,
    pub title: String,
    pub image: String,
    phase: FormPhase,
    field_error: Option<ValidationError>,
}

impl CollectionForm {
    pub fn create() -> Self {
        Self {
            editing: None,
            title: String::new(),
            image: String::new(),
            phase: FormPhase::Idle,
            field_error: None,
        }
    }

    pub fn edit(collection: &Collection) -> Self {
        let mut form = Self::create();
        form.editing = Some(collection.clone());
        form.reset();
        form
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        self.field_error.as_ref().filter(|err| err.field == field)
    }

    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Pending && !self.title.trim().is_empty()
    }

    /// Refills the buffers from the collection being edited.
    pub fn reset(&mut self) {
        match &self.editing {
            Some(collection) => {
                self.title = collection.title.clone();
                self.image = collection.image.clone().unwrap_or_default();
            }
            None => {
                self.title.clear();
                self.image.clear();
            }
        }
        self.phase = FormPhase::Idle;
        self.field_error = None;
    }

    pub fn mutation(&self) -> Mutation {
        let draft = CollectionDraft::new(self.title.clone(), optional(&self.image));
        match &self.editing {
            Some(collection) => Mutation::UpdateCollection {
                id: collection.id.clone(),
                draft,
            },
            None => Mutation::CreateCollection(draft),
        }
    }

    pub async fn submit(
        &mut self,
        coordinator: &ConsistencyCoordinator,
    ) -> Result<MutationOutcome, MutationError> {
        let mutation = self.mutation();
        if let Err(err) = mutation.validate() {
            self.field_error = Some(err.clone());
            return Err(err.into());
        }

        self.field_error = None;
        self.phase = FormPhase::Pending;
        let result = coordinator.submit_mutation(mutation).await;
        self.finish(&result);
        result
    }

    fn finish(&mut self, result: &Result<MutationOutcome, MutationError>) {
        match result {
            Ok(outcome) => {
                if let MutatedEntity::Collection(saved) = &outcome.entity {
                    if self.editing.is_some() {
                        self.editing = Some(saved.clone());
                    }
                }
                self.reset();
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: &ClientError) {
        if let ClientError::Validation(validation) = err {
            self.field_error = Some(validation.clone());
            self.phase = FormPhase::Idle;
        } else {
            self.phase = FormPhase::Failed(err.user_message());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    collection_id: CollectionId,
    editing: Option<Item>,
    kind: ItemKind,
    pub title: String,
    pub url: String,
    pub image: String,
    pub content: String,
    phase: FormPhase,
    field_error: Option<ValidationError>,
}

impl ItemForm {
    /// New items start on the link tab.
    pub fn create(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            editing: None,
            kind: ItemKind::Link,
            title: String::new(),
            url: String::new(),
            image: String::new(),
            content: String::new(),
            phase: FormPhase::Idle,
            field_error: None,
        }
    }

    pub fn edit(item: &Item) -> Self {
        let mut form = Self::create(item.collection_id.clone());
        form.kind = item.kind();
        form.editing = Some(item.clone());
        form.reset();
        form
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn editing(&self) -> Option<&ItemId> {
        self.editing.as_ref().map(|item| &item.id)
    }

    /// Switches tabs on a create form. An item's kind is fixed once saved.
    pub fn select_kind(&mut self, kind: ItemKind) -> bool {
        if self.editing.is_some() {
            return false;
        }
        self.kind = kind;
        self.field_error = None;
        true
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        self.field_error.as_ref().filter(|err| err.field == field)
    }

    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Pending
            && !self.title.trim().is_empty()
            && (self.kind != ItemKind::Link || !self.url.trim().is_empty())
    }

    pub fn reset(&mut self) {
        match &self.editing {
            Some(item) => {
                self.title = item.title.clone();
                self.url = item.url().unwrap_or_default().to_string();
                self.image = item.image.clone().unwrap_or_default();
                self.content = item.content().unwrap_or_default().to_string();
            }
            None => {
                self.title.clear();
                self.url.clear();
                self.image.clear();
                self.content.clear();
            }
        }
        self.phase = FormPhase::Idle;
        self.field_error = None;
    }

    pub fn mutation(&self) -> Mutation {
        let body = match self.kind {
            ItemKind::Link => ItemBody::Link {
                url: self.url.clone(),
            },
            ItemKind::Diary => ItemBody::Diary {
                content: self.content.clone(),
            },
        };
        let draft = ItemDraft {
            title: self.title.clone(),
            image: optional(&self.image),
            body,
        };
        match &self.editing {
            Some(item) => Mutation::UpdateItem {
                id: item.id.clone(),
                collection_id: self.collection_id.clone(),
                draft,
            },
            None => Mutation::CreateItem {
                collection_id: self.collection_id.clone(),
                draft,
            },
        }
    }

    pub async fn submit(
        &mut self,
        coordinator: &ConsistencyCoordinator,
    ) -> Result<MutationOutcome, MutationError> {
        let mutation = self.mutation();
        if let Err(err) = mutation.validate() {
            self.field_error = Some(err.clone());
            return Err(err.into());
        }

        self.field_error = None;
        self.phase = FormPhase::Pending;
        let result = coordinator.submit_mutation(mutation).await;
        self.finish(&result);
        result
    }

    fn finish(&mut self, result: &Result<MutationOutcome, MutationError>) {
        match result {
            Ok(outcome) => {
                if let MutatedEntity::Item(saved) = &outcome.entity {
                    if self.editing.is_some() {
                        self.editing = Some(saved.clone());
                    }
                }
                self.reset();
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: &ClientError) {
        if let ClientError::Validation(validation) = err {
            self.field_error = Some(validation.clone());
            self.phase = FormPhase::Idle;
        } else {
            self.phase = FormPhase::Failed(err.user_message());
        }
    }
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
