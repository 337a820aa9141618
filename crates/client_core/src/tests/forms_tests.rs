use std::sync::Arc;

use shared::domain::ItemBody;

use super::*;
use crate::{fake_api::FakeApi, store::QueryStore};

fn coordinator(api: &Arc<FakeApi>) -> ConsistencyCoordinator {
    ConsistencyCoordinator::new(api.clone(), Arc::new(QueryStore::new()))
}

#[tokio::test]
async fn failed_edit_keeps_buffers_and_server_state() {
    let api = Arc::new(FakeApi::new());
    let saved = api.seed_collection("Recipes").await;
    let coordinator = coordinator(&api);

    let mut form = CollectionForm::edit(&saved);
    assert_eq!(form.title, "Recipes");
    form.title = "Weeknight recipes".into();

    api.fail_mutations_with(ClientError::Transport("connection reset".into()))
        .await;
    let err = form.submit(&coordinator).await.expect_err("transport");
    assert_eq!(err.kind(), shared::error::ErrorKind::Transport);
    assert_eq!(form.title, "Weeknight recipes");
    assert!(matches!(form.phase(), FormPhase::Failed(_)));
    assert!(form.can_submit());

    let listed = coordinator.collections().await.expect("reload");
    assert_eq!(listed[0].title, "Recipes");

    api.heal().await;
    form.submit(&coordinator).await.expect("retry");
    assert_eq!(form.phase(), &FormPhase::Idle);
    assert_eq!(form.title, "Weeknight recipes");
}

#[tokio::test]
async fn successful_create_clears_the_form() {
    let api = Arc::new(FakeApi::new());
    let coordinator = coordinator(&api);

    let mut form = CollectionForm::create();
    form.title = "Travel".into();
    form.image = "https://img.test/t.png".into();
    form.submit(&coordinator).await.expect("created");

    assert_eq!(form, CollectionForm::create());
    coordinator.settle().await;
    let listed = coordinator.store().collections().await.expect("refetched");
    assert_eq!(listed[0].image.as_deref(), Some("https://img.test/t.png"));
}

#[tokio::test]
async fn blank_title_marks_the_field_without_calling_the_api() {
    let api = Arc::new(FakeApi::new());
    let coordinator = coordinator(&api);

    let mut form = CollectionForm::create();
    form.title = "   ".into();
    assert!(!form.can_submit());
    form.submit(&coordinator).await.expect_err("validation");

    assert_eq!(
        form.field_error(Field::Title),
        Some(&ValidationError::empty_title())
    );
    assert_eq!(form.field_error(Field::Url), None);
    assert_eq!(form.phase(), &FormPhase::Idle);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn link_form_requires_url_and_diary_form_does_not() {
    let api = Arc::new(FakeApi::new());
    let collection = api.seed_collection("Mixed").await;
    let coordinator = coordinator(&api);

    let mut form = ItemForm::create(collection.id.clone());
    assert_eq!(form.kind(), ItemKind::Link);
    form.title = "Someday".into();
    assert!(!form.can_submit());
    form.submit(&coordinator).await.expect_err("missing url");
    assert_eq!(
        form.field_error(Field::Url),
        Some(&ValidationError::empty_url())
    );

    assert!(form.select_kind(ItemKind::Diary));
    assert_eq!(form.field_error(Field::Url), None);
    assert!(form.can_submit());
    form.submit(&coordinator).await.expect("diary created");
    assert_eq!(form.title, "");
    assert_eq!(api.count_calls("create_item").await, 1);
}

#[tokio::test]
async fn editing_an_item_locks_its_kind_and_prefills() {
    let api = Arc::new(FakeApi::new());
    let collection = api.seed_collection("Links").await;
    let item = api
        .seed_item(
            &collection.id,
            "Docs",
            ItemBody::Link {
                url: "https://docs.rs".into(),
            },
            "2024-02-10T12:00:00Z",
        )
        .await;
    let coordinator = coordinator(&api);

    let mut form = ItemForm::edit(&item);
    assert_eq!(form.editing(), Some(&item.id));
    assert_eq!(form.url, "https://docs.rs");
    assert!(!form.select_kind(ItemKind::Diary));
    assert_eq!(form.kind(), ItemKind::Link);

    form.url = "https://docs.rs/tokio".into();
    let outcome = form.submit(&coordinator).await.expect("updated");
    assert_eq!(
        outcome.refetch,
        vec![crate::store::QueryKey::Items(collection.id.clone())]
    );
    assert_eq!(form.url, "https://docs.rs/tokio");
    assert_eq!(form.phase(), &FormPhase::Idle);
}

#[tokio::test]
async fn failed_item_create_surfaces_generic_message() {
    let api = Arc::new(FakeApi::new());
    let collection = api.seed_collection("Journal").await;
    let coordinator = coordinator(&api);
    api.fail_mutations_with(ClientError::Server {
        operation: "CreateItem",
        message: "internal".into(),
    })
    .await;

    let mut form = ItemForm::create(collection.id.clone());
    form.select_kind(ItemKind::Diary);
    form.title = "Tuesday".into();
    form.content = "<p>notes</p>".into();
    form.submit(&coordinator).await.expect_err("server");

    assert_eq!(
        form.phase(),
        &FormPhase::Failed("Something went wrong. Please try again later.".into())
    );
    assert_eq!(form.content, "<p>notes</p>");

    form.reset();
    assert_eq!(form.phase(), &FormPhase::Idle);
    assert_eq!(form.content, "");
}

#[tokio::test]
async fn failed_item_edit_keeps_buffers_then_refills_from_saved_item() {
    let api = Arc::new(FakeApi::new());
    let collection = api.seed_collection("Journal").await;
    let entry = api
        .seed_item(
            &collection.id,
            "Sunday",
            ItemBody::Diary {
                content: "<p>quiet</p>".into(),
            },
            "2024-05-05T08:00:00Z",
        )
        .await;
    let coordinator = coordinator(&api);

    let mut form = ItemForm::edit(&entry);
    form.content = "<p>busy</p>".into();
    api.fail_mutations_with(ClientError::Transport("offline".into()))
        .await;
    form.submit(&coordinator).await.expect_err("offline");
    assert_eq!(
        form.phase(),
        &FormPhase::Failed("We couldn't reach your collections. Please try again later.".into())
    );
    assert_eq!(form.content, "<p>busy</p>");

    api.heal().await;
    form.submit(&coordinator).await.expect("saved");
    assert_eq!(form.phase(), &FormPhase::Idle);

    form.content = "scratch".into();
    form.reset();
    assert_eq!(form.content, "<p>busy</p>");
}
