use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::normalize_graphql_url,
    forms::{CollectionForm, ItemForm},
    group_by_month, load_settings,
    view::{delete_collection_prompt, delete_item_prompt},
    ConsistencyCoordinator, GraphqlTransport, Mutation, QueryStore,
};
use shared::domain::{CollectionId, ItemId, ItemKind};

mod render;

#[derive(Parser, Debug)]
#[command(about = "Browse and edit collections of links and diary entries")]
struct Args {
    /// Overrides `graphql_url` from client.toml and the environment.
    #[arg(long)]
    graphql_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every collection.
    Collections,
    /// Show one collection with its items grouped by month.
    Show { collection_id: String },
    /// Create a collection.
    AddCollection {
        #[arg(long)]
        title: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Rename a collection or change its image.
    EditCollection {
        collection_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a collection and all its items.
    DeleteCollection {
        collection_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Save a link into a collection.
    AddLink {
        collection_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Write a diary entry into a collection.
    AddDiary {
        collection_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Change an item's title, image, url or content.
    EditItem {
        collection_id: String,
        item_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete one item.
    DeleteItem {
        collection_id: String,
        item_id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = &args.graphql_url {
        settings.graphql_url = url.clone();
    }
    settings.graphql_url = normalize_graphql_url(&settings.graphql_url)?;

    let transport =
        GraphqlTransport::new(&settings).context("failed to build the http client")?;
    tracing::info!(endpoint = transport.endpoint(), "using graphql endpoint");
    let coordinator =
        ConsistencyCoordinator::new(Arc::new(transport), Arc::new(QueryStore::new()));

    run(&coordinator, args.command).await?;
    coordinator.settle().await;
    Ok(())
}

async fn run(coordinator: &ConsistencyCoordinator, command: Command) -> Result<()> {
    match command {
        Command::Collections => {
            let collections = coordinator
                .collections()
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            print!("{}", render::collections_grid(&collections));
        }
        Command::Show { collection_id } => {
            show(coordinator, &CollectionId::new(collection_id)).await?;
        }
        Command::AddCollection { title, image } => {
            let mut form = CollectionForm::create();
            form.title = title;
            form.image = image.unwrap_or_default();
            submit_collection(coordinator, &mut form).await?;
            coordinator.settle().await;
            let collections = coordinator.store().collections().await.unwrap_or_default();
            print!("{}", render::collections_grid(&collections));
        }
        Command::EditCollection {
            collection_id,
            title,
            image,
        } => {
            let id = CollectionId::new(collection_id);
            let collection = find_collection(coordinator, &id).await?;
            let mut form = CollectionForm::edit(&collection);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(image) = image {
                form.image = image;
            }
            submit_collection(coordinator, &mut form).await?;
            coordinator.settle().await;
            println!("Saved \"{}\".", form.title);
        }
        Command::DeleteCollection { collection_id, yes } => {
            let id = CollectionId::new(collection_id);
            let collection = find_collection(coordinator, &id).await?;
            if !yes {
                println!("{}", delete_collection_prompt(&collection.title));
                bail!("re-run with --yes to confirm");
            }
            coordinator
                .submit_mutation(Mutation::DeleteCollection { id })
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            coordinator.settle().await;
            let collections = coordinator.store().collections().await.unwrap_or_default();
            print!("{}", render::collections_grid(&collections));
        }
        Command::AddLink {
            collection_id,
            title,
            url,
            image,
        } => {
            let id = CollectionId::new(collection_id);
            let mut form = ItemForm::create(id.clone());
            form.title = title;
            form.url = url;
            form.image = image.unwrap_or_default();
            submit_item(coordinator, &mut form).await?;
            show(coordinator, &id).await?;
        }
        Command::AddDiary {
            collection_id,
            title,
            content,
            image,
        } => {
            let id = CollectionId::new(collection_id);
            let mut form = ItemForm::create(id.clone());
            form.select_kind(ItemKind::Diary);
            form.title = title;
            form.content = content;
            form.image = image.unwrap_or_default();
            submit_item(coordinator, &mut form).await?;
            show(coordinator, &id).await?;
        }
        Command::EditItem {
            collection_id,
            item_id,
            title,
            url,
            content,
            image,
        } => {
            let collection_id = CollectionId::new(collection_id);
            let item_id = ItemId::new(item_id);
            let items = coordinator
                .items(&collection_id)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            let item = items
                .iter()
                .find(|item| item.id == item_id)
                .with_context(|| format!("no item {item_id} in collection {collection_id}"))?;

            let mut form = ItemForm::edit(item);
            if let Some(title) = title {
                form.title = title;
            }
            match (form.kind(), url, content) {
                (ItemKind::Link, Some(url), _) => form.url = url,
                (ItemKind::Diary, _, Some(content)) => form.content = content,
                (ItemKind::Link, None, Some(_)) => bail!("links have no content to edit"),
                (ItemKind::Diary, Some(_), None) => bail!("diary entries have no url"),
                _ => {}
            }
            if let Some(image) = image {
                form.image = image;
            }
            submit_item(coordinator, &mut form).await?;
            show(coordinator, &collection_id).await?;
        }
        Command::DeleteItem {
            collection_id,
            item_id,
            yes,
        } => {
            let collection_id = CollectionId::new(collection_id);
            let id = ItemId::new(item_id);
            let items = coordinator
                .items(&collection_id)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            let item = items
                .iter()
                .find(|item| item.id == id)
                .with_context(|| format!("no item {id} in collection {collection_id}"))?;
            if !yes {
                println!("{}", delete_item_prompt(&item.title));
                bail!("re-run with --yes to confirm");
            }
            coordinator
                .submit_mutation(Mutation::DeleteItem {
                    id,
                    collection_id: collection_id.clone(),
                })
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            show(coordinator, &collection_id).await?;
        }
    }
    Ok(())
}

async fn find_collection(
    coordinator: &ConsistencyCoordinator,
    id: &CollectionId,
) -> Result<shared::domain::Collection> {
    coordinator
        .collection(id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?
        .with_context(|| format!("collection {id} not found"))
}

async fn show(coordinator: &ConsistencyCoordinator, id: &CollectionId) -> Result<()> {
    coordinator.settle().await;
    let mut collection = find_collection(coordinator, id).await?;
    let items = coordinator
        .items(id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    if collection.item_count.is_none() {
        collection.item_count = u32::try_from(items.len()).ok();
    }
    print!(
        "{}",
        render::collection_page(&collection, &group_by_month(items))
    );
    Ok(())
}

async fn submit_collection(
    coordinator: &ConsistencyCoordinator,
    form: &mut CollectionForm,
) -> Result<()> {
    if let Err(err) = form.submit(coordinator).await {
        tracing::debug!("collection form rejected: {err}");
        bail!("{}", err.user_message());
    }
    Ok(())
}

async fn submit_item(coordinator: &ConsistencyCoordinator, form: &mut ItemForm) -> Result<()> {
    if let Err(err) = form.submit(coordinator).await {
        tracing::debug!("item form rejected: {err}");
        bail!("{}", err.user_message());
    }
    Ok(())
}
