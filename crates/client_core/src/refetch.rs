//! Which cached queries each mutation makes stale.

use std::fmt;

use shared::{domain::CollectionId, protocol::Operation};

use crate::store::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateCollection,
    UpdateCollection,
    DeleteCollection,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl MutationKind {
    pub const ALL: [MutationKind; 6] = [
        Self::CreateCollection,
        Self::UpdateCollection,
        Self::DeleteCollection,
        Self::CreateItem,
        Self::UpdateItem,
        Self::DeleteItem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateCollection => "create_collection",
            Self::UpdateCollection => "update_collection",
            Self::DeleteCollection => "delete_collection",
            Self::CreateItem => "create_item",
            Self::UpdateItem => "update_item",
            Self::DeleteItem => "delete_item",
        }
    }

    /// The GraphQL operation that carries this mutation.
    pub fn operation(self) -> Operation {
        match self {
            Self::CreateCollection => Operation::CreateCollection,
            Self::UpdateCollection => Operation::UpdateCollection,
            Self::DeleteCollection => Operation::DeleteCollection,
            Self::CreateItem => Operation::CreateItem,
            Self::UpdateItem => Operation::UpdateItem,
            Self::DeleteItem => Operation::DeleteItem,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query family, resolved to a concrete [`QueryKey`] with the ids of the
/// mutation that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefetchTarget {
    CollectionList,
    SingleCollection,
    ItemList,
}

pub const REFETCH_POLICY: &[(MutationKind, &[RefetchTarget])] = &[
    (MutationKind::CreateCollection, &[RefetchTarget::CollectionList]),
    (
        MutationKind::UpdateCollection,
        &[RefetchTarget::CollectionList, RefetchTarget::SingleCollection],
    ),
    (MutationKind::DeleteCollection, &[RefetchTarget::CollectionList]),
    (MutationKind::CreateItem, &[RefetchTarget::ItemList]),
    (MutationKind::UpdateItem, &[RefetchTarget::ItemList]),
    (MutationKind::DeleteItem, &[RefetchTarget::ItemList]),
];

/// Ids a mutation carries for resolving its targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefetchScope {
    /// The collection being mutated, or the owner of the item being mutated.
    pub collection_id: Option<CollectionId>,
}

pub fn targets_for(kind: MutationKind) -> &'static [RefetchTarget] {
    REFETCH_POLICY
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Targets that need an id the scope lacks are dropped.
pub fn refetch_keys(kind: MutationKind, scope: &RefetchScope) -> Vec<QueryKey> {
    targets_for(kind)
        .iter()
        .filter_map(|target| match target {
            RefetchTarget::CollectionList => Some(QueryKey::Collections),
            RefetchTarget::SingleCollection => {
                scope.collection_id.clone().map(QueryKey::Collection)
            }
            RefetchTarget::ItemList => scope.collection_id.clone().map(QueryKey::Items),
        })
        .collect()
}
