//! In-memory collection handles backed by shared BSON row storage.
//!
//! [`MemoryStore`] owns the shared state; [`MemoryCollection`] is the typed
//! [`CollectionHandle`] view over one named collection. Rows are kept in
//! insertion order so `find`'s natural ordering is deterministic.

use std::{collections::HashMap, marker::PhantomData, sync::Arc};

use bson::Bson;
use async_trait::async_trait;
use mea::rwlock::RwLock;

use recordgate_core::{
    error::{GatewayError, GatewayResult},
    filter::{Filter, Patch},
    handle::{CollectionHandle, ReplaceOptions, UpdateOptions},
    record::{Record, RecordExt, RecordId},
};

use crate::evaluator::RowEvaluator;

type Rows = Vec<(RecordId, Bson)>;
type StoreMap = HashMap<String, Rows>;

/// Thread-safe in-memory row storage shared by all collections of a store.
///
/// `MemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones and every [`MemoryCollection`] obtained from it share the same
/// underlying data. All access goes through an async-aware read-write lock;
/// every handle operation takes the lock exactly once, so each operation is
/// atomic with respect to concurrent callers.
///
/// # Performance
///
/// Lookups scan the collection's rows in insertion order (no indexing). For
/// development and test datasets this is fine; for anything larger, use a
/// persistent backend.
///
/// # Example
///
/// ```ignore
/// use recordgate::{RecordGateway, memory::MemoryStore};
///
/// let store = MemoryStore::new();
/// let gateway = RecordGateway::new(store.collection::<User>());
/// ```
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self { store: Arc::new(RwLock::new(StoreMap::new())) }
    }

    /// Returns a typed handle over the collection named by
    /// `T::collection_name()`.
    pub fn collection<T: Record>(&self) -> MemoryCollection<T> {
        self.collection_named(T::collection_name())
    }

    /// Returns a typed handle over an explicitly named collection.
    ///
    /// Useful for parent/child collection pairings where two handles of the
    /// same record type address different collections.
    pub fn collection_named<T: Record>(&self, name: &str) -> MemoryCollection<T> {
        MemoryCollection {
            name: name.to_string(),
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

/// A typed in-memory collection handle.
///
/// Obtained from [`MemoryStore::collection`]; all handles from the same
/// store share its row storage.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    name: String,
    store: Arc<RwLock<StoreMap>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> MemoryCollection<T> {
    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Applies a patch to a stored row: assignments first, then removals.
///
/// The identity key is left alone on both sides; a patch never moves a row.
fn apply_patch(row: &mut Bson, patch: &Patch) {
    if let Some(doc) = row.as_document_mut() {
        for (field, value) in patch.set_fields() {
            if field != "_id" {
                doc.insert(field.clone(), value.clone());
            }
        }
        for field in patch.unset_fields() {
            if field != "_id" {
                doc.remove(field);
            }
        }
    }
}

#[async_trait]
impl<T: Record> CollectionHandle<T> for MemoryCollection<T> {
    async fn create(&self, data: T) -> GatewayResult<T> {
        let row = data.to_bson()?;
        let mut store = self.store.write().await;
        let rows = store
            .entry(self.name.clone())
            .or_default();

        if rows.iter().any(|(id, _)| id == data.id()) {
            return Err(GatewayError::Validation(format!(
                "record {} already exists in collection {}",
                data.id(),
                self.name,
            )));
        }

        rows.push((*data.id(), row));

        Ok(data)
    }

    async fn find_one(&self, filter: Filter) -> GatewayResult<Option<T>> {
        let store = self.store.read().await;
        let rows = match store.get(&self.name) {
            Some(rows) => rows,
            None => return Ok(None),
        };

        for (_, row) in rows {
            if RowEvaluator::new(row).matches(&filter)? {
                return Ok(Some(T::from_bson(row.clone())?));
            }
        }

        Ok(None)
    }

    async fn find(&self, filter: Filter) -> GatewayResult<Vec<T>> {
        let store = self.store.read().await;
        let rows = match store.get(&self.name) {
            Some(rows) => rows,
            None => return Ok(vec![]),
        };

        let mut matched = Vec::new();

        for (_, row) in rows {
            if RowEvaluator::new(row).matches(&filter)? {
                matched.push(T::from_bson(row.clone())?);
            }
        }

        Ok(matched)
    }

    async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: Patch,
        options: UpdateOptions,
    ) -> GatewayResult<Option<T>> {
        let mut store = self.store.write().await;
        let rows = match store.get_mut(&self.name) {
            Some(rows) => rows,
            None => return Ok(None),
        };

        for (_, row) in rows.iter_mut() {
            if RowEvaluator::new(row).matches(&filter)? {
                let previous = row.clone();
                apply_patch(row, &patch);

                let result = if options.return_updated {
                    row.clone()
                } else {
                    previous
                };

                return Ok(Some(T::from_bson(result)?));
            }
        }

        Ok(None)
    }

    async fn find_one_and_replace(
        &self,
        id: RecordId,
        data: T,
        options: ReplaceOptions,
    ) -> GatewayResult<Option<T>> {
        let mut replacement = data.to_bson()?;

        // The stored identity wins over whatever the replacement carries.
        if let Some(doc) = replacement.as_document_mut() {
            doc.insert("_id", id);
        }

        let mut store = self.store.write().await;
        let rows = match store.get_mut(&self.name) {
            Some(rows) => rows,
            None => return Ok(None),
        };

        match rows.iter().position(|(row_id, _)| *row_id == id) {
            Some(index) => {
                let (_, row) = &mut rows[index];
                let previous = std::mem::replace(row, replacement);

                let result = if options.return_updated {
                    row.clone()
                } else {
                    previous
                };

                Ok(Some(T::from_bson(result)?))
            }
            None => Ok(None),
        }
    }

    async fn find_one_and_delete(&self, filter: Filter) -> GatewayResult<Option<T>> {
        let mut store = self.store.write().await;
        let rows = match store.get_mut(&self.name) {
            Some(rows) => rows,
            None => return Ok(None),
        };

        let mut matched = None;

        for (index, (_, row)) in rows.iter().enumerate() {
            if RowEvaluator::new(row).matches(&filter)? {
                matched = Some(index);
                break;
            }
        }

        match matched {
            Some(index) => {
                let (_, removed) = rows.remove(index);

                Ok(Some(T::from_bson(removed)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Pet {
        #[serde(rename = "_id")]
        id: RecordId,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    }

    impl Record for Pet {
        fn id(&self) -> &RecordId {
            &self.id
        }

        fn collection_name() -> &'static str {
            "pets"
        }
    }

    fn pet(name: &str) -> Pet {
        Pet {
            id: RecordId::new(),
            name: name.to_string(),
            tag: Some("x".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_find_roundtrip() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        let found = handle
            .find_one(Filter::id(stored.id))
            .await
            .unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_identity() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        let err = handle.create(stored).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn find_preserves_insertion_order() {
        let handle = MemoryStore::new().collection::<Pet>();

        for name in ["a", "b", "c"] {
            handle.create(pet(name)).await.unwrap();
        }

        let all = handle
            .find(Filter::exists("name"))
            .await
            .unwrap();
        let names = all
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn update_sets_and_unsets_atomically() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        let patch = Patch::new()
            .set("name", "max")
            .unset("tag");
        let updated = handle
            .find_one_and_update(Filter::id(stored.id), patch, UpdateOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "max");
        assert_eq!(updated.tag, None);
        assert_eq!(updated.id, stored.id);
    }

    #[tokio::test]
    async fn update_can_return_previous_state() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        let options = UpdateOptions { return_updated: false, ..Default::default() };
        let previous = handle
            .find_one_and_update(
                Filter::id(stored.id),
                Patch::new().set("name", "max"),
                options,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(previous.name, "rex");

        let current = handle
            .find_one(Filter::id(stored.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.name, "max");
    }

    #[tokio::test]
    async fn update_without_match_is_none() {
        let handle = MemoryStore::new().collection::<Pet>();

        let result = handle
            .find_one_and_update(
                Filter::id(RecordId::new()),
                Patch::new().set("name", "max"),
                UpdateOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn replace_preserves_stored_identity() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        // Replacement carries a different id; the stored one must win.
        let replaced = handle
            .find_one_and_replace(stored.id, pet("max"), ReplaceOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced.id, stored.id);
        assert_eq!(replaced.name, "max");
    }

    #[tokio::test]
    async fn delete_returns_last_state_and_removes() {
        let handle = MemoryStore::new().collection::<Pet>();
        let stored = handle.create(pet("rex")).await.unwrap();

        let removed = handle
            .find_one_and_delete(Filter::id(stored.id))
            .await
            .unwrap();
        assert_eq!(removed, Some(stored.clone()));

        let gone = handle
            .find_one(Filter::id(stored.id))
            .await
            .unwrap();
        assert_eq!(gone, None);
    }

    #[tokio::test]
    async fn handles_share_store_state() {
        let store = MemoryStore::new();
        let writer = store.collection::<Pet>();
        let reader = store.collection::<Pet>();

        let stored = writer.create(pet("rex")).await.unwrap();
        let found = reader
            .find_one(Filter::id(stored.id))
            .await
            .unwrap();
        assert_eq!(found, Some(stored));
    }
}
