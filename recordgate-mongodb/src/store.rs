//! MongoDB-backed collection handles.
//!
//! [`MongoStore`] owns the client and database name; [`MongoCollection`] is
//! the typed [`CollectionHandle`] over one named collection. Every gateway
//! operation maps onto the driver's native command of the same shape, so
//! point mutations are atomic on the server and nothing is re-implemented
//! client-side.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client,
    Collection,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, ReturnDocument},
};

use recordgate_core::{
    error::{GatewayError, GatewayResult},
    filter::{Filter, Patch},
    handle::{CollectionHandle, ReplaceOptions, UpdateOptions},
    record::{Record, RecordExt, RecordId},
};

use crate::query::MongoFilterTranslator;

/// Classifies a driver error into the gateway taxonomy.
///
/// Write and argument rejections surface as validation failures, connectivity
/// problems as transport failures; everything else passes through verbatim as
/// a backend failure.
fn map_error(err: MongoError) -> GatewayError {
    match *err.kind {
        ErrorKind::Write(_) | ErrorKind::InvalidArgument { .. } => {
            GatewayError::Validation(err.to_string())
        }
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => GatewayError::Transport(err.to_string()),
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            GatewayError::Serialization(err.to_string())
        }
        _ => GatewayError::Backend(err.to_string()),
    }
}

/// Builds the `$set`/`$unset` update document for a patch.
///
/// An entirely empty patch is refused: the server would treat an empty update
/// document as a full replace with an empty document.
fn update_document(patch: &Patch) -> GatewayResult<Document> {
    let mut update = Document::new();

    if !patch.set_fields().is_empty() {
        update.insert("$set", patch.set_fields().clone());
    }
    if !patch.unset_fields().is_empty() {
        let mut unset = Document::new();
        for field in patch.unset_fields() {
            unset.insert(field.clone(), "");
        }
        update.insert("$unset", unset);
    }

    if update.is_empty() {
        return Err(GatewayError::Validation(
            "empty patch: nothing to set or unset".to_string(),
        ));
    }

    Ok(update)
}

/// A MongoDB-backed store from which typed collection handles are obtained.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Creates a store over an already-connected client.
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// Creates a builder that connects from a connection string.
    pub fn builder(dsn: &str, database: &str) -> MongoStoreBuilder {
        MongoStoreBuilder::new(dsn, database)
    }

    /// Returns a typed handle over the collection named by
    /// `T::collection_name()`.
    pub fn collection<T: Record>(&self) -> MongoCollection<T> {
        self.collection_named(T::collection_name())
    }

    /// Returns a typed handle over an explicitly named collection.
    ///
    /// Useful for parent/child collection pairings where two handles of the
    /// same record type address different collections.
    pub fn collection_named<T: Record>(&self, name: &str) -> MongoCollection<T> {
        MongoCollection {
            collection: self
                .client
                .database(&self.database)
                .collection::<T>(name),
        }
    }

    /// Cleanly shuts down the client, releasing all connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// A typed MongoDB collection handle.
#[derive(Clone)]
pub struct MongoCollection<T: Record> {
    collection: Collection<T>,
}

impl<T: Record> MongoCollection<T> {
    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl<T: Record> CollectionHandle<T> for MongoCollection<T> {
    async fn create(&self, data: T) -> GatewayResult<T> {
        self.collection
            .insert_one(&data)
            .await
            .map_err(map_error)?;

        Ok(data)
    }

    async fn find_one(&self, filter: Filter) -> GatewayResult<Option<T>> {
        self.collection
            .find_one(MongoFilterTranslator::translate(&filter)?)
            .await
            .map_err(map_error)
    }

    async fn find(&self, filter: Filter) -> GatewayResult<Vec<T>> {
        self.collection
            .find(MongoFilterTranslator::translate(&filter)?)
            .await
            .map_err(map_error)?
            .try_collect::<Vec<T>>()
            .await
            .map_err(map_error)
    }

    async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: Patch,
        options: UpdateOptions,
    ) -> GatewayResult<Option<T>> {
        // No discriminator concept in the bare driver; the
        // overwrite_discriminator flag is accepted and ignored.
        self.collection
            .find_one_and_update(
                MongoFilterTranslator::translate(&filter)?,
                update_document(&patch)?,
            )
            .return_document(if options.return_updated {
                ReturnDocument::After
            } else {
                ReturnDocument::Before
            })
            .await
            .map_err(map_error)
    }

    async fn find_one_and_replace(
        &self,
        id: RecordId,
        data: T,
        options: ReplaceOptions,
    ) -> GatewayResult<Option<T>> {
        let mut replacement = data.to_bson()?;

        // The stored identity wins; a replacement carrying a different _id
        // would otherwise be rejected by the server as an immutable-field
        // write.
        if let Some(doc) = replacement.as_document_mut() {
            doc.insert("_id", id);
        }
        let replacement = replacement
            .as_document()
            .cloned()
            .ok_or_else(|| {
                GatewayError::Serialization("record did not serialize to a document".to_string())
            })?;

        let result = self
            .collection
            .clone_with_type::<Document>()
            .find_one_and_replace(doc! { "_id": id }, replacement)
            .return_document(if options.return_updated {
                ReturnDocument::After
            } else {
                ReturnDocument::Before
            })
            .await
            .map_err(map_error)?;

        match result {
            Some(doc) => Ok(Some(T::from_bson(doc.into())?)),
            None => Ok(None),
        }
    }

    async fn find_one_and_delete(&self, filter: Filter) -> GatewayResult<Option<T>> {
        self.collection
            .find_one_and_delete(MongoFilterTranslator::translate(&filter)?)
            .await
            .map_err(map_error)
    }
}

/// Builder connecting a [`MongoStore`] from a connection string.
pub struct MongoStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }

    /// Parses the connection string and returns a connected store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the connection string cannot be
    /// parsed or the client cannot be constructed.
    pub async fn build(self) -> GatewayResult<MongoStore> {
        Ok(MongoStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| GatewayError::Transport(e.to_string()))?,
            )
            .map_err(|e| GatewayError::Transport(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_document_merges_set_and_unset() {
        let patch = Patch::new()
            .set("tag", "y")
            .unset("name");
        let update = update_document(&patch).unwrap();

        assert_eq!(
            update,
            doc! {
                "$set": { "tag": "y" },
                "$unset": { "name": "" },
            },
        );
    }

    #[test]
    fn update_document_refuses_empty_patch() {
        let err = update_document(&Patch::new()).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }
}
