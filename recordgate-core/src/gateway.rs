//! The generic CRUD façade over a collection handle.
//!
//! [`RecordGateway`] binds a record type `T` to a primary collection handle
//! and, optionally, a parent handle used to redirect reads and searches. It
//! exposes six operations — create, read, update, replace, search, remove —
//! each a single delegation with a fixed option policy. The gateway performs
//! no validation, no retries, and no logging; results and errors are exactly
//! the handle's.
//!
//! # Example
//!
//! ```ignore
//! use recordgate::{RecordGateway, Filter, Patch, memory::MemoryStore};
//!
//! # async fn example() -> recordgate::error::GatewayResult<()> {
//! let store = MemoryStore::new();
//! let gateway = RecordGateway::new(store.collection::<User>());
//!
//! let user = gateway.create(User::new("alice")).await?;
//! let found = gateway.read(Filter::id(*user.id())).await?;
//! # Ok(()) }
//! ```

use std::marker::PhantomData;

use crate::{
    error::GatewayResult,
    filter::{Filter, Patch},
    handle::{CollectionHandle, DynCollectionHandle, ReplaceOptions, UpdateOptions},
    record::{Record, RecordId},
};

/// A generic record gateway: a uniform, narrow CRUD façade over one primary
/// collection handle, or a primary plus parent pair.
///
/// The gateway is stateless beyond the two handles and never mutates them
/// after construction, so concurrent calls on one instance are independent
/// and safe by construction.
///
/// # Type Parameters
///
/// * `T` - The record type flowing through the gateway
/// * `H` - The collection handle type (a concrete backend handle, a
///   reference to one, or [`DynCollectionHandle`])
#[derive(Debug)]
pub struct RecordGateway<T: Record, H: CollectionHandle<T>> {
    primary: H,
    parent: Option<H>,
    _marker: PhantomData<fn() -> T>,
}

/// A gateway over a type-erased, shared handle.
pub type DynRecordGateway<T> = RecordGateway<T, DynCollectionHandle<T>>;

impl<T: Record, H: CollectionHandle<T>> RecordGateway<T, H> {
    /// Creates a gateway over a single primary handle.
    pub fn new(primary: H) -> Self {
        Self { primary, parent: None, _marker: PhantomData }
    }

    /// Creates a gateway whose reads and searches are redirected to `parent`.
    ///
    /// All mutations (create/update/replace/remove) still target `primary`.
    /// This models a discriminator/inheritance pairing where point lookups
    /// should see the wider parent collection.
    pub fn with_parent(primary: H, parent: H) -> Self {
        Self { primary, parent: Some(parent), _marker: PhantomData }
    }

    /// Persists a new record.
    ///
    /// # Errors
    ///
    /// Propagates the handle's failure unchanged (e.g. a validation
    /// rejection).
    pub async fn create(&self, data: T) -> GatewayResult<T> {
        self.primary.create(data).await
    }

    /// Applies `patch` to the first record matching `filter`, additionally
    /// removing every field named in `unset`.
    ///
    /// The unset fields are merged into the patch before delegation, so the
    /// whole instruction is applied atomically. Returns the post-mutation
    /// record, or `None` if nothing matched.
    pub async fn update(
        &self,
        filter: Filter,
        mut patch: Patch,
        unset: &[&str],
    ) -> GatewayResult<Option<T>> {
        for field in unset {
            patch = patch.unset(*field);
        }

        self.primary
            .find_one_and_update(filter, patch, UpdateOptions::default())
            .await
    }

    /// Fully substitutes the contents of the record with identity `id`.
    ///
    /// The identity field is preserved by the backend. Returns the
    /// post-mutation record, or `None` if no record has that identity.
    pub async fn replace(&self, id: RecordId, data: T) -> GatewayResult<Option<T>> {
        self.primary
            .find_one_and_replace(id, data, ReplaceOptions::default())
            .await
    }

    /// Returns the first record matching `filter`, or `None`.
    ///
    /// Served from the parent handle when one is configured.
    pub async fn read(&self, filter: Filter) -> GatewayResult<Option<T>> {
        match &self.parent {
            Some(parent) => parent.find_one(filter).await,
            None => self.primary.find_one(filter).await,
        }
    }

    /// Returns all records matching `filter`, in the handle's natural order.
    ///
    /// Served from the parent handle when one is configured.
    pub async fn search(&self, filter: Filter) -> GatewayResult<Vec<T>> {
        match &self.parent {
            Some(parent) => parent.find(filter).await,
            None => self.primary.find(filter).await,
        }
    }

    /// Deletes the record with identity `id` and returns its last state, or
    /// `None` if no record has that identity.
    pub async fn remove(&self, id: RecordId) -> GatewayResult<Option<T>> {
        self.primary
            .find_one_and_delete(Filter::id(id))
            .await
    }
}
