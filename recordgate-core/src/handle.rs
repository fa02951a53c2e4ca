//! Collection capability abstraction consumed by the gateway.
//!
//! This module defines the narrow trait a persistence backend implements to be
//! driven by a [`RecordGateway`](crate::gateway::RecordGateway). The trait
//! enumerates exactly the operations the gateway delegates — nothing more —
//! so all host-library dependence is localized to one adapter boundary per
//! backend.
//!
//! Implementations are required to be thread-safe (`Send + Sync`); the
//! gateway holds no mutable state, so all ordering and isolation guarantees
//! for concurrent calls are the handle's responsibility.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::GatewayResult,
    filter::{Filter, Patch},
    record::{Record, RecordId},
};

/// Options for a find-and-update operation.
///
/// The gateway always passes the fixed policy `{ return_updated: true,
/// overwrite_discriminator: true }`; the struct exists so the policy is an
/// explicit, inspectable part of the handle contract rather than backend
/// folklore.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    /// Return the post-mutation record rather than the pre-mutation state.
    pub return_updated: bool,
    /// Allow the patch to change the collection's discriminator field, if
    /// the backend models one. Backends without discriminators ignore this.
    pub overwrite_discriminator: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self { return_updated: true, overwrite_discriminator: true }
    }
}

/// Options for a find-and-replace operation.
#[derive(Debug, Clone, Copy)]
pub struct ReplaceOptions {
    /// Return the post-mutation record rather than the pre-mutation state.
    pub return_updated: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self { return_updated: true }
    }
}

/// Capability over a named collection of records of type `T`.
///
/// This is the only external interface the gateway consumes. Every method is
/// a single asynchronous operation whose result or error the gateway passes
/// through unchanged; a point operation that matches nothing resolves to
/// `Ok(None)`, never an error.
#[async_trait]
pub trait CollectionHandle<T: Record>: Send + Sync {
    /// Persists a new record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`](crate::error::GatewayError::Validation)
    /// if the record violates the backend's constraints (including duplicate
    /// identity where the backend enforces it).
    async fn create(&self, data: T) -> GatewayResult<T>;

    /// Returns the first record matching `filter`, or `None`.
    async fn find_one(&self, filter: Filter) -> GatewayResult<Option<T>>;

    /// Returns all records matching `filter`, in the backend's natural order.
    async fn find(&self, filter: Filter) -> GatewayResult<Vec<T>>;

    /// Applies `patch` to the first record matching `filter`.
    ///
    /// Returns the record (post- or pre-mutation state per
    /// `options.return_updated`), or `None` if nothing matched.
    async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: Patch,
        options: UpdateOptions,
    ) -> GatewayResult<Option<T>>;

    /// Replaces the contents of the record with identity `id`.
    ///
    /// The stored identity is preserved regardless of the identity carried by
    /// `data`. Returns `None` if no record has that identity.
    async fn find_one_and_replace(
        &self,
        id: RecordId,
        data: T,
        options: ReplaceOptions,
    ) -> GatewayResult<Option<T>>;

    /// Deletes the first record matching `filter` and returns its last state,
    /// or `None` if nothing matched.
    async fn find_one_and_delete(&self, filter: Filter) -> GatewayResult<Option<T>>;
}

#[async_trait]
impl<T, H> CollectionHandle<T> for &H
where
    T: Record,
    H: CollectionHandle<T>,
{
    async fn create(&self, data: T) -> GatewayResult<T> {
        (*self).create(data).await
    }

    async fn find_one(&self, filter: Filter) -> GatewayResult<Option<T>> {
        (*self).find_one(filter).await
    }

    async fn find(&self, filter: Filter) -> GatewayResult<Vec<T>> {
        (*self).find(filter).await
    }

    async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: Patch,
        options: UpdateOptions,
    ) -> GatewayResult<Option<T>> {
        (*self)
            .find_one_and_update(filter, patch, options)
            .await
    }

    async fn find_one_and_replace(
        &self,
        id: RecordId,
        data: T,
        options: ReplaceOptions,
    ) -> GatewayResult<Option<T>> {
        (*self)
            .find_one_and_replace(id, data, options)
            .await
    }

    async fn find_one_and_delete(&self, filter: Filter) -> GatewayResult<Option<T>> {
        (*self).find_one_and_delete(filter).await
    }
}

#[async_trait]
impl<T, H> CollectionHandle<T> for Arc<H>
where
    T: Record,
    H: CollectionHandle<T> + ?Sized,
{
    async fn create(&self, data: T) -> GatewayResult<T> {
        (**self).create(data).await
    }

    async fn find_one(&self, filter: Filter) -> GatewayResult<Option<T>> {
        (**self).find_one(filter).await
    }

    async fn find(&self, filter: Filter) -> GatewayResult<Vec<T>> {
        (**self).find(filter).await
    }

    async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: Patch,
        options: UpdateOptions,
    ) -> GatewayResult<Option<T>> {
        (**self)
            .find_one_and_update(filter, patch, options)
            .await
    }

    async fn find_one_and_replace(
        &self,
        id: RecordId,
        data: T,
        options: ReplaceOptions,
    ) -> GatewayResult<Option<T>> {
        (**self)
            .find_one_and_replace(id, data, options)
            .await
    }

    async fn find_one_and_delete(&self, filter: Filter) -> GatewayResult<Option<T>> {
        (**self).find_one_and_delete(filter).await
    }
}

/// A shared, type-erased collection handle.
///
/// Useful when the concrete backend is chosen at runtime; a
/// [`RecordGateway`](crate::gateway::RecordGateway) parameterized over this
/// alias works with any backend.
pub type DynCollectionHandle<T> = Arc<dyn CollectionHandle<T>>;
