//! Core traits and types for record representation and serialization.
//!
//! This module provides the fundamental trait that all persisted records must implement,
//! as well as utilities for converting records between formats (BSON, JSON).

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::GatewayResult;

/// Unique identity of a persisted record.
///
/// A 12-byte object id, generated by the caller at construction time
/// (`RecordId::new()`). The identity field of a record must serialize under
/// the key `_id` so that backends can address it uniformly.
pub type RecordId = bson::oid::ObjectId;

/// Core trait that all records handled by a [`RecordGateway`](crate::gateway::RecordGateway)
/// must implement.
///
/// This trait defines the minimal interface required for a type to be used as a record.
/// Every record carries its own identity and names the collection it belongs to.
/// The gateway never inspects a record beyond this trait; structure and validation
/// belong to the caller and the backend.
///
/// # Deriving
///
/// `Record` can be derived with `#[derive(Record)]` from `recordgate-macros`, or
/// implemented by hand. Either way the identity field must be serde-renamed to `_id`.
///
/// # Example
///
/// ```ignore
/// use recordgate::{Record, RecordId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     #[serde(rename = "_id")]
///     pub id: RecordId,
///     pub name: String,
///     pub email: String,
/// }
///
/// impl Record for User {
///     fn id(&self) -> &RecordId {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "users"
///     }
/// }
/// ```
pub trait Record: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this record's unique identity.
    fn id(&self) -> &RecordId;

    /// Returns the name of the collection this record belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "users", "products").
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for records.
///
/// Automatically implemented for all types that implement [`Record`]. Backends use
/// these methods to move records across the BSON boundary.
pub trait RecordExt: Record {
    /// Converts this record to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> GatewayResult<Bson>;

    /// Creates a record from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> GatewayResult<Self>;

    /// Converts this record to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> GatewayResult<Value>;

    /// Creates a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> GatewayResult<Self>;
}

impl<T: Record> RecordExt for T {
    fn to_bson(&self) -> GatewayResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> GatewayResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> GatewayResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> GatewayResult<Self> {
        Ok(from_value(value)?)
    }
}
