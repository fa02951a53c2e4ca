//! Main recordgate crate providing a typed record-gateway over document storage.
//!
//! This crate is the primary entry point for users of the recordgate project.
//! It re-exports the core types from the sub-crates and provides convenient
//! access to the storage backends.
//!
//! # Features
//!
//! - **Typed CRUD façade** - One generic gateway per logical collection, six operations
//! - **Backend-agnostic** - Any `CollectionHandle` implementation plugs in at construction
//! - **Parent redirection** - Reads and searches can be served from a wider parent collection
//! - **Pure pass-through** - Results and errors are the backend's, verbatim
//!
//! # Quick Start
//!
//! ```ignore
//! use recordgate::{prelude::*, memory::MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Record)]
//! #[record(collection = "users")]
//! pub struct User {
//!     #[serde(rename = "_id")]
//!     pub id: RecordId,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!     let gateway = RecordGateway::new(store.collection::<User>());
//!
//!     let user = User {
//!         id: RecordId::new(),
//!         name: "Alice".to_string(),
//!     };
//!
//!     // Create, then look the record back up by identity
//!     let created = gateway.create(user).await.unwrap();
//!     let found = gateway
//!         .read(Filter::id(*created.id()))
//!         .await
//!         .unwrap();
//!
//!     println!("Found user: {:?}", found);
//! }
//! ```
//!
//! # Updates and unsets
//!
//! An update is a filter, a patch, and a list of fields to remove, applied
//! atomically to the first matching record. The gateway always returns the
//! post-mutation state:
//!
//! ```ignore
//! let updated = gateway
//!     .update(
//!         Filter::id(id),
//!         Patch::new().set("tag", "y"),
//!         &["name"],
//!     )
//!     .await
//!     .unwrap();
//! ```
//!
//! # Parent redirection
//!
//! When a gateway is built with a parent handle, `read` and `search` are
//! served from the parent exclusively while all mutations keep targeting the
//! primary. This models a discriminator/inheritance pairing between a child
//! collection and the wider collection it participates in:
//!
//! ```ignore
//! let gateway = RecordGateway::with_parent(
//!     store.collection::<Admin>(),
//!     store.collection_named::<Admin>("users"),
//! );
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use recordgate_core::{error, filter, gateway, handle, record};

pub use recordgate_core::{
    filter::{Filter, Patch},
    gateway::RecordGateway,
    record::{Record, RecordId},
};

/// The `#[derive(Record)]` macro, sharing its name with the trait the way
/// serde's derives do.
pub use recordgate_macros::Record;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use recordgate_memory::{MemoryCollection, MemoryStore};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use recordgate_mongodb::{MongoCollection, MongoStore, MongoStoreBuilder};
}
