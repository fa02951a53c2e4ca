//! In-memory collection backend for recordgate.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `CollectionHandle` trait. It uses async-aware read-write locks for
//! concurrent access and is ideal for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Type-erased storage** - Rows are stored as BSON for flexibility
//! - **Deterministic order** - Searches return rows in insertion order
//!
//! # Quick Start
//!
//! ```ignore
//! use recordgate::{Record, RecordId, RecordGateway, memory::MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(rename = "_id")]
//!     pub id: RecordId,
//!     pub name: String,
//! }
//!
//! impl Record for User {
//!     fn id(&self) -> &RecordId { &self.id }
//!     fn collection_name() -> &'static str { "users" }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     let gateway = RecordGateway::new(store.collection::<User>());
//!
//!     let user = User {
//!         id: RecordId::new(),
//!         name: "Alice".to_string(),
//!     };
//!
//!     gateway.create(user).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordgate_memory;

pub mod evaluator;
pub mod store;

pub use store::{MemoryCollection, MemoryStore};
