//! A typed record-gateway abstraction over document-oriented storage.
//!
//! This crate is the core of the recordgate project and provides:
//!
//! - **Record traits** ([`record`]) - Core traits for defining and serializing records
//! - **Collection capability** ([`handle`]) - The trait a persistence backend implements
//! - **Filters and patches** ([`filter`]) - Declarative match predicates and atomic field updates
//! - **The gateway** ([`gateway`]) - The generic CRUD façade delegating to a collection handle
//! - **Error handling** ([`error`]) - Error and result types shared across backends
//!
//! # Example
//!
//! ```ignore
//! use recordgate::{Record, RecordId, RecordGateway};
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
//!     fn id(&self) -> &RecordId {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordgate_core;

pub mod error;
pub mod filter;
pub mod gateway;
pub mod handle;
pub mod record;
