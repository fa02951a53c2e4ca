//! MongoDB collection backend for recordgate.
//!
//! This crate provides a MongoDB-based implementation of the
//! `CollectionHandle` trait, delegating every gateway operation to the
//! corresponding native `findOneAnd*` command so point mutations are atomic
//! on the server.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! recordgate = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! A connection string and database name are provided through the builder;
//! no process-wide connection state is assumed.
//!
//! # Example
//!
//! ```ignore
//! use recordgate::{RecordGateway, mongodb::MongoStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoStore::builder("mongodb://localhost:27017", "my_database")
//!         .build()
//!         .await?;
//!
//!     let gateway = RecordGateway::new(store.collection::<User>());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordgate_mongodb;

pub mod query;
pub mod store;

pub use store::{MongoCollection, MongoStore, MongoStoreBuilder};
