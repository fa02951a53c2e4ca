//! Convenient re-exports of commonly used types from recordgate.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use recordgate::prelude::*;
//! ```
//!
//! This provides access to:
//! - The gateway and its handle capability trait
//! - Record traits and the derive macro
//! - Filter and patch construction
//! - Error types

pub use recordgate_core::{
    error::{GatewayError, GatewayResult},
    filter::{FieldOp, Filter, FilterVisitor, Patch},
    gateway::{DynRecordGateway, RecordGateway},
    handle::{CollectionHandle, DynCollectionHandle, ReplaceOptions, UpdateOptions},
    record::{Record, RecordExt, RecordId},
};

pub use recordgate_macros::Record;
