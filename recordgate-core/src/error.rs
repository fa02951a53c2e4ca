//! Error types and result types for gateway operations.
//!
//! Every failure surfaced by a gateway originates in the backing collection
//! handle; the gateway itself performs no recovery, no retries, and no error
//! translation beyond this taxonomy. A point lookup or mutation that matches
//! nothing is NOT an error — it is `Ok(None)`.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors surfaced through a record gateway.
///
/// Variants map one-to-one onto the failure classes a document backend can
/// produce: codec failures at the trait boundary, schema rejections, transport
/// failures, and anything else the backend reports.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Serialization/deserialization error when moving a record across the
    /// BSON or JSON boundary.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The backend rejected a create/update/replace because the record or
    /// instruction violates its constraints.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The backend could not reach the underlying store.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Any other backend failure, passed through verbatim.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<BsonError> for GatewayError {
    fn from(err: BsonError) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for GatewayError {
    fn from(err: SerdeJsonError) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}
