//! Backend client adapter for the hosted table and image bucket.
//!
//! The [`BackendClient`] trait defines the four operations the gallery needs
//! from the hosted service:
//!
//! | Operation | Service call |
//! |---|---|
//! | **select** | `GET /rest/v1/<table>?select=..&col=eq.v&order=..&limit=..` |
//! | **insert** | `POST /rest/v1/<table>` with `Prefer: return=representation` |
//! | **upload** | `POST /storage/v1/object/<bucket>/<path>` |
//! | **public_url** | `/storage/v1/object/public/<bucket>/<path>` |
//!
//! Clients own no data. Rows cross this boundary as `serde_json::Value`; turning
//! them into [`Artwork`](crate::types::Artwork) records is the job of
//! [`RemoteSource`](crate::store::RemoteSource).
//!
//! The production implementation is [`SupabaseClient`].

mod query;
pub mod supabase;

pub use query::Query;
pub use supabase::SupabaseClient;

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// One object to put into a bucket.
#[derive(Debug, Clone, Copy)]
pub struct ObjectUpload<'a> {
    /// Key inside the bucket, `/`-separated.
    pub path: &'a str,
    pub bytes: &'a [u8],
    pub content_type: &'a str,
    pub cache_control_secs: u32,
    /// Replace an existing object with the same key instead of failing.
    pub upsert: bool,
}

/// Trait for hosted storage/database clients.
///
/// Implementations must be `Send + Sync` so a single client can be shared by
/// every view of a running gallery. `Arc<C>` is a client too, which lets a
/// caller keep a handle on the client it gave away.
pub trait BackendClient: Send + Sync {
    /// Read rows from `table`.
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Insert one row and return the stored row, including backend-assigned
    /// columns such as `id`.
    fn insert(&self, table: &str, row: &Value) -> Result<Value, BackendError>;

    /// Store an object in `bucket`.
    fn upload(&self, bucket: &str, object: &ObjectUpload<'_>) -> Result<(), BackendError>;

    /// Public URL of an object in `bucket`.
    fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError>;
}

impl<C: BackendClient + ?Sized> BackendClient for Arc<C> {
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        (**self).select(table, query)
    }

    fn insert(&self, table: &str, row: &Value) -> Result<Value, BackendError> {
        (**self).insert(table, row)
    }

    fn upload(&self, bucket: &str, object: &ObjectUpload<'_>) -> Result<(), BackendError> {
        (**self).upload(bucket, object)
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError> {
        (**self).public_url(bucket, path)
    }
}
