//! Artwork sources.
//!
//! [`ArtworkSource`] is the capability the gallery reads from and writes to.
//! There are two implementations, and the gallery picks one when it starts:
//!
//! - [`MemoryCatalog`]: the in-memory sample catalog. Never fails; "uploads"
//!   resolve to the placeholder image.
//! - [`RemoteSource`]: rows and images on the hosted backend, via any
//!   [`BackendClient`](crate::backend::BackendClient).
//!
//! Sources report failures; deciding what to show instead is the gallery's job
//! (see [`Gallery`](crate::gallery::Gallery)).

pub mod memory;
pub mod remote;

pub use memory::{MemoryCatalog, seed_artworks};
pub use remote::RemoteSource;

use crate::backend::BackendError;
use crate::types::{Artwork, ArtworkFilter, Category, Timestamp};
use crate::upload::ImageFile;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Backend(#[from] BackendError),
    #[error("malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A record about to be stored; the source assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    pub category: Category,
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: Timestamp,
    pub featured: bool,
}

impl NewArtwork {
    pub fn into_artwork(self, id: String) -> Artwork {
        Artwork {
            id,
            title: self.title,
            artist: self.artist,
            category: self.category,
            image_url: self.image_url,
            description: self.description,
            created_at: self.created_at,
            featured: self.featured,
            owner: None,
        }
    }
}

/// Storage capability behind the gallery.
pub trait ArtworkSource: Send + Sync {
    /// Short label for logs and CLI output.
    fn name(&self) -> &'static str;

    /// Records matching `filter`, newest first.
    fn list(&self, filter: &ArtworkFilter) -> Result<Vec<Artwork>, StoreError>;

    /// Up to `limit` featured records, newest first.
    fn featured(&self, limit: usize) -> Result<Vec<Artwork>, StoreError>;

    /// Distinct artist names, first-seen order.
    fn artists(&self) -> Result<Vec<String>, StoreError>;

    /// Store image bytes under `key` and return the URL they are served from.
    fn store_image(&self, key: &str, image: &ImageFile) -> Result<String, StoreError>;

    /// Store a new record and return it as stored.
    fn insert(&self, artwork: NewArtwork) -> Result<Artwork, StoreError>;
}

/// Fresh identifier for records created outside the backend:
/// `<prefix>-<epoch millis>-<8 hex chars>`.
pub fn synthetic_id(prefix: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}-{}", Utc::now().timestamp_millis(), &token[..8])
}

/// Remove duplicate names, keeping the first occurrence of each.
pub fn unique_artists<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(Into::into)
        .filter(|name: &String| seen.insert(name.clone()))
        .collect()
}
