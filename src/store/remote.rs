//! Artwork source backed by a hosted table and image bucket.

use super::{ArtworkSource, NewArtwork, StoreError, unique_artists};
use crate::backend::{BackendClient, ObjectUpload, Query};
use crate::config::BackendConfig;
use crate::types::{Artwork, ArtworkFilter};
use crate::upload::ImageFile;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const CREATED_AT: &str = "createdAt";

pub struct RemoteSource<C> {
    client: C,
    table: String,
    bucket: String,
    cache_control_secs: u32,
}

#[derive(Deserialize)]
struct ArtistRow {
    artist: String,
}

impl<C: BackendClient> RemoteSource<C> {
    pub fn new(client: C, settings: &BackendConfig) -> Self {
        Self {
            client,
            table: settings.table.clone(),
            bucket: settings.bucket.clone(),
            cache_control_secs: settings.cache_control_secs,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Artwork>, StoreError> {
        let rows = self.client.select(&self.table, query)?;
        decode_rows(rows)
    }
}

fn decode_rows(rows: Vec<Value>) -> Result<Vec<Artwork>, StoreError> {
    serde_json::from_value(Value::Array(rows)).map_err(|source| StoreError::Malformed {
        what: "artwork rows",
        source,
    })
}

impl<C: BackendClient> ArtworkSource for RemoteSource<C> {
    fn name(&self) -> &'static str {
        "backend"
    }

    fn list(&self, filter: &ArtworkFilter) -> Result<Vec<Artwork>, StoreError> {
        let mut query = Query::select("*");
        if let Some(category) = filter.category.value() {
            query = query.eq("category", category);
        }
        if let Some(artist) = filter.artist.value() {
            query = query.eq("artist", artist);
        }
        self.fetch(&query.order_desc(CREATED_AT))
    }

    fn featured(&self, limit: usize) -> Result<Vec<Artwork>, StoreError> {
        let query = Query::select("*")
            .eq("featured", true)
            .order_desc(CREATED_AT)
            .limit(limit);
        self.fetch(&query)
    }

    fn artists(&self) -> Result<Vec<String>, StoreError> {
        let rows = self.client.select(&self.table, &Query::select("artist"))?;
        let rows: Vec<ArtistRow> =
            serde_json::from_value(Value::Array(rows)).map_err(|source| StoreError::Malformed {
                what: "artist rows",
                source,
            })?;
        Ok(unique_artists(rows.into_iter().map(|r| r.artist)))
    }

    fn store_image(&self, key: &str, image: &ImageFile) -> Result<String, StoreError> {
        let object = ObjectUpload {
            path: key,
            bytes: image.bytes(),
            content_type: image.content_type(),
            cache_control_secs: self.cache_control_secs,
            upsert: true,
        };
        self.client.upload(&self.bucket, &object)?;
        let url = self.client.public_url(&self.bucket, key)?;
        debug!(key, %url, "image stored");
        Ok(url)
    }

    fn insert(&self, artwork: NewArtwork) -> Result<Artwork, StoreError> {
        let row = serde_json::to_value(&artwork).map_err(|source| StoreError::Malformed {
            what: "new artwork",
            source,
        })?;
        let stored = self.client.insert(&self.table, &row)?;
        serde_json::from_value(stored).map_err(|source| StoreError::Malformed {
            what: "inserted row",
            source,
        })
    }
}
