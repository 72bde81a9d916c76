//! In-memory artwork catalog.
//!
//! Serves the gallery when no backend is configured, and is where the gallery
//! falls back to when the backend fails. Records added during a session are
//! prepended and stay visible until the process exits; nothing is persisted.
//!
//! `MemoryCatalog` is a cheap handle: clones share the same list, so the
//! gallery can use one catalog both as its primary source and as its fallback.

use super::{ArtworkSource, NewArtwork, StoreError, synthetic_id, unique_artists};
use crate::types::{Artwork, ArtworkFilter, Category, Timestamp, sort_newest_first};
use crate::upload::ImageFile;
use chrono::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct MemoryCatalog {
    artworks: Arc<Mutex<Vec<Artwork>>>,
    placeholder_image: Arc<str>,
}

impl MemoryCatalog {
    pub fn new(artworks: Vec<Artwork>, placeholder_image: &str) -> Self {
        Self {
            artworks: Arc::new(Mutex::new(artworks)),
            placeholder_image: Arc::from(placeholder_image),
        }
    }

    /// The five sample artworks, dated relative to now.
    pub fn seeded(placeholder_image: &str) -> Self {
        Self::seeded_at(Timestamp::now(), placeholder_image)
    }

    pub fn seeded_at(now: Timestamp, placeholder_image: &str) -> Self {
        Self::new(seed_artworks(now), placeholder_image)
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    /// Copy of the collection in storage order (newest additions first).
    pub fn snapshot(&self) -> Vec<Artwork> {
        self.artworks.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.artworks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.lock().is_empty()
    }

    /// Put a record at the front of the collection.
    pub fn prepend(&self, artwork: Artwork) {
        self.artworks.lock().insert(0, artwork);
    }

    pub fn artworks(&self, filter: &ArtworkFilter) -> Vec<Artwork> {
        let mut matching = filter.apply(&self.artworks.lock());
        sort_newest_first(&mut matching);
        matching
    }

    pub fn featured_artworks(&self, limit: usize) -> Vec<Artwork> {
        let mut featured: Vec<Artwork> = self
            .artworks
            .lock()
            .iter()
            .filter(|a| a.featured)
            .cloned()
            .collect();
        sort_newest_first(&mut featured);
        featured.truncate(limit);
        featured
    }

    pub fn artist_names(&self) -> Vec<String> {
        unique_artists(self.artworks.lock().iter().map(|a| a.artist.clone()))
    }

    /// Store a record under a fresh `mock-` id, at the front of the list.
    pub fn add(&self, artwork: NewArtwork) -> Artwork {
        let artwork = artwork.into_artwork(synthetic_id("mock"));
        self.prepend(artwork.clone());
        artwork
    }
}

impl ArtworkSource for MemoryCatalog {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list(&self, filter: &ArtworkFilter) -> Result<Vec<Artwork>, StoreError> {
        debug!(?filter, "listing in-memory artworks");
        Ok(self.artworks(filter))
    }

    fn featured(&self, limit: usize) -> Result<Vec<Artwork>, StoreError> {
        debug!(limit, "listing in-memory featured artworks");
        Ok(self.featured_artworks(limit))
    }

    fn artists(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.artist_names())
    }

    fn store_image(&self, key: &str, image: &ImageFile) -> Result<String, StoreError> {
        debug!(key, bytes = image.size(), "simulating image upload");
        Ok(self.placeholder_image.to_string())
    }

    fn insert(&self, artwork: NewArtwork) -> Result<Artwork, StoreError> {
        Ok(self.add(artwork))
    }
}

const SAMPLE_IMAGE_BASE: &str = "https://images.unsplash.com";

fn sample(
    id: &str,
    title: &str,
    artist: &str,
    category: Category,
    photo: &str,
    description: &str,
    created_at: Timestamp,
    featured: bool,
) -> Artwork {
    Artwork {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        category,
        image_url: format!("{SAMPLE_IMAGE_BASE}/{photo}?auto=format&fit=crop&w=800"),
        description: Some(description.to_string()),
        created_at,
        featured,
        owner: None,
    }
}

/// Sample catalog: one record per category, one day apart, newest first.
/// The three most recent are featured.
pub fn seed_artworks(now: Timestamp) -> Vec<Artwork> {
    let days_ago = |n: i64| Timestamp::from(now.as_datetime() - Duration::days(n));
    vec![
        sample(
            "1",
            "Colorful Abstract",
            "Jane Doe",
            Category::Painting,
            "photo-1536924940846-227afb31e2a5",
            "A vibrant abstract painting with bold colors and shapes.",
            days_ago(0),
            true,
        ),
        sample(
            "2",
            "Urban Landscape",
            "John Smith",
            Category::Photography,
            "photo-1514539079130-25950c84af65",
            "A stunning photograph of a cityscape at night.",
            days_ago(1),
            true,
        ),
        sample(
            "3",
            "Digital Dreams",
            "Alex Johnson",
            Category::Digital,
            "photo-1633186710895-309db2dfb009",
            "A digital art piece exploring surreal landscapes.",
            days_ago(2),
            true,
        ),
        sample(
            "4",
            "Marble Elegance",
            "Maria Garcia",
            Category::Sculpture,
            "photo-1544413164-5f1b295af371",
            "A marble sculpture with flowing, elegant lines.",
            days_ago(3),
            false,
        ),
        sample(
            "5",
            "Mixed Emotions",
            "Sam Taylor",
            Category::MixedMedia,
            "photo-1615184697985-c9bde1b07da7",
            "A mixed media piece combining various materials and techniques.",
            days_ago(4),
            false,
        ),
    ]
}
