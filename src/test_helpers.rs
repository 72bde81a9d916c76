//! Shared test utilities for the artfolio test suite.
//!
//! Provides a seeded catalog pinned to a fixed instant, an offline gallery
//! over it, an image fixture, and lookup helpers for artwork lists.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let gallery = offline_gallery();
//! let artworks = gallery.list_artworks(&ArtworkFilter::default());
//!
//! let sculpture = find_artwork(&artworks, "Marble Elegance");
//! assert_eq!(sculpture.artist, "Maria Garcia");
//! assert_eq!(titles(&artworks)[0], "Colorful Abstract");
//! ```

use crate::config::GalleryConfig;
use crate::gallery::Gallery;
use crate::store::MemoryCatalog;
use crate::types::{Artwork, Category, Timestamp};
use crate::upload::{ImageFile, UploadDraft};

// =========================================================================
// Fixture setup
// =========================================================================

/// 2025-05-12T02:03:36Z, the instant the seed catalog is dated from.
pub const FIXED_NOW_MILLIS: i64 = 1_747_015_416_000;

pub fn fixed_now() -> Timestamp {
    Timestamp::from_millis(FIXED_NOW_MILLIS).unwrap()
}

/// Fresh seed catalog dated from [`fixed_now`], using the default placeholder.
pub fn fixed_catalog() -> MemoryCatalog {
    MemoryCatalog::seeded_at(
        fixed_now(),
        &GalleryConfig::default().backend.placeholder_image,
    )
}

/// Gallery running on a fresh [`fixed_catalog`] with default settings.
pub fn offline_gallery() -> Gallery {
    Gallery::offline(fixed_catalog(), &GalleryConfig::default())
}

/// A tiny file that sniffs as PNG.
pub fn png_image(name: &str) -> ImageFile {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
    ImageFile::new(name, "image/png", bytes)
}

/// A draft that passes validation.
pub fn filled_draft() -> UploadDraft {
    UploadDraft {
        title: "Harbor at Dusk".to_string(),
        artist: "Nadia Petrova".to_string(),
        category: Category::Painting,
        description: "Oil on linen".to_string(),
        image: Some(png_image("harbor.png")),
    }
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find an artwork by title. Panics with the available titles if missing.
pub fn find_artwork<'a>(artworks: &'a [Artwork], title: &str) -> &'a Artwork {
    artworks.iter().find(|a| a.title == title).unwrap_or_else(|| {
        panic!(
            "artwork '{}' not found. Available: {:?}",
            title,
            titles(artworks)
        )
    })
}

pub fn titles(artworks: &[Artwork]) -> Vec<&str> {
    artworks.iter().map(|a| a.title.as_str()).collect()
}
