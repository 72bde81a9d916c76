//! Gallery view state: the fetched artworks plus the current filter selection.
//!
//! Filtering happens on the client, over the full list fetched once. Each
//! setter recomputes the visible list from scratch, category first and then
//! artist, so the visible list is always a pure function of
//! `(artworks, filter)`.

use crate::gallery::Gallery;
use crate::types::{ALL, Artwork, ArtworkFilter, Category, Filter};

#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    artworks: Vec<Artwork>,
    artists: Vec<String>,
    filter: ArtworkFilter,
    visible: Vec<Artwork>,
}

impl GalleryView {
    /// View over `artworks` with no filter applied.
    pub fn new(artworks: Vec<Artwork>, artists: Vec<String>) -> Self {
        let visible = artworks.clone();
        Self {
            artworks,
            artists,
            filter: ArtworkFilter::default(),
            visible,
        }
    }

    /// Fetch everything the view needs from `gallery`.
    pub fn load(gallery: &Gallery) -> Self {
        Self::new(
            gallery.list_artworks(&ArtworkFilter::default()),
            gallery.list_artists(),
        )
    }

    /// Refetch from `gallery`, keeping the current selection.
    pub fn reload(&mut self, gallery: &Gallery) {
        self.artworks = gallery.list_artworks(&ArtworkFilter::default());
        self.artists = gallery.list_artists();
        self.recompute();
    }

    pub fn set_category(&mut self, category: Filter<Category>) {
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_artist(&mut self, artist: Filter<String>) {
        self.filter.artist = artist;
        self.recompute();
    }

    /// Reset both selections to "All".
    pub fn clear_filters(&mut self) {
        self.filter = ArtworkFilter::default();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = self.filter.apply(&self.artworks);
    }

    pub fn filter(&self) -> &ArtworkFilter {
        &self.filter
    }

    /// Every fetched artwork, unfiltered.
    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    pub fn visible(&self) -> &[Artwork] {
        &self.visible
    }

    /// True when the selection hides everything (the "no artworks found" state).
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn artist_options(&self) -> Vec<String> {
        artist_options(&self.artists)
    }
}

/// Choices for the category select: "All" then every category.
pub fn category_options() -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(Category::VARIANTS.iter().map(|c| c.to_string()))
        .collect()
}

/// Choices for the artist select: "All" then `artists` as given.
pub fn artist_options(artists: &[String]) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(artists.iter().cloned())
        .collect()
}
