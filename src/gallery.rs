//! Data access for the gallery views.
//!
//! [`Gallery`] is the one entry point the views use. It reads from and writes
//! to an [`ArtworkSource`] chosen once at construction, and every operation
//! degrades instead of failing:
//!
//! | Operation | On source failure |
//! |---|---|
//! | [`list_artworks`](Gallery::list_artworks) | in-memory catalog, same filters |
//! | [`list_featured_artworks`](Gallery::list_featured_artworks) | in-memory featured records |
//! | [`upload_image`](Gallery::upload_image) | placeholder URL + [`GalleryEvent::UploadFailed`] |
//! | [`create_artwork`](Gallery::create_artwork) | `error-` record kept in the catalog |
//! | [`list_artists`](Gallery::list_artists) | in-memory artist names |
//!
//! The only error a caller ever sees is [`ValidationError`], raised before any
//! I/O when a draft is incomplete.
//!
//! ## Progress events
//!
//! A gallery built [`with_events`](Gallery::with_events) reports uploads and
//! created records on an `mpsc` channel, so the caller can show them the way it
//! wants (the CLI prints them through [`crate::output`]).

use crate::backend::SupabaseClient;
use crate::config::{ConfigError, GalleryConfig};
use crate::store::{ArtworkSource, MemoryCatalog, NewArtwork, RemoteSource, synthetic_id};
use crate::types::{Artwork, ArtworkFilter, Timestamp, sort_newest_first};
use crate::upload::{ImageFile, UploadDraft, ValidationError};
use chrono::Utc;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Length of the random part of a storage key.
const KEY_TOKEN_LEN: usize = 13;

/// Extension used when neither the file name nor its type yields one.
const FALLBACK_EXTENSION: &str = "bin";

/// Progress reported while writing to the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    ImageUploaded {
        url: String,
    },
    /// The image could not be stored; the record will use the placeholder.
    UploadFailed {
        reason: String,
    },
    ArtworkCreated {
        id: String,
        title: String,
        source: &'static str,
    },
    /// The record could not be stored remotely and lives only in this session.
    ArtworkKeptLocally {
        id: String,
        title: String,
        reason: String,
    },
}

pub struct Gallery {
    source: Box<dyn ArtworkSource>,
    catalog: MemoryCatalog,
    folder: String,
    placeholder_image: String,
    featured_limit: usize,
    max_image_bytes: u64,
    events: Option<Sender<GalleryEvent>>,
}

impl Gallery {
    /// Build a gallery for `config`: backed by the hosted service when its
    /// credentials are usable, by a fresh seeded catalog otherwise.
    pub fn from_config(config: &GalleryConfig) -> Self {
        let catalog = MemoryCatalog::seeded(&config.backend.placeholder_image);
        let source: Box<dyn ArtworkSource> = match config.backend.connection() {
            Ok(connection) => {
                info!(url = %connection.url, "using hosted backend");
                let client = SupabaseClient::new(&connection, &config.backend);
                Box::new(RemoteSource::new(client, &config.backend))
            }
            Err(ConfigError::BackendMissing) => {
                info!("no backend configured, using the sample catalog");
                Box::new(catalog.clone())
            }
            Err(e) => {
                warn!(error = %e, "ignoring backend settings, using the sample catalog");
                Box::new(catalog.clone())
            }
        };
        Self::new(source, catalog, config)
    }

    /// Gallery over an explicit source; `catalog` is what failed reads fall
    /// back to.
    pub fn new(source: Box<dyn ArtworkSource>, catalog: MemoryCatalog, config: &GalleryConfig) -> Self {
        Self {
            source,
            catalog,
            folder: config.backend.folder.trim_matches('/').to_string(),
            placeholder_image: config.backend.placeholder_image.clone(),
            featured_limit: config.carousel.featured_limit,
            max_image_bytes: config.upload.max_image_bytes,
            events: None,
        }
    }

    /// Gallery running entirely on `catalog`.
    pub fn offline(catalog: MemoryCatalog, config: &GalleryConfig) -> Self {
        Self::new(Box::new(catalog.clone()), catalog, config)
    }

    pub fn with_events(mut self, events: Sender<GalleryEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Name of the active source (`"memory"` or `"backend"`).
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn catalog(&self) -> &MemoryCatalog {
        &self.catalog
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    pub fn featured_limit(&self) -> usize {
        self.featured_limit
    }

    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
    }

    fn emit(&self, event: GalleryEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Artworks matching `filter`, newest first.
    pub fn list_artworks(&self, filter: &ArtworkFilter) -> Vec<Artwork> {
        match self.source.list(filter) {
            Ok(mut artworks) => {
                sort_newest_first(&mut artworks);
                artworks
            }
            Err(e) => {
                warn!(error = %e, ?filter, "listing artworks failed, using the sample catalog");
                self.catalog.artworks(filter)
            }
        }
    }

    /// Up to `limit` featured artworks, newest first.
    pub fn list_featured_artworks(&self, limit: usize) -> Vec<Artwork> {
        match self.source.featured(limit) {
            Ok(mut artworks) => {
                sort_newest_first(&mut artworks);
                artworks.truncate(limit);
                artworks
            }
            Err(e) => {
                warn!(error = %e, limit, "listing featured artworks failed, using the sample catalog");
                self.catalog.featured_artworks(limit)
            }
        }
    }

    /// Distinct artist names in first-seen order.
    pub fn list_artists(&self) -> Vec<String> {
        self.source.artists().unwrap_or_else(|e| {
            warn!(error = %e, "listing artists failed, using the sample catalog");
            self.catalog.artist_names()
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `image` and return the URL it is served from. Never fails: when
    /// the source cannot store it, the placeholder URL is returned and
    /// [`GalleryEvent::UploadFailed`] is emitted.
    pub fn upload_image(&self, image: &ImageFile) -> String {
        let extension = image
            .extension()
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        let key = storage_key(&self.folder, &extension);
        debug!(%key, name = image.name(), "uploading image");

        match self.source.store_image(&key, image) {
            Ok(url) => {
                info!(%url, "image uploaded");
                self.emit(GalleryEvent::ImageUploaded { url: url.clone() });
                url
            }
            Err(e) => {
                warn!(error = %e, %key, "image upload failed, using the placeholder");
                self.emit(GalleryEvent::UploadFailed {
                    reason: e.to_string(),
                });
                self.placeholder_image.clone()
            }
        }
    }

    /// Validate `draft`, upload its image, then store the record.
    ///
    /// When the record cannot be stored, an `error-` record built from the
    /// same fields is returned instead and kept at the front of the in-memory
    /// catalog, so fallback reads in this session still show it.
    pub fn create_artwork(&self, draft: UploadDraft) -> Result<Artwork, ValidationError> {
        let submission = draft.into_submission(self.max_image_bytes)?;
        let image_url = self.upload_image(&submission.image);

        let record = NewArtwork {
            title: submission.title,
            artist: submission.artist,
            category: submission.category,
            description: submission.description,
            image_url,
            created_at: Timestamp::now(),
            featured: false,
        };

        match self.source.insert(record.clone()) {
            Ok(artwork) => {
                info!(id = %artwork.id, title = %artwork.title, source = self.source.name(), "artwork created");
                self.emit(GalleryEvent::ArtworkCreated {
                    id: artwork.id.clone(),
                    title: artwork.title.clone(),
                    source: self.source.name(),
                });
                Ok(artwork)
            }
            Err(e) => {
                warn!(error = %e, title = %record.title, "storing artwork failed, keeping it locally");
                let artwork = record.into_artwork(synthetic_id("error"));
                self.catalog.prepend(artwork.clone());
                self.emit(GalleryEvent::ArtworkKeptLocally {
                    id: artwork.id.clone(),
                    title: artwork.title.clone(),
                    reason: e.to_string(),
                });
                Ok(artwork)
            }
        }
    }
}

/// Object key for a new upload: `<folder>/<epoch millis>_<token>.<ext>`.
pub fn storage_key(folder: &str, extension: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    let file_name = format!(
        "{}_{}.{}",
        Utc::now().timestamp_millis(),
        &token[..KEY_TOKEN_LEN],
        extension
    );
    if folder.is_empty() {
        file_name
    } else {
        format!("{folder}/{file_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{RecordedOp, RecordingBackend};
    use crate::store::StoreError;
    use crate::test_helpers::{filled_draft, find_artwork, fixed_catalog, png_image};
    use crate::types::{Category, Filter};
    use std::sync::Arc;
    use std::sync::mpsc;

    fn remote_gallery(backend: RecordingBackend) -> (Gallery, Arc<RecordingBackend>) {
        let config = GalleryConfig::default();
        let backend = Arc::new(backend);
        let source = RemoteSource::new(Arc::clone(&backend), &config.backend);
        let gallery = Gallery::new(Box::new(source), fixed_catalog(), &config);
        (gallery, backend)
    }

    fn offline() -> Gallery {
        Gallery::offline(fixed_catalog(), &GalleryConfig::default())
    }

    #[test]
    fn storage_key_shape() {
        let key = storage_key("artworks", "png");
        let file = key.strip_prefix("artworks/").unwrap();
        let (stem, ext) = file.rsplit_once('.').unwrap();
        let (millis, token) = stem.split_once('_').unwrap();
        assert_eq!(ext, "png");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(token.len(), KEY_TOKEN_LEN);
        assert_ne!(key, storage_key("artworks", "png"));
    }

    #[test]
    fn storage_key_without_folder() {
        assert!(!storage_key("", "jpg").contains('/'));
    }

    #[test]
    fn unconfigured_config_selects_memory_source() {
        let gallery = Gallery::from_config(&GalleryConfig::default());
        assert_eq!(gallery.source_name(), "memory");
        assert_eq!(gallery.list_artworks(&ArtworkFilter::default()).len(), 5);
    }

    #[test]
    fn malformed_credentials_select_memory_source() {
        let mut config = GalleryConfig::default();
        config.backend.url = Some("https://demo.supabase.co".into());
        config.backend.anon_key = Some("short".into());
        assert_eq!(Gallery::from_config(&config).source_name(), "memory");
    }

    #[test]
    fn valid_credentials_select_backend_source() {
        let mut config = GalleryConfig::default();
        config.backend.url = Some("https://demo.supabase.co".into());
        config.backend.anon_key = Some("public-anon-key-123".into());
        assert_eq!(Gallery::from_config(&config).source_name(), "backend");
    }

    #[test]
    fn offline_category_filter() {
        let sculptures = offline().list_artworks(&ArtworkFilter::category(Category::Sculpture));
        assert_eq!(sculptures.len(), 1);
        assert_eq!(sculptures[0].title, "Marble Elegance");
    }

    #[test]
    fn offline_featured_are_newest_first() {
        let featured = offline().list_featured_artworks(5);
        let titles: Vec<&str> = featured.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Colorful Abstract", "Urban Landscape", "Digital Dreams"]);
    }

    #[test]
    fn failed_select_falls_back_with_same_filter() {
        let (gallery, backend) = remote_gallery(RecordingBackend::unreachable());
        let filter = ArtworkFilter::new(Filter::All, Filter::Only("John Smith".to_string()));
        let artworks = gallery.list_artworks(&filter);

        assert_eq!(artworks.len(), 1);
        assert_eq!(artworks[0].artist, "John Smith");
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn failed_featured_and_artists_fall_back() {
        let (gallery, _) = remote_gallery(RecordingBackend::unreachable());
        assert_eq!(gallery.list_featured_artworks(2).len(), 2);
        assert_eq!(gallery.list_artists().len(), 5);
    }

    #[test]
    fn remote_results_are_sorted_and_truncated() {
        let row = |id: &str, at: &str| {
            serde_json::json!({
                "id": id, "title": id, "artist": "Ana", "category": "Digital",
                "imageUrl": "https://cdn.test/x.png", "createdAt": at, "featured": true,
            })
        };
        let (gallery, _) = remote_gallery(RecordingBackend::with_rows(vec![
            row("old", "2025-01-01T00:00:00Z"),
            row("new", "2025-03-01T00:00:00Z"),
            row("mid", "2025-02-01T00:00:00Z"),
        ]));
        let featured = gallery.list_featured_artworks(2);
        let ids: Vec<&str> = featured.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid"]);
    }

    #[test]
    fn offline_upload_returns_placeholder_without_failure_event() {
        let (tx, rx) = mpsc::channel();
        let gallery = offline().with_events(tx);
        let url = gallery.upload_image(&png_image("a.png"));
        assert_eq!(url, gallery.placeholder_image());
        drop(gallery);

        let events: Vec<GalleryEvent> = rx.iter().collect();
        assert!(!events.iter().any(|e| matches!(e, GalleryEvent::UploadFailed { .. })));
    }

    #[test]
    fn failed_upload_returns_placeholder_and_signals() {
        let (tx, rx) = mpsc::channel();
        let (gallery, _) = remote_gallery(RecordingBackend::unreachable());
        let gallery = gallery.with_events(tx);

        let url = gallery.upload_image(&png_image("a.png"));
        assert_eq!(url, gallery.placeholder_image());
        drop(gallery);

        let events: Vec<GalleryEvent> = rx.iter().collect();
        assert!(matches!(events.as_slice(), [GalleryEvent::UploadFailed { .. }]));
    }

    #[test]
    fn upload_uses_folder_and_extension() {
        let (gallery, backend) = remote_gallery(RecordingBackend::new());
        let url = gallery.upload_image(&png_image("Dawn.PNG"));

        match &backend.get_operations()[0] {
            RecordedOp::Upload { path, upsert, .. } => {
                assert!(path.starts_with("artworks/"));
                assert!(path.ends_with(".png"));
                assert!(*upsert);
                assert!(url.ends_with(path.as_str()));
            }
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[test]
    fn create_with_missing_title_does_no_io() {
        let (gallery, backend) = remote_gallery(RecordingBackend::new());
        let mut draft = filled_draft();
        draft.title.clear();

        assert_eq!(
            gallery.create_artwork(draft),
            Err(ValidationError::MissingFields)
        );
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_uploads_before_inserting() {
        let (gallery, backend) = remote_gallery(RecordingBackend::new());
        let artwork = gallery.create_artwork(filled_draft()).unwrap();
        assert_eq!(artwork.id, "row-1");
        assert!(!artwork.featured);

        let ops = backend.get_operations();
        assert!(matches!(ops[0], RecordedOp::Upload { .. }));
        assert!(matches!(ops[1], RecordedOp::PublicUrl { .. }));
        match &ops[2] {
            RecordedOp::Insert { row, .. } => {
                assert_eq!(row["imageUrl"], artwork.image_url.as_str());
                assert_eq!(row["featured"], false);
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn offline_create_prepends_mock_record() {
        let gallery = offline();
        let artwork = gallery.create_artwork(filled_draft()).unwrap();
        assert!(artwork.id.starts_with("mock-"));
        assert_eq!(artwork.image_url, gallery.placeholder_image());

        let all = gallery.list_artworks(&ArtworkFilter::default());
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].id, artwork.id);
        assert_eq!(find_artwork(&all, "Harbor at Dusk").description.as_deref(), Some("Oil on linen"));
    }

    #[test]
    fn unreachable_backend_keeps_error_record() {
        let (gallery, _) = remote_gallery(RecordingBackend::unreachable());
        let artwork = gallery.create_artwork(filled_draft()).unwrap();
        assert!(artwork.id.starts_with("error-"));
        assert_eq!(artwork.image_url, gallery.placeholder_image());

        let all = gallery.list_artworks(&ArtworkFilter::default());
        assert_eq!(all[0].id, artwork.id);
    }

    #[test]
    fn failed_insert_keeps_uploaded_image_url() {
        let backend = RecordingBackend {
            fail_insert: true,
            ..RecordingBackend::default()
        };
        let (gallery, _) = remote_gallery(backend);
        let artwork = gallery.create_artwork(filled_draft()).unwrap();
        assert!(artwork.id.starts_with("error-"));
        assert!(artwork.image_url.starts_with("https://cdn.test/artwork-images/artworks/"));
        assert_eq!(gallery.catalog().snapshot()[0].id, artwork.id);
    }

    #[test]
    fn store_error_is_displayed_in_event() {
        let (tx, rx) = mpsc::channel();
        let (gallery, _) = remote_gallery(RecordingBackend::unreachable());
        gallery.with_events(tx).create_artwork(filled_draft()).unwrap();

        let events: Vec<GalleryEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        let GalleryEvent::ArtworkKeptLocally { reason, .. } = &events[1] else {
            panic!("expected kept-locally event, got {:?}", events[1]);
        };
        let expected = StoreError::Backend(crate::backend::BackendError::UnexpectedResponse(
            "insert refused by test backend".into(),
        ));
        assert_eq!(reason, &expected.to_string());
    }
}
