//! Upload form state and validation.
//!
//! An upload goes through three stages:
//!
//! 1. [`ImageFile`]: the picked file, with its sniffed MIME type.
//! 2. [`UploadDraft`]: the form fields as typed, mutated one at a time.
//! 3. [`Submission`]: a draft that passed validation, ready for
//!    [`Gallery::create_artwork`](crate::gallery::Gallery::create_artwork).
//!
//! [`UploadForm`] wraps a draft with the modal's open/closed state and the
//! error message shown above the fields. Validation never touches the network.

use crate::gallery::Gallery;
use crate::types::{Artwork, Category};
use image::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a draft cannot be submitted. Messages are shown to the user as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all required fields")]
    MissingFields,
    #[error("Please upload an image file")]
    NotAnImage { content_type: String },
    #[error("Image size should be less than {}", megabytes(.limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("The selected image '{name}' is empty")]
    EmptyFile { name: String },
    #[error("Cannot tell the file type of '{name}'")]
    UnknownExtension { name: String },
}

/// Human size label used in limit messages: `5MB`, `1.0MB`.
pub fn megabytes(bytes: &u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{:.1}MB", *bytes as f64 / MB as f64)
    }
}

/// An image picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. The MIME type is sniffed from the content and
    /// falls back to the extension, so a mislabelled file is still caught.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .ok()
            .or_else(|| mime_guess::from_path(path).first_raw())
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(%name, content_type, size = bytes.len(), "read image file");
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Lowercase extension for the storage key: the file name's own, else one
    /// derived from the MIME type.
    pub fn extension(&self) -> Option<String> {
        let from_name = Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty());
        from_name.or_else(|| {
            ImageFormat::from_mime_type(&self.content_type)
                .and_then(|format| format.extensions_str().first().copied())
                .or_else(|| {
                    mime_guess::get_mime_extensions_str(&self.content_type)
                        .and_then(|exts| exts.first().copied())
                })
                .map(str::to_string)
        })
    }

    /// The checks the form runs when a file is picked.
    pub fn check(&self, max_bytes: u64) -> Result<(), ValidationError> {
        if !self.is_image() {
            return Err(ValidationError::NotAnImage {
                content_type: self.content_type.clone(),
            });
        }
        if self.size() > max_bytes {
            return Err(ValidationError::TooLarge {
                size: self.size(),
                limit: max_bytes,
            });
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile {
                name: self.name.clone(),
            });
        }
        if self.extension().is_none() {
            return Err(ValidationError::UnknownExtension {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Form fields as currently typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub artist: String,
    pub category: Category,
    pub description: String,
    pub image: Option<ImageFile>,
}

/// A validated draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub artist: String,
    pub category: Category,
    pub description: Option<String>,
    pub image: ImageFile,
}

impl UploadDraft {
    pub fn validate(&self, max_image_bytes: u64) -> Result<(), ValidationError> {
        let Some(image) = &self.image else {
            return Err(ValidationError::MissingFields);
        };
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        image.check(max_image_bytes)
    }

    pub fn into_submission(self, max_image_bytes: u64) -> Result<Submission, ValidationError> {
        self.validate(max_image_bytes)?;
        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());
        let image = self.image.ok_or(ValidationError::MissingFields)?;
        Ok(Submission {
            title: self.title.trim().to_string(),
            artist: self.artist.trim().to_string(),
            category: self.category,
            description,
            image,
        })
    }
}

/// State of the upload modal.
#[derive(Debug, Clone)]
pub struct UploadForm {
    open: bool,
    draft: UploadDraft,
    error: Option<String>,
    max_image_bytes: u64,
}

impl UploadForm {
    pub fn new(max_image_bytes: u64) -> Self {
        Self {
            open: false,
            draft: UploadDraft::default(),
            error: None,
            max_image_bytes,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.error = None;
    }

    /// Hide the modal. The draft is kept, so reopening shows what was typed.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) {
        self.draft.artist = artist.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.draft.category = category;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Attach a picked file. A rejected file leaves the previous one in place
    /// and sets the form error; returns whether the file was accepted.
    pub fn attach_image(&mut self, image: ImageFile) -> bool {
        match image.check(self.max_image_bytes) {
            Ok(()) => {
                self.draft.image = Some(image);
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Submit the draft. On success the form is reset and closed and the
    /// stored record is returned; otherwise the form stays open with an error.
    pub fn submit(&mut self, gallery: &Gallery) -> Option<Artwork> {
        self.error = None;
        if let Err(e) = self.draft.validate(self.max_image_bytes) {
            self.error = Some(e.to_string());
            return None;
        }
        match gallery.create_artwork(std::mem::take(&mut self.draft)) {
            Ok(artwork) => {
                self.reset();
                self.open = false;
                Some(artwork)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.draft = UploadDraft::default();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{offline_gallery, png_image};
    use tempfile::TempDir;

    const LIMIT: u64 = 5 * 1024 * 1024;

    fn filled_draft() -> UploadDraft {
        UploadDraft {
            title: "Dawn".into(),
            artist: "Ana".into(),
            category: Category::Photography,
            description: "  ".into(),
            image: Some(png_image("dawn.png")),
        }
    }

    #[test]
    fn size_limit_message_uses_megabytes() {
        let err = ValidationError::TooLarge {
            size: LIMIT + 1,
            limit: LIMIT,
        };
        assert_eq!(err.to_string(), "Image size should be less than 5MB");
    }

    #[test]
    fn megabytes_keeps_fractional_limits() {
        assert_eq!(megabytes(&(2 * 1024 * 1024)), "2MB");
        assert_eq!(megabytes(&1_000_000), "1.0MB");
        assert_eq!(megabytes(&(1536 * 1024)), "1.5MB");
    }

    #[test]
    fn check_rejects_non_images() {
        let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert_eq!(
            file.check(LIMIT).unwrap_err().to_string(),
            "Please upload an image file"
        );
    }

    #[test]
    fn check_rejects_oversized_images() {
        let file = ImageFile::new("big.jpg", "image/jpeg", vec![0; 11]);
        assert!(matches!(
            file.check(10),
            Err(ValidationError::TooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn extension_falls_back_to_mime_type() {
        let named = ImageFile::new("Photo.JPG", "image/jpeg", vec![1]);
        assert_eq!(named.extension().as_deref(), Some("jpg"));

        let unnamed = ImageFile::new("clipboard", "image/png", vec![1]);
        assert_eq!(unnamed.extension().as_deref(), Some("png"));
    }

    #[test]
    fn from_path_sniffs_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("upload.bin");
        std::fs::write(&path, png_image("x.png").bytes()).unwrap();

        let file = ImageFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "upload.bin");
        assert_eq!(file.content_type(), "image/png");
        assert!(file.is_image());
    }

    #[test]
    fn from_path_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            ImageFile::from_path(&tmp.path().join("nope.png")),
            Err(UploadError::Read { .. })
        ));
    }

    #[test]
    fn draft_requires_title_artist_and_image() {
        let mut draft = filled_draft();
        draft.title = "   ".into();
        assert_eq!(draft.validate(LIMIT), Err(ValidationError::MissingFields));

        let mut draft = filled_draft();
        draft.image = None;
        assert_eq!(draft.validate(LIMIT), Err(ValidationError::MissingFields));

        assert_eq!(filled_draft().validate(LIMIT), Ok(()));
    }

    #[test]
    fn submission_drops_blank_description() {
        let submission = filled_draft().into_submission(LIMIT).unwrap();
        assert_eq!(submission.description, None);
        assert_eq!(submission.category, Category::Photography);
    }

    #[test]
    fn attach_rejected_file_keeps_previous_image() {
        let mut form = UploadForm::new(LIMIT);
        assert!(form.attach_image(png_image("a.png")));
        assert!(!form.attach_image(ImageFile::new("a.txt", "text/plain", vec![1])));
        assert_eq!(form.error(), Some("Please upload an image file"));
        assert_eq!(form.draft().image.as_ref().map(ImageFile::name), Some("a.png"));
    }

    #[test]
    fn submit_without_fields_keeps_form_open() {
        let gallery = offline_gallery();
        let before = gallery.catalog().len();
        let mut form = UploadForm::new(LIMIT);
        form.open();

        assert!(form.submit(&gallery).is_none());
        assert!(form.is_open());
        assert_eq!(form.error(), Some("Please fill all required fields"));
        assert_eq!(gallery.catalog().len(), before);
    }

    #[test]
    fn successful_submit_resets_and_closes() {
        let gallery = offline_gallery();
        let mut form = UploadForm::new(LIMIT);
        form.open();
        form.set_title("Dawn");
        form.set_artist("Ana");
        form.set_category(Category::Digital);
        assert!(form.attach_image(png_image("dawn.png")));

        let artwork = form.submit(&gallery).unwrap();
        assert_eq!(artwork.category, Category::Digital);
        assert!(!form.is_open());
        assert_eq!(form.draft(), &UploadDraft::default());
        assert_eq!(form.error(), None);
    }
}
