//! # Artfolio
//!
//! An art gallery: a featured carousel, a filterable grid of artworks, and an
//! upload flow that stores the image and creates the artwork record.
//!
//! Artworks live in a hosted service: rows in a table, images in a storage
//! bucket. When the service is not configured, or any call to it fails, the
//! gallery keeps working on an in-memory sample catalog. Nothing the visitor
//! does ends in an error page; the only errors surfaced are form validation
//! messages.
//!
//! # Architecture
//!
//! ```text
//! config ─► Gallery ─► ArtworkSource ─┬─► RemoteSource ─► BackendClient (Supabase REST)
//!              │                      └─► MemoryCatalog (sample data)
//!              │
//!              ├─► GalleryView (category/artist filters)
//!              ├─► UploadForm (validation, submit)
//!              └─► render (static index.html) / output (CLI text)
//! ```
//!
//! Every read goes to the configured source first and falls back to the
//! catalog on failure. Writes that cannot reach the service still produce an
//! artwork: it is kept in the catalog for the rest of the session.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Artwork`, `Category`, `Timestamp`, and the `Filter` selection |
//! | [`config`] | `gallery.toml` loading, env overrides, validation, and CSS generation |
//! | [`backend`] | Client for the hosted table and bucket, plus the query builder |
//! | [`store`] | `ArtworkSource` trait with the remote and in-memory implementations |
//! | [`gallery`] | Data access with fallback: list, featured, artists, upload, create |
//! | [`upload`] | Image file inspection, draft validation, and the upload form state |
//! | [`filter`] | Client-side view state: fetched artworks plus the current selection |
//! | [`render`] | Static page rendering with Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! Data access returns plain values, not `Result`s. A failing backend is logged
//! with `tracing` and the catalog answers instead. Callers that care which
//! source answered can ask [`gallery::Gallery::source_name`] or subscribe to
//! [`gallery::GalleryEvent`]s.
//!
//! ## Filtering on the Client
//!
//! The gallery grid fetches everything once and filters locally. The visible
//! list is always recomputed from the full list and the selection, so clearing
//! a filter restores exactly what was fetched.
//!
//! ## Maud for the Page
//!
//! The static page is built with [Maud](https://maud.lambda.xyz/): markup is
//! checked at compile time and interpolation is escaped. The stylesheet and
//! script are embedded with `include_str!`, so the binary ships no template
//! directory.

pub mod backend;
pub mod config;
pub mod filter;
pub mod gallery;
pub mod output;
pub mod render;
pub mod store;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
