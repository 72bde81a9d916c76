//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every artwork is shown the same way wherever it appears:
//!
//! 1. **Header line**: positional index + title + artist
//! 2. **Context lines**: indented `Category:`, `Created:`, `Image:`, and the
//!    description when there is one.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Artworks (category: All, artist: All) from memory: 5
//! 001 Colorful Abstract by Jane Doe
//!     Category: Painting (featured)
//!     Created: 2025-05-12T02:03:36.000Z
//!     Image: https://images.unsplash.com/photo-1536924940846-227afb31e2a5?auto=format&fit=crop&w=800
//!     Description: A vibrant abstract painting with bold colors and shapes.
//! ```
//!
//! ## Upload
//!
//! ```text
//! Uploaded image: https://demo.supabase.co/storage/v1/object/public/artwork-images/artworks/1747015416000_k3j9x2m1q8w7e.png
//! Created "Harbor at Dusk" (7d3c...) in backend
//! ```
//!
//! ## Build
//!
//! ```text
//! Rendered dist/index.html from memory
//!     5 artworks, 3 featured, 5 artists
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::gallery::GalleryEvent;
use crate::render::RenderSummary;
use crate::types::{Artwork, ArtworkFilter};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// ```text
/// 001 Colorful Abstract by Jane Doe
/// ```
fn entity_header(index: usize, artwork: &Artwork) -> String {
    format!(
        "{} {} by {}",
        format_index(index),
        artwork.title,
        artwork.artist
    )
}

fn artwork_lines(index: usize, artwork: &Artwork) -> Vec<String> {
    let mut lines = vec![entity_header(index, artwork)];
    let featured = if artwork.featured { " (featured)" } else { "" };
    lines.push(format!("{}Category: {}{}", indent(1), artwork.category, featured));
    lines.push(format!("{}Created: {}", indent(1), artwork.created_at));
    lines.push(format!("{}Image: {}", indent(1), artwork.image_url));
    if let Some(description) = artwork.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("{}Description: {}", indent(1), description));
    }
    lines
}

// ============================================================================
// Listings
// ============================================================================

pub fn format_artworks(filter: &ArtworkFilter, source: &str, artworks: &[Artwork]) -> Vec<String> {
    let mut lines = vec![format!(
        "Artworks (category: {}, artist: {}) from {}: {}",
        filter.category,
        filter.artist,
        source,
        artworks.len()
    )];
    if artworks.is_empty() {
        lines.push(format!("{}No artworks found matching your filters.", indent(1)));
    }
    for (i, artwork) in artworks.iter().enumerate() {
        lines.extend(artwork_lines(i + 1, artwork));
    }
    lines
}

pub fn print_artworks(filter: &ArtworkFilter, source: &str, artworks: &[Artwork]) {
    for line in format_artworks(filter, source, artworks) {
        println!("{}", line);
    }
}

pub fn format_featured(source: &str, limit: usize, artworks: &[Artwork]) -> Vec<String> {
    let mut lines = vec![format!(
        "Featured (up to {}) from {}: {}",
        limit,
        source,
        artworks.len()
    )];
    if artworks.is_empty() {
        lines.push(format!("{}No featured artwork available", indent(1)));
    }
    for (i, artwork) in artworks.iter().enumerate() {
        lines.extend(artwork_lines(i + 1, artwork));
    }
    lines
}

pub fn print_featured(source: &str, limit: usize, artworks: &[Artwork]) {
    for line in format_featured(source, limit, artworks) {
        println!("{}", line);
    }
}

pub fn format_artists(source: &str, artists: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Artists from {}: {}", source, artists.len())];
    lines.extend(
        artists
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{} {}", format_index(i + 1), name)),
    );
    lines
}

pub fn print_artists(source: &str, artists: &[String]) {
    for line in format_artists(source, artists) {
        println!("{}", line);
    }
}

// ============================================================================
// Upload
// ============================================================================

pub fn format_gallery_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::ImageUploaded { url } => vec![format!("Uploaded image: {}", url)],
        GalleryEvent::UploadFailed { reason } => vec![
            "Failed to upload image, using the placeholder".to_string(),
            format!("{}Reason: {}", indent(1), reason),
        ],
        GalleryEvent::ArtworkCreated { id, title, source } => {
            vec![format!("Created \"{}\" ({}) in {}", title, id, source)]
        }
        GalleryEvent::ArtworkKeptLocally { id, title, reason } => vec![
            format!("Could not store \"{}\"; kept for this session as {}", title, id),
            format!("{}Reason: {}", indent(1), reason),
        ],
    }
}

pub fn format_created(artwork: &Artwork) -> Vec<String> {
    let mut lines = vec!["Artwork".to_string()];
    lines.extend(artwork_lines(1, artwork));
    lines.push(format!("{}Id: {}", indent(1), artwork.id));
    lines
}

pub fn print_created(artwork: &Artwork) {
    for line in format_created(artwork) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_render_summary(summary: &RenderSummary) -> Vec<String> {
    vec![
        format!("Rendered {} from {}", summary.path.display(), summary.source),
        format!(
            "{}{} artworks, {} featured, {} artists",
            indent(1),
            summary.artworks,
            summary.featured,
            summary.artists
        ),
    ]
}

pub fn print_render_summary(summary: &RenderSummary) {
    for line in format_render_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
