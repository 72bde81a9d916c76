//! Static gallery page generation.
//!
//! Renders the whole gallery into a single `index.html`: the data is fetched
//! once through [`Gallery`], and everything interactive (filter selects,
//! carousel autoplay, dark mode, upload modal) runs client-side from the
//! embedded script.
//!
//! ## Page Layout
//!
//! ```text
//! nav.navbar          title, Home / Gallery links, dark-mode toggle, Upload button
//! section.hero        featured carousel, or "No featured artwork available"
//! section.gallery     category + artist selects, card grid, empty state
//! div.modal           upload form
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/gallery.js`: Filtering, carousel, dark mode, upload modal
//!
//! The script filters cards by their `data-category` / `data-artist`
//! attributes with the same rule as [`GalleryView`](crate::filter::GalleryView),
//! category first, then artist.

use crate::config::{self, CarouselConfig, GalleryConfig};
use crate::filter::{GalleryView, category_options};
use crate::gallery::Gallery;
use crate::types::{Artwork, Category};
use crate::upload::megabytes;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What [`render_site`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub artworks: usize,
    pub featured: usize,
    pub artists: usize,
    pub source: &'static str,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

/// Render the gallery into `output_dir/index.html`.
pub fn render_site(
    gallery: &Gallery,
    config: &GalleryConfig,
    output_dir: &Path,
) -> Result<RenderSummary, RenderError> {
    let featured = gallery.list_featured_artworks(config.carousel.featured_limit);
    let view = GalleryView::load(gallery);

    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    let page = render_index(config, &featured, &view, &css);

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    debug!(path = %path.display(), "wrote gallery page");

    Ok(RenderSummary {
        path,
        artworks: view.artworks().len(),
        featured: featured.len(),
        artists: view.artists().len(),
        source: gallery.source_name(),
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content="A collection of artworks with filtering and featured pieces";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

const SUN_ICON: &str = "M12 3v1m0 16v1m9-9h-1M4 12H3m15.364 6.364l-.707-.707M6.343 6.343l-.707-.707m12.728 0l-.707.707M6.343 17.657l-.707.707M16 12a4 4 0 11-8 0 4 4 0 018 0z";
const MOON_ICON: &str = "M20.354 15.354A9 9 0 018.646 3.646 9.003 9.003 0 0012 21a9.003 9.003 0 008.354-5.646z";

fn icon(path: &str, class: &str) -> Markup {
    html! {
        svg class=(class) fill="none" stroke="currentColor" viewBox="0 0 24 24" aria-hidden="true" {
            path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d=(path) {}
        }
    }
}

/// Renders the top navigation bar
fn render_navbar(site_title: &str) -> Markup {
    html! {
        nav.navbar {
            a.logo href="/" { (site_title) }
            div.nav-links {
                a href="/" { "Home" }
                a href="#gallery" { "Gallery" }
                button.dark-toggle type="button" aria-label="Toggle dark mode" {
                    (icon(MOON_ICON, "icon icon-moon"))
                    (icon(SUN_ICON, "icon icon-sun"))
                }
                button.upload-open.button type="button" { "Upload Artwork" }
            }
        }
    }
}

/// Renders the featured carousel. Slides fade in turn and loop.
fn render_carousel(featured: &[Artwork], carousel: &CarouselConfig) -> Markup {
    html! {
        @if featured.is_empty() {
            section.hero.hero-empty {
                p { "No featured artwork available" }
            }
        } @else {
            section.hero.carousel
                data-delay=(carousel.delay_ms)
                data-speed=(carousel.speed_ms)
                style={ "--fade-ms: " (carousel.speed_ms) "ms" } {
                @for (idx, artwork) in featured.iter().enumerate() {
                    figure.slide.active[idx == 0] data-id=(artwork.id) {
                        img src=(artwork.image_url) alt=(artwork.title);
                        div.slide-shade {}
                        figcaption {
                            h2 { (artwork.title) }
                            p.slide-artist { "by " (artwork.artist) }
                            @if let Some(description) = &artwork.description {
                                p.slide-description { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one grid card
fn render_card(artwork: &Artwork) -> Markup {
    html! {
        article.artwork-card
            data-id=(artwork.id)
            data-category=(artwork.category.as_str())
            data-artist=(artwork.artist)
            data-created=(artwork.created_at.to_string()) {
            div.card-image {
                img src=(artwork.image_url) alt=(artwork.title) loading="lazy";
                div.card-overlay {
                    h3 { (artwork.title) }
                    p { "by " (artwork.artist) }
                    span.badge { (artwork.category.as_str()) }
                }
            }
            div.card-body {
                h3 { (artwork.title) }
                p.muted { "by " (artwork.artist) }
            }
        }
    }
}

fn render_select(id: &str, label: &str, options: &[String], selected: &str) -> Markup {
    html! {
        div.filter {
            label for=(id) { (label) }
            select id=(id) {
                @for option in options {
                    option value=(option) selected[option == selected] { (option) }
                }
            }
        }
    }
}

/// Renders the filterable grid with its empty state
fn render_gallery(view: &GalleryView) -> Markup {
    let filter = view.filter();
    html! {
        section.gallery id="gallery" {
            div.gallery-header {
                h2 { "Gallery" }
                div.filters {
                    (render_select("category-filter", "Category", &category_options(), &filter.category.to_string()))
                    (render_select("artist-filter", "Artist", &view.artist_options(), &filter.artist.to_string()))
                }
            }
            div.empty-state hidden[!view.is_empty()] {
                p { "No artworks found matching your filters." }
                button.clear-filters.button type="button" { "Clear Filters" }
            }
            div.grid {
                @for artwork in view.artworks() {
                    @let shown = filter.matches(artwork);
                    div.grid-item hidden[!shown] {
                        (render_card(artwork))
                    }
                }
            }
        }
    }
}

/// Renders the upload modal. Client-side checks mirror
/// [`ImageFile::check`](crate::upload::ImageFile::check).
///
/// With usable backend credentials the form carries the service URL, public
/// key, table, and bucket, and the script stores the image and row itself.
/// Without them the script keeps new artworks on the page only, with the
/// placeholder image.
fn render_upload_modal(config: &GalleryConfig) -> Markup {
    let backend = &config.backend;
    let connection = backend.connection().ok();
    let max_image_bytes = config.upload.max_image_bytes;
    let max_label = megabytes(&max_image_bytes);
    html! {
        div.modal hidden {
            div.modal-panel role="dialog" aria-modal="true" aria-labelledby="upload-title" {
                div.modal-header {
                    h2 id="upload-title" { "Upload Artwork" }
                    button.modal-close type="button" aria-label="Close" { "×" }
                }
                div.form-error role="alert" hidden {}
                form id="upload-form"
                    enctype="multipart/form-data"
                    data-max-bytes=(max_image_bytes)
                    data-max-label=(max_label)
                    data-placeholder=(backend.placeholder_image)
                    data-folder=(backend.folder.trim_matches('/'))
                    data-backend-url=[connection.as_ref().map(|c| c.url.as_str().trim_end_matches('/'))]
                    data-anon-key=[connection.as_ref().map(|c| c.anon_key.as_str())]
                    data-table=[connection.as_ref().map(|_| backend.table.as_str())]
                    data-bucket=[connection.as_ref().map(|_| backend.bucket.as_str())]
                    data-cache-control=[connection.as_ref().map(|_| backend.cache_control_secs)] {
                    div.field {
                        label for="title" { "Title " span.required { "*" } }
                        input id="title" type="text" name="title" required;
                    }
                    div.field {
                        label for="artist" { "Artist " span.required { "*" } }
                        input id="artist" type="text" name="artist" required;
                    }
                    div.field {
                        label for="category" { "Category " span.required { "*" } }
                        select id="category" name="category" required {
                            @for category in Category::VARIANTS {
                                option value=(category.as_str()) selected[category == Category::default()] {
                                    (category.as_str())
                                }
                            }
                        }
                    }
                    div.field {
                        label for="description" { "Description" }
                        textarea id="description" name="description" rows="3" {}
                    }
                    div.field {
                        label for="image" { "Image " span.required { "*" } }
                        input id="image" type="file" name="image" accept="image/*" required;
                        p.help { "Max file size: " (max_label) ". Supported formats: JPG, PNG, GIF." }
                    }
                    div.preview hidden {
                        p { "Preview" }
                        img alt="Preview";
                    }
                    div.form-actions {
                        button.modal-cancel.button-secondary type="button" { "Cancel" }
                        button.button type="submit" { "Upload" }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(
    config: &GalleryConfig,
    featured: &[Artwork],
    view: &GalleryView,
    css: &str,
) -> Markup {
    let content = html! {
        (render_navbar(&config.site.title))
        main {
            (render_carousel(featured, &config.carousel))
            (render_gallery(view))
        }
        (render_upload_modal(config))
    };
    base_document(&config.site.title, css, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{fixed_now, offline_gallery};
    use crate::types::ALL;
    use tempfile::TempDir;

    /// The opening tag of the first element whose tag text contains `marker`.
    fn opening_tag<'a>(html: &'a str, marker: &str) -> &'a str {
        let at = html.find(marker).unwrap();
        let start = html[..at].rfind('<').unwrap();
        let end = at + html[at..].find('>').unwrap();
        &html[start..=end]
    }

    fn artwork(id: &str, category: Category, artist: &str) -> Artwork {
        Artwork {
            id: id.to_string(),
            title: format!("Work {id}"),
            artist: artist.to_string(),
            category,
            image_url: format!("https://cdn.test/{id}.jpg"),
            description: None,
            created_at: fixed_now(),
            featured: true,
            owner: None,
        }
    }

    #[test]
    fn base_document_includes_doctype() {
        let doc = base_document("Test", "body {}", html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn navbar_has_toggle_and_upload() {
        let html = render_navbar("Studio").into_string();
        assert!(html.contains("Studio"));
        assert!(html.contains("dark-toggle"));
        assert!(html.contains("Upload Artwork"));
        assert!(html.contains(r##"href="#gallery""##));
    }

    #[test]
    fn empty_carousel_shows_message() {
        let html = render_carousel(&[], &CarouselConfig::default()).into_string();
        assert!(html.contains("No featured artwork available"));
        assert!(!html.contains("slide"));
    }

    #[test]
    fn carousel_carries_timing_and_first_active_slide() {
        let featured = vec![
            artwork("a", Category::Painting, "Ana"),
            artwork("b", Category::Digital, "Ben"),
        ];
        let html = render_carousel(&featured, &CarouselConfig::default()).into_string();
        assert!(html.contains(r#"data-delay="5000""#));
        assert!(html.contains(r#"data-speed="1000""#));
        assert_eq!(html.matches("slide active").count(), 1);
        assert!(html.contains("by Ana"));
    }

    #[test]
    fn card_exposes_filter_attributes() {
        let html = render_card(&artwork("m", Category::MixedMedia, "Sam Taylor")).into_string();
        assert!(html.contains(r#"data-category="Mixed Media""#));
        assert!(html.contains(r#"data-artist="Sam Taylor""#));
    }

    #[test]
    fn card_escapes_user_text() {
        let mut art = artwork("x", Category::Painting, "<b>Eve</b>");
        art.title = "A & B".to_string();
        let html = render_card(&art).into_string();
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(html.contains("A &amp; B"));
    }

    #[test]
    fn gallery_lists_all_cards_and_hides_empty_state() {
        let view = GalleryView::load(&offline_gallery());
        let html = render_gallery(&view).into_string();
        assert_eq!(html.matches("<article").count(), 5);
        assert!(opening_tag(&html, "empty-state").contains(" hidden"));
        assert!(html.contains("No artworks found matching your filters."));
        assert!(html.contains("Clear Filters"));
    }

    #[test]
    fn gallery_selects_start_with_all() {
        let view = GalleryView::load(&offline_gallery());
        let html = render_gallery(&view).into_string();
        assert_eq!(
            html.matches(&format!(r#"<option value="{ALL}" selected>"#)).count(),
            2
        );
        assert!(html.contains(r#"<option value="Maria Garcia">"#));
    }

    #[test]
    fn empty_view_shows_empty_state() {
        let view = GalleryView::new(Vec::new(), Vec::new());
        let html = render_gallery(&view).into_string();
        assert!(!opening_tag(&html, "empty-state").contains("hidden"));
    }

    #[test]
    fn upload_modal_field_contract() {
        let html = render_upload_modal(&GalleryConfig::default()).into_string();
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains(r#"data-max-bytes="5242880""#));
        assert!(html.contains(r#"data-max-label="5MB""#));
        assert!(html.contains("Max file size: 5MB"));
        assert!(html.contains(r#"<option value="Painting" selected>"#));
        assert_eq!(html.matches("required").count(), 4 + 4);
        assert!(!html.contains("action="));
    }

    #[test]
    fn upload_modal_elements_keep_their_ids() {
        let html = render_upload_modal(&GalleryConfig::default()).into_string();
        for id in ["upload-title", "upload-form", "title", "artist", "category", "description", "image"] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing id {id}");
        }
        let view = GalleryView::load(&offline_gallery());
        assert!(render_gallery(&view).into_string().contains(r#"id="gallery""#));
    }

    #[test]
    fn upload_modal_labels_fractional_limits() {
        let mut config = GalleryConfig::default();
        config.upload.max_image_bytes = 1_000_000;
        let html = render_upload_modal(&config).into_string();
        assert!(html.contains("Max file size: 1.0MB"));
        assert!(html.contains(r#"data-max-label="1.0MB""#));
        assert!(html.contains(r#"data-max-bytes="1000000""#));
    }

    #[test]
    fn upload_modal_without_backend_runs_on_the_page() {
        let config = GalleryConfig::default();
        let html = render_upload_modal(&config).into_string();
        let form = opening_tag(&html, "upload-form");
        assert!(form.contains(&format!(r#"data-placeholder="{}""#, config.backend.placeholder_image.replace('&', "&amp;"))));
        assert!(form.contains(r#"data-folder="artworks""#));
        assert!(!form.contains("data-backend-url"));
        assert!(!form.contains("data-anon-key"));
    }

    #[test]
    fn upload_modal_with_backend_carries_endpoints() {
        let mut config = GalleryConfig::default();
        config.backend.url = Some("https://demo.supabase.co".to_string());
        config.backend.anon_key = Some("public-anon-key-123".to_string());
        let html = render_upload_modal(&config).into_string();
        let form = opening_tag(&html, "upload-form");
        assert!(form.contains(r#"data-backend-url="https://demo.supabase.co""#));
        assert!(form.contains(r#"data-anon-key="public-anon-key-123""#));
        assert!(form.contains(r#"data-table="artworks""#));
        assert!(form.contains(r#"data-bucket="artwork-images""#));
        assert!(form.contains(r#"data-cache-control="3600""#));
    }

    #[test]
    fn render_site_writes_index() {
        let tmp = TempDir::new().unwrap();
        let gallery = offline_gallery();
        let config = GalleryConfig::default();

        let summary = render_site(&gallery, &config, &tmp.path().join("dist")).unwrap();
        assert_eq!(summary.artworks, 5);
        assert_eq!(summary.featured, 3);
        assert_eq!(summary.artists, 5);
        assert_eq!(summary.source, "memory");

        let html = fs::read_to_string(&summary.path).unwrap();
        assert!(html.contains("--color-bg: #ffffff"));
        assert!(html.contains("html.dark {"));
        assert!(html.contains("Colorful Abstract"));
    }

    #[test]
    fn render_site_includes_created_artwork() {
        let tmp = TempDir::new().unwrap();
        let gallery = offline_gallery();
        let draft = crate::test_helpers::filled_draft();
        gallery.create_artwork(draft).unwrap();

        let summary = render_site(&gallery, &GalleryConfig::default(), tmp.path()).unwrap();
        assert_eq!(summary.artworks, 6);
        let html = fs::read_to_string(&summary.path).unwrap();
        assert!(html.contains("Harbor at Dusk"));
    }
}
