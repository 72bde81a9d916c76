//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults are
//! serialized to a TOML table, the user file is merged on top of it, and the
//! result is deserialized and validated. Backend credentials may also come from
//! the environment, which wins over the file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "ArtGallery"
//!
//! [backend]
//! # url = "https://<project>.supabase.co"   # or SUPABASE_URL
//! # anon_key = "<public anon key>"           # or SUPABASE_ANON_KEY
//! table = "artworks"
//! bucket = "artwork-images"
//! folder = "artworks"          # Object key prefix inside the bucket
//! cache_control_secs = 3600
//! placeholder_image = "https://images.unsplash.com/photo-1579783901586-d88db74b4fe4?auto=format&fit=crop&w=800"
//! connect_timeout_secs = 10
//! timeout_secs = 30
//!
//! [carousel]
//! featured_limit = 5
//! delay_ms = 5000              # Time each slide stays up
//! speed_ms = 1000              # Fade duration
//!
//! [upload]
//! max_image_bytes = 5242880    # 5MB
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111827"
//! text_muted = "#4b5563"
//! border = "#e5e7eb"
//! accent = "#2563eb"
//! accent_hover = "#1d4ed8"
//!
//! [colors.dark]
//! background = "#111827"
//! text = "#f9fafb"
//! text_muted = "#d1d5db"
//! border = "#374151"
//! accent = "#60a5fa"
//! accent_hover = "#93c5fd"
//! ```
//!
//! ## Backend Selection
//!
//! When no backend URL/key is configured, or either is malformed, the gallery
//! runs against the in-memory catalog. That decision is made once, from
//! [`BackendConfig::connection`].
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "gallery.toml";

pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";
pub const ENV_BACKEND_KEY: &str = "SUPABASE_ANON_KEY";

/// Access keys this short are treated as unset.
const MIN_KEY_LEN: usize = 11;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("backend is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")]
    BackendMissing,
    #[error("backend configuration is invalid: {0}")]
    BackendInvalid(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Site identity and form target.
    pub site: SiteConfig,
    /// Hosted table and bucket settings.
    pub backend: BackendConfig,
    /// Featured carousel behavior.
    pub carousel: CarouselConfig,
    /// Upload form limits.
    pub upload: UploadConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.featured_limit == 0 {
            return Err(ConfigError::Validation(
                "carousel.featured_limit must be at least 1".into(),
            ));
        }
        if self.upload.max_image_bytes == 0 {
            return Err(ConfigError::Validation(
                "upload.max_image_bytes must be non-zero".into(),
            ));
        }
        for (key, value) in [
            ("backend.table", &self.backend.table),
            ("backend.bucket", &self.backend.bucket),
            ("backend.placeholder_image", &self.backend.placeholder_image),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Override backend credentials from the environment-style `lookup`.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// mask the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend.url = Some(url);
        }
        if let Some(key) = non_empty(ENV_BACKEND_KEY) {
            self.backend.anon_key = Some(key);
        }
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Name shown in the navbar and the page title.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "ArtGallery".to_string(),
        }
    }
}

/// Hosted backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Service base URL, e.g. `https://<project>.supabase.co`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Public (anon) access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    /// Table holding artwork rows.
    pub table: String,
    /// Storage bucket holding images.
    pub bucket: String,
    /// Key prefix for uploaded images inside the bucket.
    pub folder: String,
    /// `cache-control` max-age attached to uploaded objects.
    pub cache_control_secs: u32,
    /// Image URL used whenever a real upload is not available.
    pub placeholder_image: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "artworks".to_string(),
            bucket: "artwork-images".to_string(),
            folder: "artworks".to_string(),
            cache_control_secs: 3600,
            placeholder_image: "https://images.unsplash.com/photo-1579783901586-d88db74b4fe4?auto=format&fit=crop&w=800".to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

/// Validated backend credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub url: Url,
    pub anon_key: String,
}

impl BackendConfig {
    /// Resolve usable credentials.
    ///
    /// - Either value missing → [`ConfigError::BackendMissing`]
    /// - URL that is not `http(s)://host` or a key of 10 characters or fewer
    ///   → [`ConfigError::BackendInvalid`]
    pub fn connection(&self) -> Result<Connection, ConfigError> {
        let (Some(raw_url), Some(key)) = (self.url.as_deref(), self.anon_key.as_deref()) else {
            return Err(ConfigError::BackendMissing);
        };
        let url = Url::parse(raw_url.trim())
            .map_err(|e| ConfigError::BackendInvalid(format!("url '{raw_url}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::BackendInvalid(format!(
                "url '{raw_url}' must be an http(s) address"
            )));
        }
        let key = key.trim();
        if key.len() < MIN_KEY_LEN {
            return Err(ConfigError::BackendInvalid(
                "anon_key is too short to be a real key".into(),
            ));
        }
        Ok(Connection {
            url,
            anon_key: key.to_string(),
        })
    }
}

/// Featured carousel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Maximum number of featured artworks shown.
    pub featured_limit: usize,
    /// Milliseconds each slide stays visible.
    pub delay_ms: u32,
    /// Fade transition duration in milliseconds.
    pub speed_ms: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            featured_limit: 5,
            delay_ms: 5000,
            speed_ms: 1000,
        }
    }
}

/// Upload form limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted image file, in bytes.
    pub max_image_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Color configuration for light and dark modes.
///
/// Each scheme is sparse: keys missing from `[colors.light]` come from the
/// stock light scheme, keys missing from `[colors.dark]` from the stock dark
/// scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    #[serde(deserialize_with = "light_scheme")]
    pub light: ColorScheme,
    /// Dark mode color scheme (applied when the toggle sets `html.dark`).
    #[serde(deserialize_with = "dark_scheme")]
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text (artist lines, help text).
    pub text_muted: String,
    pub border: String,
    /// Buttons and links.
    pub accent: String,
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            text_muted: "#4b5563".to_string(),
            border: "#e5e7eb".to_string(),
            accent: "#2563eb".to_string(),
            accent_hover: "#1d4ed8".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111827".to_string(),
            text: "#f9fafb".to_string(),
            text_muted: "#d1d5db".to_string(),
            border: "#374151".to_string(),
            accent: "#60a5fa".to_string(),
            accent_hover: "#93c5fd".to_string(),
        }
    }
}

/// A scheme table as written in the file, every key optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeOverrides {
    background: Option<String>,
    text: Option<String>,
    text_muted: Option<String>,
    border: Option<String>,
    accent: Option<String>,
    accent_hover: Option<String>,
}

impl SchemeOverrides {
    fn over(self, base: ColorScheme) -> ColorScheme {
        ColorScheme {
            background: self.background.unwrap_or(base.background),
            text: self.text.unwrap_or(base.text),
            text_muted: self.text_muted.unwrap_or(base.text_muted),
            border: self.border.unwrap_or(base.border),
            accent: self.accent.unwrap_or(base.accent),
            accent_hover: self.accent_hover.unwrap_or(base.accent_hover),
        }
    }
}

fn light_scheme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ColorScheme, D::Error> {
    Ok(SchemeOverrides::deserialize(deserializer)?.over(ColorScheme::default_light()))
}

fn dark_scheme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ColorScheme, D::Error> {
    Ok(SchemeOverrides::deserialize(deserializer)?.over(ColorScheme::default_dark()))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, then apply `SUPABASE_URL` / `SUPABASE_ANON_KEY`.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let mut config = resolve_config(stock_defaults_value(), load_raw_config(path)?)?;
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Artfolio Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Name shown in the navbar and the browser tab.
title = "ArtGallery"

# ---------------------------------------------------------------------------
# Hosted backend
# ---------------------------------------------------------------------------
# Without a url and anon_key the gallery runs on its built-in sample catalog.
# SUPABASE_URL and SUPABASE_ANON_KEY in the environment override these.
[backend]
# url = "https://your-project.supabase.co"
# anon_key = "your-public-anon-key"

# Table holding one row per artwork.
table = "artworks"

# Storage bucket and key prefix for uploaded images.
bucket = "artwork-images"
folder = "artworks"

# max-age attached to uploaded images.
cache_control_secs = 3600

# Shown whenever an image could not be uploaded.
placeholder_image = "https://images.unsplash.com/photo-1579783901586-d88db74b4fe4?auto=format&fit=crop&w=800"

# HTTP limits, in seconds.
connect_timeout_secs = 10
timeout_secs = 30

# ---------------------------------------------------------------------------
# Featured carousel
# ---------------------------------------------------------------------------
[carousel]
featured_limit = 5
delay_ms = 5000
speed_ms = 1000

# ---------------------------------------------------------------------------
# Uploads
# ---------------------------------------------------------------------------
[upload]
# Largest accepted image (5MB).
max_image_bytes = 5242880

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111827"
text_muted = "#4b5563"
border = "#e5e7eb"
accent = "#2563eb"
accent_hover = "#1d4ed8"

# ---------------------------------------------------------------------------
# Colors - Dark mode (navbar toggle)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111827"
text = "#f9fafb"
text_muted = "#d1d5db"
border = "#374151"
accent = "#60a5fa"
accent_hover = "#93c5fd"
"##
}

/// Generate CSS custom properties from color config.
///
/// Light values sit on `:root`; dark values apply under `html.dark`, which the
/// navbar toggle sets.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
    --color-accent-hover: {light_accent_hover};
}}

html.dark {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-text-muted: {dark_text_muted};
    --color-border: {dark_border};
    --color-accent: {dark_accent};
    --color-accent-hover: {dark_accent_hover};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        light_accent_hover = colors.light.accent_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
        dark_accent_hover = colors.dark.accent_hover,
    )
}
