//! Shared record types used by every layer.
//!
//! [`Artwork`] mirrors a row of the hosted `artworks` table and is also the
//! shape of the in-memory catalog entries, so the same value flows from either
//! source to the views unchanged. The serde names match the table columns
//! (`imageUrl`, `createdAt`, `user_id`).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Filter value meaning "no constraint on this field".
pub const ALL: &str = "All";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{0}' (expected one of: Painting, Digital, Sculpture, Photography, Mixed Media)")]
pub struct UnknownCategory(pub String);

/// Artwork category. Stored records always carry one of these; "All" exists
/// only as [`Filter::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Painting,
    Digital,
    Sculpture,
    Photography,
    #[serde(rename = "Mixed Media")]
    MixedMedia,
}

impl Category {
    /// Every category in display order.
    pub const VARIANTS: [Category; 5] = [
        Category::Painting,
        Category::Digital,
        Category::Sculpture,
        Category::Photography,
        Category::MixedMedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Painting => "Painting",
            Category::Digital => "Digital",
            Category::Sculpture => "Sculpture",
            Category::Photography => "Photography",
            Category::MixedMedia => "Mixed Media",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses display names case-insensitively. `mixed-media` and `mixed_media`
/// are accepted so the value can be typed on a command line without quotes.
impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Category::VARIANTS
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Creation time of a record.
///
/// The in-memory catalog historically stored epoch milliseconds while the
/// table stores ISO-8601 strings, so deserialization accepts both. Values are
/// always serialized as RFC 3339 with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Parse an RFC 3339 string, or a zone-less `timestamp` column value
    /// (interpreted as UTC).
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("epoch milliseconds or an ISO-8601 timestamp")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                Timestamp::from_millis(v)
                    .ok_or_else(|| E::custom(format!("timestamp out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                let millis = i64::try_from(v)
                    .map_err(|_| E::custom(format!("timestamp out of range: {v}")))?;
                self.visit_i64(millis)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
                if !v.is_finite() || v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
                    return Err(E::custom(format!("timestamp is not whole milliseconds: {v}")));
                }
                self.visit_i64(v as i64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
                Timestamp::parse(v).ok_or_else(|| E::custom(format!("invalid timestamp: {v}")))
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// An artwork record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub category: Category,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub featured: bool,
    /// Owning user, when the table row has one.
    #[serde(default, rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Sort most recently created first. Stable, so records sharing a timestamp
/// keep their relative order.
pub fn sort_newest_first(artworks: &mut [Artwork]) {
    artworks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// One side of a filter selection: either no constraint or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T> Filter<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn admits(&self, candidate: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(v) => v == candidate,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL),
            Filter::Only(v) => v.fmt(f),
        }
    }
}

/// A (category, artist) filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkFilter {
    pub category: Filter<Category>,
    pub artist: Filter<String>,
}

impl ArtworkFilter {
    pub fn new(category: Filter<Category>, artist: Filter<String>) -> Self {
        Self { category, artist }
    }

    pub fn category(category: Category) -> Self {
        Self {
            category: Filter::Only(category),
            artist: Filter::All,
        }
    }

    pub fn artist(artist: impl Into<String>) -> Self {
        Self {
            category: Filter::All,
            artist: Filter::Only(artist.into()),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_all() && self.artist.is_all()
    }

    pub fn matches(&self, artwork: &Artwork) -> bool {
        self.category.admits(&artwork.category) && self.artist.admits(&artwork.artist)
    }

    /// Category first, then artist; input order is preserved.
    pub fn apply(&self, artworks: &[Artwork]) -> Vec<Artwork> {
        artworks
            .iter()
            .filter(|a| self.category.admits(&a.category))
            .filter(|a| self.artist.admits(&a.artist))
            .cloned()
            .collect()
    }
}
