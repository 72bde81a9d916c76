//! Supabase client over blocking HTTP.
//!
//! Talks to the two Supabase services the gallery uses: PostgREST for the
//! `artworks` table and the Storage API for the image bucket. Every request
//! carries the public anon key both as `apikey` and as a bearer token, which is
//! how Supabase authorizes anonymous clients.

use super::{BackendClient, BackendError, ObjectUpload, Query};
use crate::config::{BackendConfig, Connection};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct SupabaseClient {
    base: Url,
    anon_key: String,
    agent: ureq::Agent,
}

impl SupabaseClient {
    pub fn new(connection: &Connection, settings: &BackendConfig) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(settings.connect_timeout_secs)))
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        Self {
            base: connection.url.clone(),
            anon_key: connection.anon_key.clone(),
            agent: config.into(),
        }
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded on
    /// its own, so callers split object keys on `/` first.
    fn endpoint<'a, I>(&self, segments: I) -> Result<Url, BackendError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Endpoint(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_endpoint(&self, table: &str) -> Result<Url, BackendError> {
        self.endpoint(["rest", "v1", table])
    }

    fn object_endpoint(&self, public: bool, bucket: &str, path: &str) -> Result<Url, BackendError> {
        let prefix: &[&str] = if public {
            &["storage", "v1", "object", "public"]
        } else {
            &["storage", "v1", "object"]
        };
        self.endpoint(
            prefix
                .iter()
                .copied()
                .chain(std::iter::once(bucket))
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.anon_key)
    }
}

impl BackendClient for SupabaseClient {
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let mut url = self.table_endpoint(table)?;
        url.query_pairs_mut().extend_pairs(query.to_params());
        debug!(%url, "selecting rows");

        let rows: Vec<Value> = self
            .agent
            .get(url.as_str())
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", self.bearer())
            .header("Accept", "application/json")
            .call()?
            .body_mut()
            .read_json()?;
        Ok(rows)
    }

    fn insert(&self, table: &str, row: &Value) -> Result<Value, BackendError> {
        let url = self.table_endpoint(table)?;
        debug!(%url, "inserting row");

        let rows: Vec<Value> = self
            .agent
            .post(url.as_str())
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", self.bearer())
            .header("Prefer", "return=representation")
            .send_json(Value::Array(vec![row.clone()]))?
            .body_mut()
            .read_json()?;

        // return=representation answers with the inserted rows; one in, one out.
        let count = rows.len();
        let mut rows = rows.into_iter();
        match (rows.next(), count) {
            (Some(stored), 1) => Ok(stored),
            _ => Err(BackendError::UnexpectedResponse(format!(
                "insert returned {count} rows, expected 1"
            ))),
        }
    }

    fn upload(&self, bucket: &str, object: &ObjectUpload<'_>) -> Result<(), BackendError> {
        let url = self.object_endpoint(false, bucket, object.path)?;
        debug!(%url, bytes = object.bytes.len(), "uploading object");

        self.agent
            .post(url.as_str())
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", self.bearer())
            .header("Content-Type", object.content_type)
            .header("cache-control", format!("max-age={}", object.cache_control_secs))
            .header("x-upsert", if object.upsert { "true" } else { "false" })
            .send(object.bytes)?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError> {
        Ok(self.object_endpoint(true, bucket, path)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SupabaseClient {
        let connection = Connection {
            url: Url::parse(base).unwrap(),
            anon_key: "public-anon-key".to_string(),
        };
        SupabaseClient::new(&connection, &BackendConfig::default())
    }

    #[test]
    fn table_endpoint_appends_rest_path() {
        let url = client("https://demo.supabase.co").table_endpoint("artworks").unwrap();
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/artworks");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let url = client("https://demo.supabase.co/").table_endpoint("artworks").unwrap();
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/artworks");
    }

    #[test]
    fn public_url_keeps_object_key_slashes() {
        let url = client("https://demo.supabase.co")
            .public_url("artwork-images", "artworks/1747015416000_abc.png")
            .unwrap();
        assert_eq!(
            url,
            "https://demo.supabase.co/storage/v1/object/public/artwork-images/artworks/1747015416000_abc.png"
        );
    }

    #[test]
    fn upload_endpoint_is_not_public() {
        let url = client("https://demo.supabase.co")
            .object_endpoint(false, "artwork-images", "artworks/a.jpg")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/storage/v1/object/artwork-images/artworks/a.jpg"
        );
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let mut url = client("https://demo.supabase.co").table_endpoint("artworks").unwrap();
        url.query_pairs_mut()
            .extend_pairs(Query::select("*").eq("category", "Mixed Media").to_params());
        assert_eq!(url.query(), Some("select=*&category=eq.Mixed+Media"));
    }

    #[test]
    fn bearer_header_uses_anon_key() {
        assert_eq!(client("https://demo.supabase.co").bearer(), "Bearer public-anon-key");
    }
}
