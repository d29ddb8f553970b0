//! Preview sources
//!
//! A source retrieves the preview resource and decodes it as JSON. This is the
//! only suspension point of a render; everything after it is synchronous.

pub mod file;
pub mod http;
pub mod location;

pub use file::FileSource;
pub use http::HttpSource;
pub use location::PreviewLocation;

use crate::config::RenderConfig;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Trait for preview resource providers
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Retrieve the resource and decode it as JSON
    async fn fetch(&self) -> Result<Value>;

    /// Human-readable description of where the resource comes from
    fn describe(&self) -> String;
}

/// A source holding an already-decoded payload
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: Value,
}

impl StaticSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Decode a payload from raw JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let payload = decode(text.as_bytes())?;
        Ok(Self::new(payload))
    }
}

#[async_trait]
impl PreviewSource for StaticSource {
    async fn fetch(&self) -> Result<Value> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        "inline payload".to_string()
    }
}

/// Decode a response body, classifying failures as decode errors
pub(crate) fn decode(body: &[u8]) -> Result<Value> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    serde_json::from_slice(body).map_err(|e| {
        FetchError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Build the source a configuration points at
///
/// Relative file locations resolve against `page_dir`, the directory the
/// rendered page is written to.
pub fn from_config(config: &RenderConfig, page_dir: &Path) -> Result<Box<dyn PreviewSource>> {
    let location =
        PreviewLocation::resolve(&config.source, config.base_url.as_deref(), page_dir)?;

    Ok(match location {
        PreviewLocation::File(path) => Box::new(FileSource::new(path)),
        PreviewLocation::Url(url) => Box::new(HttpSource::new(url, config.timeout_secs)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_static_source_returns_payload() {
        let source = StaticSource::from_json(r#"[{"a": 1}]"#).unwrap();
        let value = source.fetch().await.unwrap();
        assert_eq!(value[0]["a"], 1);
    }

    #[test]
    fn test_invalid_json_is_a_decode_error() {
        let err = StaticSource::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Decode { .. })));
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let value = decode("\u{FEFF}[{\"a\": 2}]".as_bytes()).unwrap();
        assert_eq!(value[0]["a"], 2);
    }

    #[test]
    fn test_from_config_picks_source_kind() {
        let dir = tempfile::tempdir().unwrap();

        let config = RenderConfig::default();
        let source = from_config(&config, dir.path()).unwrap();
        assert!(source.describe().ends_with("preview.json"));
        assert!(source.describe().starts_with("file "));

        let config = RenderConfig::default().with_base_url("https://example.com/site/page/");
        let source = from_config(&config, dir.path()).unwrap();
        assert_eq!(source.describe(), "GET https://example.com/site/preview.json");
    }
}
