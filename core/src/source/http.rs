//! HTTP preview source

use super::{decode, PreviewSource};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Retrieves the preview resource with a plain GET
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    /// Create a source; without a timeout the request waits indefinitely
    pub fn new(url: Url, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("convpage/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }
}

#[async_trait]
impl PreviewSource for HttpSource {
    async fn fetch(&self) -> Result<Value> {
        debug!(url = %self.url, "requesting preview");

        let network = |e: reqwest::Error| FetchError::Network {
            url: self.url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(network)?;
        decode(&body)
    }

    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }
}
