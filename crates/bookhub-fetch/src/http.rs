//! Resources served over HTTP.

use async_trait::async_trait;
use bookhub_core::{
    config::SiteConfig,
    error::BookhubError,
    traits::{ResourceSource, Response},
};
use std::time::Duration;
use tracing::debug;

/// Fetches site-relative paths below a base URL.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from the site config, applying the optional request timeout.
    pub fn from_config(site: &SiteConfig) -> Result<Self, BookhubError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = site.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BookhubError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: site.base.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches("./").trim_start_matches('/'))
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, path: &str) -> Result<Response, BookhubError> {
        let url = self.url_for(path);
        debug!("http: GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookhubError::Fetch(format!("GET {url} failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| BookhubError::Fetch(format!("reading {url} failed: {e}")))?;

        Ok(Response {
            path: path.to_string(),
            status,
            body,
        })
    }
}
