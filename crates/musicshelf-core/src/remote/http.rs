//! HTTP/JSON remote source

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Client;
use tracing::{debug, info};

use super::{FetchError, FetchResult, RemoteSource};
use crate::config::Config;
use crate::models::Singer;

/// Fetches the singer list from a JSON endpoint
#[derive(Clone)]
pub struct HttpRemote {
    http: Client,
    url: String,
}

impl HttpRemote {
    /// Build a source from the application configuration
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// Build a source for an explicit URL
    pub fn new(url: &str, timeout: Duration) -> FetchResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("musicshelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    /// Fetch and decode the singer list
    pub async fn fetch_singers(&self) -> FetchResult<Vec<Singer>> {
        debug!("Fetching singers from {}", self.url);
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        // Decode separately so a malformed body is reported as such
        let bytes = response.bytes().await?;
        let singers: Vec<Singer> = serde_json::from_slice(&bytes)?;

        info!("Fetched {} singers", singers.len());
        Ok(singers)
    }
}

impl RemoteSource for HttpRemote {
    fn fetch(&self) -> BoxFuture<'static, FetchResult<Vec<Singer>>> {
        let this = self.clone();
        async move { this.fetch_singers().await }.boxed()
    }
}
