use crate::config::{AppConfig, DataSource};
use crate::model::{FeedRequest, FetchError};
use crate::scraper::traits::Fetcher;

use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Loads feed files over HTTP from a base URL.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, req: &FeedRequest) -> String {
        format!("{}/{}", self.base_url, req.path())
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, req: &FeedRequest) -> Result<String, FetchError> {
        let url = self.build_url(req);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

/// Loads feed files from a local data directory.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, req: &FeedRequest) -> Result<String, FetchError> {
        let path = self.root.join(req.path());
        debug!("Reading {}", path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }
}

/// Builds the fetcher matching the configured data source.
pub fn fetcher_for(config: &AppConfig) -> Result<Box<dyn Fetcher>, FetchError> {
    Ok(match &config.data_source {
        DataSource::Dir(root) => Box::new(DirectoryFetcher::new(root.clone())),
        DataSource::Url(base) => Box::new(HttpFetcher::new(
            base,
            &config.user_agent,
            config.request_timeout_seconds,
        )?),
    })
}
