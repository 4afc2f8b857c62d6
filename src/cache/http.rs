use async_trait::async_trait;
use reqwest::Client;

use super::capabilities::AssetFetcher;
use crate::error::FetchError;

/// Downloads assets with a plain HTTP GET.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn get_file_data(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching asset");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| FetchError::request(url, e))
    }
}
