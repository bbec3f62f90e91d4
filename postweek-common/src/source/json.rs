//! JSON endpoint source
//!
//! The simplest backend: a fixed URL serving a JSON array of ISO date
//! strings, one per published post.

use async_trait::async_trait;
use tracing::debug;

use super::{check_status, http_client, DateSource, SourceError};

/// Fetches publication dates from a JSON array endpoint
pub struct JsonSource {
    client: reqwest::Client,
    url: String,
}

impl JsonSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DateSource for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    async fn fetch_dates(&self) -> Result<Vec<String>, SourceError> {
        debug!(url = %self.url, "fetching publication dates");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let dates: Vec<String> = check_status(response)?
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        debug!(count = dates.len(), "fetched publication dates");
        Ok(dates)
    }
}
