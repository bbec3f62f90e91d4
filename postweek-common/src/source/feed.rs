//! RSS/Atom feed source
//!
//! Polls a syndication feed and takes each item's publish timestamp,
//! formatted down to a calendar date. Items without a publish or update
//! timestamp are skipped.

use async_trait::async_trait;
use tracing::debug;

use super::{check_status, http_client, DateSource, SourceError};

/// Fetches publication dates from an RSS or Atom feed
pub struct FeedSource {
    client: reqwest::Client,
    url: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DateSource for FeedSource {
    fn name(&self) -> &str {
        "feed"
    }

    async fn fetch_dates(&self) -> Result<Vec<String>, SourceError> {
        debug!(url = %self.url, "fetching feed");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let body = check_status(response)?
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let feed = feed_rs::parser::parse(body.as_ref())
            .map_err(|e| SourceError::Feed(e.to_string()))?;

        let dates: Vec<String> = feed
            .entries
            .iter()
            .filter_map(|item| item.published.or(item.updated))
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .collect();

        debug!(count = dates.len(), "extracted publish dates from feed");
        Ok(dates)
    }
}
