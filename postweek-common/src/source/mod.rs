//! Remote publication-date sources
//!
//! The service only ever needs one capability from the outside world:
//! "produce an ordered sequence of ISO date strings". Three backends
//! provide it (repository ZIP snapshot, RSS feed, JSON endpoint), each
//! as one implementation of [`DateSource`], selected by configuration.

pub mod archive;
pub mod feed;
pub mod json;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use archive::ArchiveSource;
pub use feed::FeedSource;
pub use json::JsonSource;

const USER_AGENT: &str = concat!("postweek/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Date-source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("feed parse error: {0}")]
    Feed(String),

    #[error("archive error: {0}")]
    Archive(String),
}

/// A remote source of publication dates
///
/// Implementations fetch from their backend on every call; caching
/// happens above this trait, in the data service. A failure fails the
/// whole refresh, there are no retries and no partial results.
#[async_trait]
pub trait DateSource: Send + Sync {
    /// Short name for logging: "json", "feed", "archive"
    fn name(&self) -> &str;

    /// Fetch the ordered sequence of raw publication-date strings
    async fn fetch_dates(&self) -> Result<Vec<String>, SourceError>;
}

/// Build the configured source implementation
pub fn from_config(config: &crate::config::SourceConfig) -> Result<Box<dyn DateSource>, SourceError> {
    use crate::config::SourceKind;

    Ok(match config.kind {
        SourceKind::Json => Box::new(JsonSource::new(&config.url)?),
        SourceKind::Feed => Box::new(FeedSource::new(&config.url)?),
        SourceKind::Archive => Box::new(ArchiveSource::new(
            &config.url,
            config.posts_dir.as_deref().unwrap_or_default(),
        )?),
    })
}

/// Build the shared HTTP client used by all sources
pub(crate) fn http_client() -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| SourceError::Network(e.to_string()))
}

/// Check an upstream response status, mapping non-2xx to an error
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }
    Ok(response)
}
