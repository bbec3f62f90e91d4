//! Repository-snapshot source
//!
//! Downloads a ZIP archive of the content repository, extracts it into
//! a temporary directory, and reads the `date` field from the YAML
//! front matter of every markdown post. Posts without front matter or
//! without a `date` field are skipped. Extraction and scanning are
//! blocking work and run on the blocking thread pool.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use super::{check_status, http_client, DateSource, SourceError};

/// Fetches publication dates from a zipped repository snapshot
pub struct ArchiveSource {
    client: reqwest::Client,
    url: String,
    /// Path of the posts directory inside the extracted archive,
    /// e.g. `site-main/content/posts`
    posts_dir: String,
}

impl ArchiveSource {
    pub fn new(
        url: impl Into<String>,
        posts_dir: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
            posts_dir: posts_dir.into(),
        })
    }
}

#[async_trait]
impl DateSource for ArchiveSource {
    fn name(&self) -> &str {
        "archive"
    }

    async fn fetch_dates(&self) -> Result<Vec<String>, SourceError> {
        debug!(url = %self.url, "downloading repository snapshot");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let bytes = check_status(response)?
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        debug!(size = bytes.len(), "downloaded snapshot, extracting");

        let posts_dir = self.posts_dir.clone();
        let dates = tokio::task::spawn_blocking(move || {
            extract_and_scan(bytes.as_ref(), &posts_dir)
        })
        .await
        .map_err(|e| SourceError::Archive(format!("extraction task failed: {}", e)))??;

        debug!(count = dates.len(), "extracted publish dates from snapshot");
        Ok(dates)
    }
}

/// Extract the archive into a temp dir and scan the posts directory
fn extract_and_scan(bytes: &[u8], posts_dir: &str) -> Result<Vec<String>, SourceError> {
    let temp = tempfile::tempdir().map_err(|e| SourceError::Archive(e.to_string()))?;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SourceError::Archive(e.to_string()))?;
    archive
        .extract(temp.path())
        .map_err(|e| SourceError::Archive(e.to_string()))?;

    let posts_path = temp.path().join(posts_dir);
    if !posts_path.is_dir() {
        return Err(SourceError::Archive(format!(
            "posts directory {:?} not found in archive",
            posts_dir
        )));
    }

    scan_posts(&posts_path)
}

/// Collect front-matter dates from every markdown file under `dir`
fn scan_posts(dir: &Path) -> Result<Vec<String>, SourceError> {
    let mut dates = Vec::new();
    for item in WalkDir::new(dir).sort_by_file_name() {
        let item = item.map_err(|e| SourceError::Archive(e.to_string()))?;
        if !item.file_type().is_file() {
            continue;
        }
        let markdown = std::fs::read_to_string(item.path())
            .map_err(|e| SourceError::Archive(e.to_string()))?;
        if let Some(date) = front_matter_date(&markdown) {
            dates.push(date);
        }
    }
    Ok(dates)
}

/// Read the `date` field from a markdown file's YAML front matter
fn front_matter_date(markdown: &str) -> Option<String> {
    let rest = markdown.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let front_matter: serde_yaml::Value = serde_yaml::from_str(&rest[..end]).ok()?;
    front_matter
        .get("date")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_date_found() {
        let markdown = "---\ntitle: A post\ndate: 2024-01-08\n---\n\nBody text.\n";
        assert_eq!(front_matter_date(markdown), Some("2024-01-08".to_string()));
    }

    #[test]
    fn front_matter_without_date_skipped() {
        let markdown = "---\ntitle: A post\n---\n\nBody text.\n";
        assert_eq!(front_matter_date(markdown), None);
    }

    #[test]
    fn no_front_matter_skipped() {
        assert_eq!(front_matter_date("# Just a heading\n"), None);
        assert_eq!(front_matter_date(""), None);
    }

    #[test]
    fn scan_posts_reads_markdown_tree() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("a.md"),
            "---\ndate: 2024-01-08\n---\nfirst\n",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("b.md"),
            "---\ndate: 2024-02-20\n---\nsecond\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("c.md"), "no front matter\n").unwrap();

        let dates = scan_posts(temp.path()).unwrap();
        assert_eq!(dates, vec!["2024-01-08", "2024-02-20"]);
    }
}
