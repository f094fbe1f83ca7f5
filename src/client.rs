use crate::dataset::Dataset;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::path::Path;

pub static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .expect("failed to build reqwest client")
});

/// Fetches the `{columns, data}` document from `url`.
///
/// The dashboard serves the document as plain text, so the body is parsed
/// regardless of its content type. Failures are returned as-is; there is no retry.
pub async fn fetch_dataset(url: &str) -> Result<Dataset> {
    tracing::debug!(url, "fetching dataset");
    let res = CLIENT
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to GET {}", url))?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        anyhow::bail!("{} returned {}: {}", url, status, body);
    }
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;
    Dataset::from_json(&body).with_context(|| format!("Failed to parse dataset from {}", url))
}

/// Reads the document from a local file, as saved from the endpoint.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Dataset::from_json(&body).with_context(|| format!("Failed to parse dataset from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_saved_document() -> Result<()> {
        let path = std::env::temp_dir().join(format!("dataset-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"columns": ["id", "name"], "data": [[1, "LA001"], [1, "LA001"]]}"#,
        )?;
        let ds = read_dataset(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(ds.columns, vec!["id", "name"]);
        assert_eq!(ds.len(), 2);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_dataset(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/dataset.json"));
    }
}
