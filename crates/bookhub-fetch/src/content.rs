//! The combined catalog content resource.

use bookhub_core::{error::BookhubError, record::CatalogContent, traits::ResourceSource};
use tracing::debug;

/// Fetch and parse the content resource at `path`.
///
/// Transport failures, non-success statuses and malformed bodies are all
/// errors; the caller decides how to present them.
pub async fn fetch_catalog(
    source: &dyn ResourceSource,
    path: &str,
) -> Result<CatalogContent, BookhubError> {
    let resp = source.fetch(path).await?.error_for_status()?;
    let content: CatalogContent = resp.json()?;
    debug!(
        "catalog: {} books, {} courses from {}",
        content.books().len(),
        content.courses().len(),
        source.name()
    );
    Ok(content)
}
