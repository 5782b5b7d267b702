//! # bookhub-fetch
//!
//! Resource sources (HTTP and local directory) and the loaders built on
//! them: translation bundles with default-language fallback, and the
//! combined catalog content.

pub mod content;
pub mod fs;
pub mod http;
pub mod translations;

use bookhub_core::{config::SiteConfig, error::BookhubError, traits::ResourceSource};
use std::sync::Arc;

pub use content::fetch_catalog;
pub use translations::TranslationLoader;

/// Build the source selected by `site.base`.
pub fn build_source(site: &SiteConfig) -> Result<Arc<dyn ResourceSource>, BookhubError> {
    if site.is_remote() {
        Ok(Arc::new(http::HttpSource::from_config(site)?))
    } else {
        Ok(Arc::new(fs::FsSource::new(&site.base)))
    }
}
