//! Per-language translation bundles with a single default-language retry.

use bookhub_core::{
    bundle::LanguageBundle, config::SiteConfig, error::BookhubError, lang::Lang,
    traits::ResourceSource,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Loads `<languages_dir>/<code>.json` bundles.
///
/// Nothing is cached; every call hits the source.
#[derive(Clone)]
pub struct TranslationLoader {
    source: Arc<dyn ResourceSource>,
    languages_dir: String,
    default_lang: Lang,
}

impl TranslationLoader {
    pub fn new(source: Arc<dyn ResourceSource>, languages_dir: &str, default_lang: Lang) -> Self {
        Self {
            source,
            languages_dir: languages_dir.trim_end_matches('/').to_string(),
            default_lang,
        }
    }

    /// Create from the site config.
    pub fn from_config(
        source: Arc<dyn ResourceSource>,
        site: &SiteConfig,
    ) -> Result<Self, BookhubError> {
        let default_lang = Lang::new(&site.default_lang)?;
        Ok(Self::new(source, &site.languages_dir, default_lang))
    }

    pub fn default_lang(&self) -> &Lang {
        &self.default_lang
    }

    fn path_for(&self, lang: &Lang) -> String {
        format!("{}/{}.json", self.languages_dir, lang.code())
    }

    /// Load the bundle for `lang`.
    ///
    /// A non-success status or transport failure is logged and retried once
    /// against the default language. Errors from that retry propagate.
    pub async fn load(&self, lang: &Lang) -> Result<LanguageBundle, BookhubError> {
        let path = self.path_for(lang);
        debug!("translations: loading {path}");

        match self.source.fetch(&path).await {
            Ok(resp) if resp.is_success() => return resp.json(),
            Ok(resp) => error!(
                "Could not load language file: {lang}. Status: {}",
                resp.status
            ),
            Err(e) => error!("Error loading language data for {lang}. Falling back to default: {e}"),
        }

        self.load_default().await
    }

    async fn load_default(&self) -> Result<LanguageBundle, BookhubError> {
        let path = self.path_for(&self.default_lang);
        let resp = self.source.fetch(&path).await?.error_for_status()?;
        resp.json()
    }
}
