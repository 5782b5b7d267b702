//! Session: owns the page document and the persisted UI state.
//!
//! A language switch loads the bundle, translates the static page, persists
//! the choice and hands off to the [`ContentLoader`]. Theme changes only
//! touch the body class and the toggle icon.

use crate::loader::{ContentLoader, RequestGeneration, RunOutcome};
use bookhub_core::{
    config::Config,
    error::BookhubError,
    lang::{Lang, Theme, UiState},
    shellexpand,
    traits::ResourceSource,
};
use bookhub_fetch::{build_source, TranslationLoader};
use bookhub_render::HtmlDocument;
use bookhub_storage::Store;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct Session {
    config: Arc<Config>,
    store: Store,
    translations: TranslationLoader,
    loader: ContentLoader,
    document: Arc<Mutex<HtmlDocument>>,
    generation: Arc<RequestGeneration>,
}

impl Session {
    /// Build a session from config: read the template, open the store and
    /// pick the resource source for `site.base`.
    pub async fn new(config: Config) -> Result<Self, BookhubError> {
        let template_path = shellexpand(&config.page.template);
        let template = tokio::fs::read_to_string(&template_path).await.map_err(|e| {
            BookhubError::Render(format!("failed to read template {template_path}: {e}"))
        })?;
        let source = build_source(&config.site)?;
        let store = Store::new(&config.storage).await?;
        info!("Session using {} for {}", source.name(), config.site.base);
        Self::from_parts(config, source, store, template)
    }

    pub fn from_parts(
        config: Config,
        source: Arc<dyn ResourceSource>,
        store: Store,
        template: String,
    ) -> Result<Self, BookhubError> {
        let config = Arc::new(config);
        let translations = TranslationLoader::from_config(source.clone(), &config.site)?;
        let document = Arc::new(Mutex::new(HtmlDocument::new(template)));
        let generation = Arc::new(RequestGeneration::new());
        let loader = ContentLoader::new(
            source,
            translations.clone(),
            store.clone(),
            document.clone(),
            generation.clone(),
            config.clone(),
        );
        Ok(Self {
            config,
            store,
            translations,
            loader,
            document,
            generation,
        })
    }

    /// Persisted UI state, with the configured defaults filled in.
    pub async fn ui_state(&self) -> Result<UiState, BookhubError> {
        self.store.ui_state(self.translations.default_lang()).await
    }

    /// Apply the stored theme and switch to the stored language.
    pub async fn start(&self) -> Result<RunOutcome, BookhubError> {
        let state = self.ui_state().await?;
        self.apply_theme(state.theme).await;
        self.set_language(&state.lang).await
    }

    /// Switch the page to `lang` and re-render all cards.
    ///
    /// Translation load failures propagate after the default-language
    /// retry; content failures are rendered as placeholders.
    pub async fn set_language(&self, lang: &Lang) -> Result<RunOutcome, BookhubError> {
        let ticket = self.generation.begin();
        let bundle = self.translations.load(lang).await?;

        {
            let mut doc = self.document.lock().await;
            if !self.generation.is_current(ticket) {
                debug!("session: discarding stale switch to {lang} (ticket {ticket})");
                return Ok(RunOutcome::Stale);
            }
            let updated = doc.apply_translations(&bundle);
            doc.set_language(lang, &self.config.page.language_selector);
            debug!("session: {updated} bindings translated for {lang}");
            // Saved while the lock is held so the stored language always
            // matches the page.
            self.store.save_lang(lang).await?;
        }
        info!("Language set to {lang}");

        Ok(self.loader.run(lang, ticket).await)
    }

    /// Flip the theme, persist it and apply it. Returns the new theme.
    pub async fn toggle_theme(&self) -> Result<Theme, BookhubError> {
        let next = self.ui_state().await?.theme.toggled();
        self.store.save_theme(next).await?;
        self.apply_theme(next).await;
        info!("Theme set to {next}");
        Ok(next)
    }

    pub async fn apply_theme(&self, theme: Theme) {
        let mut doc = self.document.lock().await;
        doc.set_theme(theme, &self.config.page.theme_toggle);
    }

    /// Snapshot of the current page.
    pub async fn html(&self) -> String {
        self.document.lock().await.as_str().to_string()
    }

    /// Write the current page to `path`, creating parent directories.
    pub async fn publish(&self, path: &str) -> Result<(), BookhubError> {
        let path = shellexpand(path);
        let html = self.html().await;
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&path, html).await?;
        info!("Published page to {path}");
        Ok(())
    }
}
