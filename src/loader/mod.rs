//! Content loader: fetches the catalog and renders it into the page.
//!
//! A run never fails: fetch and parse errors become placeholder text in the
//! target regions. Every language switch carries a ticket from
//! [`RequestGeneration`]; a run whose ticket is no longer current leaves the
//! document alone.

use bookhub_core::{
    bundle::LanguageBundle,
    config::{Config, PlaceholderText},
    error::BookhubError,
    lang::Lang,
    record::CatalogContent,
    traits::ResourceSource,
};
use bookhub_fetch::{fetch_catalog, TranslationLoader};
use bookhub_render::{
    html_escape, render_all, BadgeLabels, Book, Course, HtmlDocument, RenderContext,
    RevealObserver,
};
use bookhub_storage::Store;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Monotonic counter handing out language-switch tickets.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its ticket.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }
}

/// What a loader run did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A target region is missing; nothing was touched.
    Skipped,
    /// Content or translations could not be loaded; placeholders shown.
    Failed,
    /// A newer language switch started meanwhile; results discarded.
    Stale,
    /// Cards rendered.
    Rendered { books: usize, courses: usize },
}

/// Renders the book and course regions of the shared document.
#[derive(Clone)]
pub struct ContentLoader {
    source: Arc<dyn ResourceSource>,
    translations: TranslationLoader,
    store: Store,
    document: Arc<Mutex<HtmlDocument>>,
    generation: Arc<RequestGeneration>,
    config: Arc<Config>,
    reveal: RevealObserver,
}

impl ContentLoader {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        translations: TranslationLoader,
        store: Store,
        document: Arc<Mutex<HtmlDocument>>,
        generation: Arc<RequestGeneration>,
        config: Arc<Config>,
    ) -> Self {
        let reveal = RevealObserver::from_config(&config.reveal);
        Self {
            source,
            translations,
            store,
            document,
            generation,
            config,
            reveal,
        }
    }

    /// Fetch content and translations for `lang` and render both regions.
    pub async fn run(&self, lang: &Lang, ticket: u64) -> RunOutcome {
        let page = &self.config.page;
        {
            let doc = self.document.lock().await;
            if !doc.has_region(&page.books_region) || !doc.has_region(&page.courses_region) {
                debug!("loader: target regions missing, nothing to render");
                return RunOutcome::Skipped;
            }
        }

        let content = match fetch_catalog(&*self.source, &self.config.site.content_path).await {
            Ok(content) => content,
            Err(e) => {
                error!("Error fetching content: {e}");
                return self.show_error(lang, ticket).await;
            }
        };

        let bundle = match self.translations.load(lang).await {
            Ok(bundle) => bundle,
            Err(e) => {
                error!("Error loading translations for {lang}: {e}");
                return self.show_error(lang, ticket).await;
            }
        };

        let badges = BadgeLabels::from_bundle(self.cached_translations().await.as_ref());
        let ctx = RenderContext {
            lang,
            bundle: &bundle,
            badges: &badges,
            description_limit: self.config.render.description_limit,
        };
        let texts = self.config.placeholders_for(lang.code());
        let (books_html, courses_html, books, courses) = self.render(&content, &ctx, &texts);

        let mut doc = self.document.lock().await;
        if !self.generation.is_current(ticket) {
            debug!("loader: discarding stale render for {lang} (ticket {ticket})");
            return RunOutcome::Stale;
        }
        doc.replace_region(&page.books_region, &books_html);
        doc.replace_region(&page.courses_region, &courses_html);
        let armed = self.reveal.arm(&mut doc);
        info!("Rendered {books} books and {courses} courses for {lang} ({armed} cards armed)");

        RunOutcome::Rendered { books, courses }
    }

    fn render(
        &self,
        content: &CatalogContent,
        ctx: &RenderContext<'_>,
        texts: &PlaceholderText,
    ) -> (String, String, usize, usize) {
        let books = content.books();
        let all_courses = content.courses();
        let courses = &all_courses[..all_courses.len().min(self.config.render.max_courses)];

        let books_html = if books.is_empty() {
            placeholder(&texts.books_empty)
        } else {
            render_all(books.iter().map(Book), ctx)
        };
        let courses_html = if courses.is_empty() {
            placeholder(&texts.courses_empty)
        } else {
            render_all(courses.iter().map(Course), ctx)
        };

        (books_html, courses_html, books.len(), courses.len())
    }

    async fn show_error(&self, lang: &Lang, ticket: u64) -> RunOutcome {
        let texts = self.config.placeholders_for(lang.code());
        let page = &self.config.page;

        let mut doc = self.document.lock().await;
        if !self.generation.is_current(ticket) {
            debug!("loader: discarding stale error for {lang} (ticket {ticket})");
            return RunOutcome::Stale;
        }
        doc.replace_region(&page.books_region, &placeholder(&texts.books_error));
        doc.replace_region(&page.courses_region, &placeholder(&texts.courses_error));
        RunOutcome::Failed
    }

    async fn cached_translations(&self) -> Option<LanguageBundle> {
        self.store
            .cached_translations()
            .await
            .unwrap_or_else(|e: BookhubError| {
                warn!("cached translations unavailable: {e}");
                None
            })
    }
}

/// Centered notice shown in place of cards.
pub fn placeholder(text: &str) -> String {
    format!(
        r#"<p style="text-align: center; color: var(--secondary);">{}</p>"#,
        html_escape(text)
    )
}

#[cfg(test)]
mod tests;
