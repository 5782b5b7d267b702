use super::*;
use async_trait::async_trait;
use bookhub_core::traits::Response;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use tokio::sync::Notify;

const PAGE: &str = r#"<html lang="ar" dir="rtl"><body><div id="latest-books-container"><div class="loading"></div></div><div id="courses-container"></div></body></html>"#;

/// Serves resources from a fixed table and records every request.
struct MapSource {
    resources: HashMap<String, (u16, String)>,
    requests: std::sync::Mutex<Vec<String>>,
}

impl MapSource {
    fn new() -> Self {
        Self {
            resources: HashMap::new(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.resources.insert(path.to_string(), (status, body.into()));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceSource for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    async fn fetch(&self, path: &str) -> Result<Response, BookhubError> {
        self.requests.lock().unwrap().push(path.to_string());
        match self.resources.get(path) {
            Some((status, body)) => Ok(Response {
                path: path.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Err(BookhubError::Fetch(format!("connection refused: {path}"))),
        }
    }
}

/// Holds the first content request until released.
struct GatedSource {
    inner: MapSource,
    entered: Arc<Notify>,
    release: Arc<Notify>,
    gated: AtomicBool,
}

#[async_trait]
impl ResourceSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch(&self, path: &str) -> Result<Response, BookhubError> {
        if path.starts_with("data/") && !self.gated.swap(true, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch(path).await
    }
}

fn catalog(books: usize, courses: usize) -> String {
    let books: Vec<_> = (0..books)
        .map(|i| json!({"title": format!("Book {i}"), "title_fr": format!("Livre {i}"), "price": 10}))
        .collect();
    let courses: Vec<_> = (0..courses)
        .map(|i| json!({"title": format!("Course {i}"), "isFree": i % 2 == 0, "price": 5}))
        .collect();
    json!({"latest_books": books, "educational_courses": courses}).to_string()
}

fn site(content: String) -> MapSource {
    MapSource::new()
        .with("data/all_content.json", 200, content)
        .with("languages/ar.json", 200, r#"{"course_free": "مجاني"}"#)
        .with("languages/en.json", 200, r#"{"course_free": "Free"}"#)
        .with("languages/fr.json", 200, r#"{"course_free": "Gratuit"}"#)
}

async fn loader_with(
    source: Arc<dyn ResourceSource>,
    page: &str,
) -> (ContentLoader, Arc<Mutex<HtmlDocument>>, Arc<RequestGeneration>) {
    let config = Arc::new(Config::default());
    let translations = TranslationLoader::from_config(source.clone(), &config.site).unwrap();
    let store = Store::in_memory().await.unwrap();
    let document = Arc::new(Mutex::new(HtmlDocument::new(page)));
    let generation = Arc::new(RequestGeneration::new());
    let loader = ContentLoader::new(
        source,
        translations,
        store,
        document.clone(),
        generation.clone(),
        config,
    );
    (loader, document, generation)
}

fn lang(code: &str) -> Lang {
    Lang::new(code).unwrap()
}

// ---------------------------------------------------------------------------
// RequestGeneration
// ---------------------------------------------------------------------------

#[test]
fn test_generation_tickets() {
    let generation = RequestGeneration::new();
    let first = generation.begin();
    assert!(generation.is_current(first));
    let second = generation.begin();
    assert!(second > first);
    assert!(!generation.is_current(first));
    assert!(generation.is_current(second));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_renders_books_and_first_eight_courses() {
    let (loader, doc, generation) = loader_with(Arc::new(site(catalog(3, 10))), PAGE).await;
    let ticket = generation.begin();

    let outcome = loader.run(&lang("fr"), ticket).await;
    assert_eq!(outcome, RunOutcome::Rendered { books: 3, courses: 8 });

    let doc = doc.lock().await;
    let books = doc.region("latest-books-container").unwrap();
    assert_eq!(books.matches(r#"class="book-card""#).count(), 3);
    assert!(books.contains("Livre 0"));
    assert!(!books.contains("loading"));

    let courses = doc.region("courses-container").unwrap();
    assert!(courses.contains("Course 7"));
    assert!(!courses.contains("Course 8"));
    assert!(courses.contains("Gratuit"));
    assert!(doc.as_str().contains("data-reveal-observer"));
}

#[tokio::test]
async fn test_empty_lists_show_placeholders() {
    let (loader, doc, generation) = loader_with(Arc::new(site(catalog(0, 0))), PAGE).await;
    let outcome = loader.run(&lang("en"), generation.begin()).await;
    assert_eq!(outcome, RunOutcome::Rendered { books: 0, courses: 0 });

    let doc = doc.lock().await;
    assert_eq!(
        doc.region("latest-books-container"),
        Some(placeholder("No books to show right now.").as_str())
    );
    assert_eq!(
        doc.region("courses-container"),
        Some(placeholder("No courses to show right now.").as_str())
    );
}

#[tokio::test]
async fn test_missing_lists_default_to_empty() {
    let (loader, doc, generation) = loader_with(Arc::new(site("{}".to_string())), PAGE).await;
    let outcome = loader.run(&lang("ar"), generation.begin()).await;
    assert_eq!(outcome, RunOutcome::Rendered { books: 0, courses: 0 });
    assert!(doc
        .lock()
        .await
        .as_str()
        .contains("لا توجد كتب لعرضها حالياً."));
}

#[tokio::test]
async fn test_null_record_fields_still_render() {
    let content = json!({
        "latest_books": [
            {"title": "A", "author": null, "cover_url": null, "badge": ""},
            {"title": "B", "price": null, "rating": null}
        ],
        "educational_courses": [{"title": "C", "isFree": null, "price": 3, "url": null}]
    });
    let (loader, doc, generation) = loader_with(Arc::new(site(content.to_string())), PAGE).await;

    let outcome = loader.run(&lang("en"), generation.begin()).await;
    assert_eq!(outcome, RunOutcome::Rendered { books: 2, courses: 1 });

    let doc = doc.lock().await;
    let books = doc.region("latest-books-container").unwrap();
    assert!(books.contains(r#"<p class="book-author"></p>"#));
    assert!(!books.contains("book-badge"));
    let courses = doc.region("courses-container").unwrap();
    assert!(courses.contains(r#"<span class="price">$3.00</span>"#));
}

#[tokio::test]
async fn test_content_failure_shows_error_placeholders() {
    let source = Arc::new(site(String::new()).with("data/all_content.json", 500, "oops"));
    let (loader, doc, generation) = loader_with(source, PAGE).await;

    let outcome = loader.run(&lang("en"), generation.begin()).await;
    assert_eq!(outcome, RunOutcome::Failed);

    let doc = doc.lock().await;
    assert_eq!(
        doc.region("latest-books-container"),
        Some(placeholder("Could not load the book list right now.").as_str())
    );
    assert_eq!(
        doc.region("courses-container"),
        Some(placeholder("Could not load the course list right now.").as_str())
    );
}

#[tokio::test]
async fn test_malformed_content_shows_error_placeholders() {
    let (loader, _, generation) =
        loader_with(Arc::new(site("{not json".to_string())), PAGE).await;
    assert_eq!(
        loader.run(&lang("en"), generation.begin()).await,
        RunOutcome::Failed
    );
}

#[tokio::test]
async fn test_translation_failure_shows_error_placeholders() {
    let source = Arc::new(
        MapSource::new()
            .with("data/all_content.json", 200, catalog(1, 1))
            .with("languages/en.json", 404, ""),
    );
    let (loader, doc, generation) = loader_with(source.clone(), PAGE).await;

    assert_eq!(
        loader.run(&lang("en"), generation.begin()).await,
        RunOutcome::Failed
    );
    assert_eq!(
        source.requests(),
        vec!["data/all_content.json", "languages/en.json", "languages/ar.json"]
    );
    assert!(doc
        .lock()
        .await
        .as_str()
        .contains("Could not load the book list right now."));
}

#[tokio::test]
async fn test_missing_region_skips_without_fetching() {
    let source = Arc::new(site(catalog(1, 1)));
    let page = r#"<body><div id="latest-books-container"></div></body>"#;
    let (loader, doc, generation) = loader_with(source.clone(), page).await;

    assert_eq!(
        loader.run(&lang("en"), generation.begin()).await,
        RunOutcome::Skipped
    );
    assert!(source.requests().is_empty());
    assert_eq!(doc.lock().await.as_str(), page);
}

#[tokio::test]
async fn test_rerender_replaces_previous_cards() {
    let (loader, doc, generation) = loader_with(Arc::new(site(catalog(2, 0))), PAGE).await;
    loader.run(&lang("en"), generation.begin()).await;
    loader.run(&lang("fr"), generation.begin()).await;

    let doc = doc.lock().await;
    let books = doc.region("latest-books-container").unwrap();
    assert_eq!(books.matches(r#"class="book-card""#).count(), 2);
    assert!(books.contains("Livre 1"));
    assert!(!books.contains("Book 1"));
    assert_eq!(doc.as_str().matches("data-reveal-observer").count(), 1);
}

// ---------------------------------------------------------------------------
// Staleness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_stale_ticket_leaves_document_alone() {
    let (loader, doc, generation) = loader_with(Arc::new(site(catalog(1, 1))), PAGE).await;
    let old = generation.begin();
    let _new = generation.begin();

    assert_eq!(loader.run(&lang("fr"), old).await, RunOutcome::Stale);
    assert_eq!(doc.lock().await.as_str(), PAGE);
}

#[tokio::test]
async fn test_older_switch_never_overwrites_newer() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let source = Arc::new(GatedSource {
        inner: site(catalog(1, 0)),
        entered: entered.clone(),
        release: release.clone(),
        gated: AtomicBool::new(false),
    });
    let (loader, doc, generation) = loader_with(source, PAGE).await;

    let slow = {
        let loader = loader.clone();
        let ticket = generation.begin();
        tokio::spawn(async move { loader.run(&Lang::new("fr").unwrap(), ticket).await })
    };
    entered.notified().await;

    let fast = loader.run(&lang("en"), generation.begin()).await;
    assert_eq!(fast, RunOutcome::Rendered { books: 1, courses: 0 });

    release.notify_one();
    assert_eq!(slow.await.unwrap(), RunOutcome::Stale);

    let doc = doc.lock().await;
    let books = doc.region("latest-books-container").unwrap();
    assert!(books.contains("Book 0"));
    assert!(!books.contains("Livre 0"));
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_badge_labels_come_from_cached_translations() {
    let content = json!({"latest_books": [{"title": "A", "badge": {"key": "badge_new"}}]});
    let source: Arc<dyn ResourceSource> = Arc::new(site(content.to_string()));
    let config = Arc::new(Config::default());
    let store = Store::in_memory().await.unwrap();
    store
        .set(bookhub_storage::KEY_TRANSLATIONS, r#"{"badge_new": "Fresh"}"#)
        .await
        .unwrap();
    let document = Arc::new(Mutex::new(HtmlDocument::new(PAGE)));
    let generation = Arc::new(RequestGeneration::new());
    let loader = ContentLoader::new(
        source.clone(),
        TranslationLoader::from_config(source, &config.site).unwrap(),
        store,
        document.clone(),
        generation.clone(),
        config,
    );

    loader.run(&lang("en"), generation.begin()).await;
    assert!(document
        .lock()
        .await
        .as_str()
        .contains(r#"<div class="book-badge">Fresh</div>"#));
}

#[test]
fn test_placeholder_is_escaped() {
    assert_eq!(
        placeholder("a < b"),
        r#"<p style="text-align: center; color: var(--secondary);">a &lt; b</p>"#
    );
}
