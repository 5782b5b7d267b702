use super::*;
use serde_json::{json, Value};

fn record(value: Value) -> ContentRecord {
    serde_json::from_value(value).unwrap()
}

struct Fixture {
    lang: Lang,
    bundle: LanguageBundle,
    badges: BadgeLabels,
}

impl Fixture {
    fn new(code: &str) -> Self {
        Self {
            lang: Lang::new(code).unwrap(),
            bundle: LanguageBundle::default(),
            badges: BadgeLabels::default(),
        }
    }

    fn with_bundle(mut self, entries: &[(&str, &str)]) -> Self {
        self.bundle = entries.iter().copied().collect();
        self
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext {
            lang: &self.lang,
            bundle: &self.bundle,
            badges: &self.badges,
            description_limit: 80,
        }
    }
}

// ---------------------------------------------------------------------------
// truncate
// ---------------------------------------------------------------------------

#[test]
fn test_truncate_keeps_short_text() {
    let text = "a".repeat(80);
    assert_eq!(truncate(&text, 80), text);
    assert_eq!(truncate("", 80), "");
}

#[test]
fn test_truncate_cuts_long_text() {
    let text = "b".repeat(81);
    assert_eq!(truncate(&text, 80), format!("{}...", "b".repeat(80)));
}

#[test]
fn test_truncate_counts_characters_not_bytes() {
    let text = "ك".repeat(100);
    let cut = truncate(&text, 80);
    assert_eq!(cut.chars().count(), 83);
    assert!(cut.starts_with(&"ك".repeat(80)));
}

#[test]
fn test_truncate_ignores_word_boundaries() {
    let text = format!("{} tail", "word ".repeat(16));
    let cut = truncate(&text, 80);
    assert_eq!(cut, format!("{}...", &text[..80]));
}

// ---------------------------------------------------------------------------
// to_fixed
// ---------------------------------------------------------------------------

#[test]
fn test_to_fixed_rounds_ties_away_from_zero() {
    assert_eq!(to_fixed(4.25, 1), "4.3");
    assert_eq!(to_fixed(0.125, 2), "0.13");
    assert_eq!(to_fixed(2.5, 0), "3");
    assert_eq!(to_fixed(12.5, 2), "12.50");
    assert_eq!(to_fixed(0.0, 1), "0.0");
}

#[test]
fn test_prices_round_half_up() {
    let fx = Fixture::new("en");
    let html = Book(&record(json!({"price": 0.125, "old_price": 1.125}))).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price">$0.13</span>"#));
    assert!(html.contains(r#"<span class="price-old">$1.13</span>"#));

    let html = Course(&record(json!({"price": 0.125, "rating": 3.45}))).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price">$0.13</span>"#));
}

// ---------------------------------------------------------------------------
// Book cards
// ---------------------------------------------------------------------------

#[test]
fn test_book_card_uses_localized_fields() {
    let fx = Fixture::new("fr");
    let book = record(json!({
        "title": "Base title",
        "title_fr": "Titre",
        "category": "Programming",
        "author": "Jane",
        "cover_url": "img/a.jpg",
        "price": 12.5,
        "rating": 4.25
    }));
    let html = Book(&book).render(&fx.ctx());
    assert!(html.contains(r#"<h3 class="book-title">Titre</h3>"#));
    assert!(html.contains(r#"<img src="img/a.jpg" alt="Titre">"#));
    assert!(html.contains("<span>Programming</span>"));
    assert!(html.contains(r#"<p class="book-author">Jane</p>"#));
    assert!(html.contains(r#"<span class="price">$12.50</span>"#));
    assert!(html.contains("<span>4.3</span>"));
    assert!(!html.contains("book-badge"));
    assert!(!html.contains("price-old"));
}

#[test]
fn test_book_card_missing_title_shows_placeholder() {
    let fx = Fixture::new("ar");
    let html = Book(&record(json!({"price": 1.0}))).render(&fx.ctx());
    assert!(html.contains(r#"<h3 class="book-title">N/A</h3>"#));
}

#[test]
fn test_book_card_old_price() {
    let fx = Fixture::new("en");
    let html = Book(&record(json!({"price": 10, "old_price": 15}))).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price-old">$15.00</span>"#));

    let html = Book(&record(json!({"price": 10, "old_price": 0}))).render(&fx.ctx());
    assert!(!html.contains("price-old"));
}

#[test]
fn test_book_badges() {
    let fx = Fixture::new("en");
    let bestseller = record(json!({"badge": {"key": "badge_bestseller"}}));
    let new = record(json!({"badge": {"key": "badge_new"}}));
    let unknown = record(json!({"badge": {"key": "badge_sale"}}));

    assert!(Book(&bestseller)
        .render(&fx.ctx())
        .contains(r#"<div class="book-badge">الأكثر مبيعًا</div>"#));
    assert!(Book(&new)
        .render(&fx.ctx())
        .contains(r#"<div class="book-badge">جديد</div>"#));
    assert!(Book(&unknown)
        .render(&fx.ctx())
        .contains(r#"<div class="book-badge"></div>"#));
}

#[test]
fn test_badge_labels_from_cached_bundle() {
    let cached: LanguageBundle = [("badge_new", "New!")].into_iter().collect();
    let labels = BadgeLabels::from_bundle(Some(&cached));
    assert_eq!(labels.new, "New!");
    assert_eq!(labels.bestseller, DEFAULT_BESTSELLER_LABEL);
    assert_eq!(BadgeLabels::from_bundle(None), BadgeLabels::default());
}

#[test]
fn test_book_card_escapes_record_text() {
    let fx = Fixture::new("en");
    let html = Book(&record(json!({"title": "<script>x</script>", "author": "A & B"})))
        .render(&fx.ctx());
    assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(html.contains("A &amp; B"));
    assert!(!html.contains("<script>"));
}

// ---------------------------------------------------------------------------
// Course cards
// ---------------------------------------------------------------------------

#[test]
fn test_free_course_shows_free_label() {
    let fx = Fixture::new("en").with_bundle(&[
        ("course_free", "Free"),
        ("course_btn_start", "Start now"),
        ("course_type_free", "Free course"),
    ]);
    let course = record(json!({"title": "Rust", "isFree": true, "price": 99, "url": "https://c"}));
    let html = Course(&course).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price price-free">Free</span>"#));
    assert!(!html.contains("$99.00"));
    assert!(html.contains("Start now"));
    assert!(html.contains("<span>Free course</span>"));
    assert!(html.contains(r#"class="btn btn-success""#));
    assert!(html.contains(r#"<a href="https://c" target="_blank""#));
}

#[test]
fn test_free_label_defaults_without_translation() {
    let fx = Fixture::new("ar");
    let html = Course(&record(json!({"isFree": true}))).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price price-free">مجاني</span>"#));
}

#[test]
fn test_paid_course_shows_price() {
    let fx = Fixture::new("en");
    let html = Course(&record(json!({"isFree": false, "price": 12.5}))).render(&fx.ctx());
    assert!(html.contains(r#"<span class="price">$12.50</span>"#));
    assert!(html.contains(r#"class="btn btn-outline""#));
}

#[test]
fn test_course_labels_default_to_raw_keys() {
    let fx = Fixture::new("en");
    let html = Course(&record(json!({"isFree": false}))).render(&fx.ctx());
    assert!(html.contains("course_btn_buy"));
    assert!(html.contains("<span>course_type_paid</span>"));
}

#[test]
fn test_course_description_truncated() {
    let fx = Fixture::new("en");
    let long = "x".repeat(120);
    let html = Course(&record(json!({"description_en": long}))).render(&fx.ctx());
    assert!(html.contains(&format!(
        r#"<p class="book-author">{}...</p>"#,
        "x".repeat(80)
    )));

    let short = "Learn the basics.";
    let html = Course(&record(json!({"description": short}))).render(&fx.ctx());
    assert!(html.contains(r#"<p class="book-author">Learn the basics.</p>"#));
}

#[test]
fn test_render_all_concatenates() {
    let fx = Fixture::new("en");
    let books = vec![record(json!({"title": "A"})), record(json!({"title": "B"}))];
    let html = render_all(books.iter().map(Book), &fx.ctx());
    assert_eq!(html.matches(r#"<div class="book-card">"#).count(), 2);
    assert!(html.find(">A<").unwrap() < html.find(">B<").unwrap());
}
