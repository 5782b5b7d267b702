//! Book and course cards.
//!
//! Each card is a pure function of the record and a [`RenderContext`];
//! the caller decides where the markup goes.

use bookhub_core::{
    bundle::LanguageBundle, lang::Lang, localize::resolve, record::ContentRecord,
};

use crate::markup::html_escape;

/// Default label for the bestseller badge.
pub const DEFAULT_BESTSELLER_LABEL: &str = "الأكثر مبيعًا";
/// Default label for the new-arrival badge.
pub const DEFAULT_NEW_LABEL: &str = "جديد";
/// Default label for free courses.
pub const DEFAULT_FREE_LABEL: &str = "مجاني";

/// Labels for book badges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeLabels {
    pub bestseller: String,
    pub new: String,
}

impl Default for BadgeLabels {
    fn default() -> Self {
        Self {
            bestseller: DEFAULT_BESTSELLER_LABEL.to_string(),
            new: DEFAULT_NEW_LABEL.to_string(),
        }
    }
}

impl BadgeLabels {
    /// Labels from a cached bundle, falling back to the defaults per label.
    pub fn from_bundle(bundle: Option<&LanguageBundle>) -> Self {
        let Some(bundle) = bundle else {
            return Self::default();
        };
        Self {
            bestseller: bundle
                .text_or("badge_bestseller", DEFAULT_BESTSELLER_LABEL)
                .to_string(),
            new: bundle.text_or("badge_new", DEFAULT_NEW_LABEL).to_string(),
        }
    }

    /// Label for a badge key; unknown keys get an empty label.
    pub fn label_for(&self, key: Option<&str>) -> &str {
        match key {
            Some("badge_bestseller") => &self.bestseller,
            Some("badge_new") => &self.new,
            _ => "",
        }
    }
}

/// Everything a card needs besides its record.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub lang: &'a Lang,
    pub bundle: &'a LanguageBundle,
    pub badges: &'a BadgeLabels,
    /// Course descriptions longer than this many characters are cut.
    pub description_limit: usize,
}

/// A record that renders itself as a card.
pub trait Card {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// A record from `latest_books`.
#[derive(Debug, Clone, Copy)]
pub struct Book<'a>(pub &'a ContentRecord);

/// A record from `educational_courses`.
#[derive(Debug, Clone, Copy)]
pub struct Course<'a>(pub &'a ContentRecord);

/// Cut `text` to `limit` characters and append `...` when it is longer.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

impl Card for Book<'_> {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let book = self.0;
        let title = html_escape(&resolve(book, "title", ctx.lang));
        let category = html_escape(&resolve(book, "category", ctx.lang));

        let badge_html = match &book.badge {
            Some(badge) => format!(
                r#"<div class="book-badge">{}</div>"#,
                html_escape(ctx.badges.label_for(badge.key()))
            ),
            None => String::new(),
        };

        let old_price_html = match book.old_price {
            Some(old) if old != 0.0 => {
                format!(r#"<span class="price-old">${}</span>"#, to_fixed(old, 2))
            }
            _ => String::new(),
        };

        format!(
            r#"
            <div class="book-card">
                <div class="book-cover">
                    <img src="{cover}" alt="{title}">
                    {badge_html}
                </div>
                <div class="book-info">
                    <h3 class="book-title">{title}</h3>
                    <p class="book-author">{author}</p>
                    <div class="book-meta">
                        <span>{category}</span>
                        <div class="book-rating">
                            <i class="fas fa-star"></i>
                            <span>{rating}</span>
                        </div>
                    </div>
                    <div class="book-price">
                        <div>
                            <span class="price">${price}</span>
                            {old_price_html}
                        </div>
                        <div class="book-actions">
                            <button class="action-btn" title="Add to Cart"><i class="fas fa-shopping-cart"></i></button>
                            <button class="action-btn" title="Add to Wishlist"><i class="fas fa-heart"></i></button>
                        </div>
                    </div>
                </div>
            </div>
        "#,
            cover = html_escape(&book.cover_url),
            author = html_escape(&book.author),
            rating = to_fixed(book.rating, 1),
            price = to_fixed(book.price, 2),
        )
    }
}

impl Card for Course<'_> {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let course = self.0;
        let (button_key, type_key, button_class) = if course.is_free {
            ("course_btn_start", "course_type_free", "btn-success")
        } else {
            ("course_btn_buy", "course_type_paid", "btn-outline")
        };

        let button_text = html_escape(ctx.bundle.text_or_key(button_key));
        let type_text = html_escape(ctx.bundle.text_or_key(type_key));

        let price_html = if course.is_free {
            format!(
                r#"<span class="price price-free">{}</span>"#,
                html_escape(ctx.bundle.text_or("course_free", DEFAULT_FREE_LABEL))
            )
        } else {
            format!(r#"<span class="price">${}</span>"#, to_fixed(course.price, 2))
        };

        let title = html_escape(&resolve(course, "title", ctx.lang));
        let description = resolve(course, "description", ctx.lang);
        let short_description = html_escape(&truncate(&description, ctx.description_limit));

        format!(
            r#"
            <div class="book-card course-card">
                <div class="book-cover" style="background-color: var(--primary-light);">
                    <i class="fas fa-terminal" style="font-size: 80px; color: var(--primary);"></i>
                </div>
                <div class="book-info">
                    <h3 class="book-title">{title}</h3>
                    <p class="book-author">{short_description}</p>
                    <div class="book-meta">
                        <span>{type_text}</span>
                        <div class="book-rating">
                            <i class="fas fa-star"></i>
                            <span>{rating}</span>
                        </div>
                    </div>
                    <div class="book-price">
                        <div>
                            {price_html}
                        </div>
                        <div class="book-actions">
                            <a href="{url}" target="_blank" class="btn {button_class}" style="font-size: 0.9rem; padding: 8px 15px;">
                                {button_text}
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        "#,
            rating = to_fixed(course.rating, 1),
            url = html_escape(&course.url),
        )
    }
}

/// Format `value` with `digits` decimals, rounding ties away from zero.
pub fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.prec$}", prec = digits as usize)
}

/// Render `cards` and concatenate the markup.
pub fn render_all<K: Card>(cards: impl IntoIterator<Item = K>, ctx: &RenderContext<'_>) -> String {
    cards.into_iter().map(|card| card.render(ctx)).collect()
}

#[cfg(test)]
mod tests;
