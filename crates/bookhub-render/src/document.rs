//! The page document: an HTML template edited in place.
//!
//! Every operation that targets a missing element is a silent no-op.

use bookhub_core::{bundle::LanguageBundle, lang::Lang, lang::Theme};
use tracing::debug;

use crate::markup::{self, html_escape, Element, StartTag};

/// Key whose translation becomes the document title.
const TITLE_KEY: &str = "title_main";

/// An HTML page whose regions and bindings can be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        markup::find_elements(&self.html, |t| t.attr("id") == Some(id))
            .into_iter()
            .next()
    }

    /// Current content of the element with `id`.
    pub fn region(&self, id: &str) -> Option<&str> {
        let inner = self.element_by_id(id)?.inner?;
        Some(&self.html[inner])
    }

    pub fn has_region(&self, id: &str) -> bool {
        self.region(id).is_some()
    }

    /// Replace the content of the element with `id`.
    ///
    /// Returns `false` (and changes nothing) when there is no such element.
    pub fn replace_region(&mut self, id: &str, content: &str) -> bool {
        let Some(inner) = self.element_by_id(id).and_then(|e| e.inner) else {
            debug!("document: no region #{id}");
            return false;
        };
        self.html.replace_range(inner, content);
        true
    }

    /// Apply `data-i18n` and `data-i18n-placeholder` bindings and the
    /// document title. Keys without a translation are left alone.
    ///
    /// Returns the number of bindings updated.
    pub fn apply_translations(&mut self, bundle: &LanguageBundle) -> usize {
        let mut updated = self.apply_text_bindings(bundle);

        let (html, placeholders) =
            markup::rewrite_start_tags(&self.html, 0..self.html.len(), |tag| {
                let Some(text) = tag.attr("data-i18n-placeholder").and_then(|k| bundle.get(k))
                else {
                    return false;
                };
                tag.set_attr("placeholder", text);
                true
            });
        self.html = html;
        updated += placeholders;

        if let Some(title) = bundle.get(TITLE_KEY) {
            self.set_title(title);
        }
        updated
    }

    /// Replace the content of every bound element with its translation.
    fn apply_text_bindings(&mut self, bundle: &LanguageBundle) -> usize {
        let mut targets: Vec<(std::ops::Range<usize>, &str)> =
            markup::find_elements(&self.html, |t| t.has_attr("data-i18n"))
                .into_iter()
                .filter_map(|e| {
                    let text = e.tag.attr("data-i18n").and_then(|k| bundle.get(k))?;
                    Some((e.inner?, text))
                })
                .collect();

        // A replaced element takes its bound children with it.
        let mut kept: Vec<(std::ops::Range<usize>, &str)> = Vec::with_capacity(targets.len());
        for (range, text) in targets.drain(..) {
            if kept.last().is_some_and(|(outer, _)| range.start < outer.end) {
                continue;
            }
            kept.push((range, text));
        }

        let count = kept.len();
        for (range, text) in kept.into_iter().rev() {
            self.html.replace_range(range, &html_escape(text));
        }
        count
    }

    /// Set the `<title>` text. Returns `false` when the page has none.
    pub fn set_title(&mut self, title: &str) -> bool {
        let Some(inner) = markup::find_elements(&self.html, |t| t.name == "title")
            .into_iter()
            .next()
            .and_then(|e| e.inner)
        else {
            return false;
        };
        self.html.replace_range(inner, &html_escape(title));
        true
    }

    /// Set `lang`/`dir` on `<html>` and select `lang` in the language
    /// selector with id `selector_id`.
    pub fn set_language(&mut self, lang: &Lang, selector_id: &str) {
        self.rewrite_all(|tag| {
            if tag.name != "html" {
                return false;
            }
            tag.set_attr("dir", lang.dir());
            tag.set_attr("lang", lang.code());
            true
        });

        let Some(options) = self.element_by_id(selector_id).and_then(|e| e.inner) else {
            return;
        };
        let (html, _) = markup::rewrite_start_tags(&self.html, options, |tag| {
            if tag.name != "option" {
                return false;
            }
            if tag.attr("value") == Some(lang.code()) {
                tag.set_flag("selected");
                true
            } else {
                tag.remove_attr("selected")
            }
        });
        self.html = html;
    }

    /// Apply the theme class to `<body>` and swap the icon inside the toggle
    /// control with id `toggle_id`.
    pub fn set_theme(&mut self, theme: Theme, toggle_id: &str) {
        self.rewrite_all(|tag| {
            if tag.name != "body" {
                return false;
            }
            if theme.is_dark() {
                tag.add_class(Theme::Dark.as_str())
            } else {
                tag.remove_class(Theme::Dark.as_str())
            }
        });

        let Some(inner) = self.element_by_id(toggle_id).and_then(|e| e.inner) else {
            return;
        };
        let (from, to) = if theme.is_dark() {
            ("fa-moon", "fa-sun")
        } else {
            ("fa-sun", "fa-moon")
        };
        let mut first_icon = true;
        let (html, _) = markup::rewrite_start_tags(&self.html, inner, |tag| {
            if tag.name != "i" || !first_icon {
                return false;
            }
            first_icon = false;
            tag.replace_class(from, to)
        });
        self.html = html;
    }

    /// Rewrite start tags across the whole document.
    pub(crate) fn rewrite_all(&mut self, edit: impl FnMut(&mut StartTag) -> bool) -> usize {
        let (html, changed) = markup::rewrite_start_tags(&self.html, 0..self.html.len(), edit);
        self.html = html;
        changed
    }

    /// Insert `snippet` right before `</body>`, or append it when the page
    /// has no body end tag.
    pub(crate) fn append_to_body(&mut self, snippet: &str) {
        match self.html.rfind("</body>") {
            Some(pos) => self.html.insert_str(pos, snippet),
            None => self.html.push_str(snippet),
        }
    }
}
