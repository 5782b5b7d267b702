//! # bookhub-render
//!
//! Card rendering, page document editing, and the entrance animation for
//! freshly rendered cards.

pub mod cards;
pub mod document;
mod markup;
pub mod reveal;

pub use cards::{render_all, BadgeLabels, Book, Card, Course, RenderContext};
pub use document::HtmlDocument;
pub use markup::html_escape;
pub use reveal::RevealObserver;
