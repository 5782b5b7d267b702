//! Minimal HTML tag handling: escaping, start-tag parsing, and element
//! spans found by tag-depth counting.
//!
//! This is not a general HTML parser. It understands well-formed templates:
//! quoted attributes, explicit closing tags for containers, and the usual
//! void elements. Comments and the bodies of `script` and `style` elements
//! are opaque: tags inside them are never matched.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// A start tag such as `<div class="x" id="y">`.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)"#,
        r#"((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)"#,
        r#"\s*(/?)>"#,
    ))
    .expect("start tag regex should compile")
});

/// One attribute inside a start tag.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute regex should compile")
});

/// Any start or end tag, used for depth counting. A `>` inside a quoted
/// attribute value does not end the tag.
static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#)
        .expect("tag token regex should compile")
});

/// Comments, and `script`/`style` elements with their body in group 1.
static OPAQUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<!--.*?-->|<(?:script|style)\b[^>]*>(.*?)</(?:script|style)\s*>"#)
        .expect("opaque regex should compile")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Escape text for use in element content or a double-quoted attribute.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A parsed start tag. Attribute values are kept as written (already
/// escaped, with `"` normalized to `&quot;` so they can be re-emitted in
/// double quotes); [`StartTag::set_attr`] escapes new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartTag {
    pub name: String,
    attrs: Vec<(String, Option<String>)>,
    self_closing: bool,
}

impl StartTag {
    pub fn parse(text: &str) -> Option<Self> {
        let caps = START_TAG.captures(text)?;
        if caps.get(0)?.range() != (0..text.len()) {
            return None;
        }
        let attrs = ATTRIBUTE
            .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
            .map(|a| {
                let value = a
                    .get(2)
                    .or_else(|| a.get(3))
                    .or_else(|| a.get(4))
                    .map(|m| m.as_str().replace('"', "&quot;"));
                (a[1].to_string(), value)
            })
            .collect();
        Some(Self {
            name: caps[1].to_ascii_lowercase(),
            attrs,
            self_closing: !caps[3].is_empty(),
        })
    }

    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute to an unescaped value, keeping its position.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.set_raw_attr(name, &html_escape(value));
    }

    /// Set an attribute to a value that is already escaped, such as one
    /// read back through [`StartTag::attr`].
    pub fn set_raw_attr(&mut self, name: &str, value: &str) {
        let value = Some(value.to_string());
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Set a boolean attribute such as `selected`.
    pub fn set_flag(&mut self, name: &str) {
        if !self.has_attr(name) {
            self.attrs.push((name.to_string(), None));
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attrs.len()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let class = html_escape(class);
        let list = match self.attr("class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class,
        };
        self.set_raw_attr("class", &list);
        true
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let list: Vec<&str> = self
            .attr("class")
            .unwrap_or("")
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        let list = list.join(" ");
        self.set_raw_attr("class", &list);
        true
    }

    /// Swap `from` for `to` in place; no-op when `from` is absent.
    pub fn replace_class(&mut self, from: &str, to: &str) -> bool {
        if !self.has_class(from) {
            return false;
        }
        let to = html_escape(to);
        let list: Vec<&str> = self
            .attr("class")
            .unwrap_or("")
            .split_whitespace()
            .map(|c| if c == from { to.as_str() } else { c })
            .collect();
        let list = list.join(" ");
        self.set_raw_attr("class", &list);
        true
    }

    pub fn render(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (k, v) in &self.attrs {
            match v {
                Some(v) => out.push_str(&format!(" {k}=\"{v}\"")),
                None => out.push_str(&format!(" {k}")),
            }
        }
        if self.self_closing {
            out.push_str(" />");
        } else {
            out.push('>');
        }
        out
    }
}

/// An element located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub tag: StartTag,
    /// Byte range of the start tag.
    pub open: Range<usize>,
    /// Byte range of the content between start and end tag. `None` for
    /// void elements and unclosed ones.
    pub inner: Option<Range<usize>>,
}

/// Byte ranges of `html` where tags are not markup: whole comments and the
/// bodies of `script` and `style` elements.
fn opaque_ranges(html: &str) -> Vec<Range<usize>> {
    OPAQUE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)).map(|m| m.range()))
        .collect()
}

fn is_opaque(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}

/// All start tags in `html[range]`, in document order.
pub(crate) fn start_tags(html: &str, range: Range<usize>) -> Vec<(Range<usize>, StartTag)> {
    let opaque = opaque_ranges(html);
    let offset = range.start;
    START_TAG
        .find_iter(&html[range])
        .filter(|m| !is_opaque(&opaque, m.start() + offset))
        .filter_map(|m| {
            let tag = StartTag::parse(m.as_str())?;
            Some((m.start() + offset..m.end() + offset, tag))
        })
        .collect()
}

/// Elements whose start tag satisfies `pred`, in document order.
pub(crate) fn find_elements(html: &str, pred: impl Fn(&StartTag) -> bool) -> Vec<Element> {
    start_tags(html, 0..html.len())
        .into_iter()
        .filter(|(_, tag)| pred(tag))
        .map(|(open, tag)| {
            let inner = if tag.is_void() {
                None
            } else {
                closing_tag_start(html, open.end, &tag.name).map(|end| open.end..end)
            };
            Element { tag, open, inner }
        })
        .collect()
}

/// Byte offset of the end tag matching an element named `name` whose
/// content starts at `from`.
fn closing_tag_start(html: &str, from: usize, name: &str) -> Option<usize> {
    let opaque = opaque_ranges(html);
    let mut depth = 0usize;
    for caps in TAG_TOKEN.captures_iter(&html[from..]) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        let start = token.start() + from;
        if is_opaque(&opaque, start) || !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let is_end = !caps[1].is_empty();
        let self_closing = token.as_str().ends_with("/>");
        if is_end {
            if depth == 0 {
                return Some(start);
            }
            depth -= 1;
        } else if !self_closing {
            depth += 1;
        }
    }
    None
}

/// Rebuild `html`, letting `edit` rewrite start tags inside `range`.
///
/// Tags for which `edit` returns `false` are copied through untouched.
/// Returns the new text and the number of rewritten tags.
pub(crate) fn rewrite_start_tags(
    html: &str,
    range: Range<usize>,
    mut edit: impl FnMut(&mut StartTag) -> bool,
) -> (String, usize) {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut changed = 0;
    for (span, mut tag) in start_tags(html, range) {
        if edit(&mut tag) {
            out.push_str(&html[cursor..span.start]);
            out.push_str(&tag.render());
            cursor = span.end;
            changed += 1;
        }
    }
    out.push_str(&html[cursor..]);
    (out, changed)
}
