//! Entrance animation for freshly inserted cards.
//!
//! Cards start hidden and shifted down; a small bootstrap script fades each
//! one in the first time it scrolls into view, then stops watching it.

use bookhub_core::config::RevealConfig;

use crate::document::HtmlDocument;

/// Marker attribute set on armed elements.
const MARKER: &str = "data-reveal";

/// Initial style of an armed element.
const HIDDEN_STYLE: &str =
    "opacity: 0; transform: translateY(20px); transition: opacity 0.5s ease, transform 0.5s ease;";

/// Arms elements for a one-shot entrance transition.
#[derive(Debug, Clone)]
pub struct RevealObserver {
    enabled: bool,
    threshold: f64,
    root_margin: String,
    classes: Vec<String>,
}

impl RevealObserver {
    pub fn from_config(config: &RevealConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
            root_margin: config.root_margin.clone(),
            classes: config.classes.clone(),
        }
    }

    /// Arm every matching element that is not armed yet and make sure the
    /// bootstrap script is on the page. Returns the number of newly armed
    /// elements.
    pub fn arm(&self, doc: &mut HtmlDocument) -> usize {
        if !self.enabled {
            return 0;
        }

        let armed = doc.rewrite_all(|tag| {
            if tag.has_attr(MARKER) || !self.classes.iter().any(|c| tag.has_class(c)) {
                return false;
            }
            let style = match tag.attr("style") {
                Some(existing) if !existing.trim().is_empty() => {
                    format!("{} {HIDDEN_STYLE}", existing.trim_end())
                }
                _ => HIDDEN_STYLE.to_string(),
            };
            tag.set_raw_attr("style", &style);
            tag.set_flag(MARKER);
            true
        });

        if armed > 0 && !doc.as_str().contains(SCRIPT_MARKER) {
            doc.append_to_body(&self.script());
        }
        armed
    }

    fn script(&self) -> String {
        format!(
            r#"<script {SCRIPT_MARKER}>
(function () {{
    var observer = new IntersectionObserver(function (entries) {{
        entries.forEach(function (entry) {{
            if (entry.isIntersecting) {{
                entry.target.style.opacity = '1';
                entry.target.style.transform = 'translateY(0)';
                observer.unobserve(entry.target);
            }}
        }});
    }}, {{ threshold: {threshold}, rootMargin: '{margin}' }});
    document.querySelectorAll('[{MARKER}]').forEach(function (el) {{
        observer.observe(el);
    }});
}})();
</script>
"#,
            threshold = self.threshold,
            margin = self.root_margin.replace(['\'', '\\', '<'], ""),
        )
    }
}

/// Attribute identifying the bootstrap script.
const SCRIPT_MARKER: &str = "data-reveal-observer";
