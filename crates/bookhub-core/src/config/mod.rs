
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::BookhubError;

/// Top-level BookHub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bookhub: BookhubConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Placeholder texts keyed by language code.
    #[serde(
        default = "default_placeholders",
        deserialize_with = "merge_placeholders"
    )]
    pub placeholders: HashMap<String, PlaceholderText>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bookhub: BookhubConfig::default(),
            site: SiteConfig::default(),
            page: PageConfig::default(),
            render: RenderConfig::default(),
            reveal: RevealConfig::default(),
            storage: StorageConfig::default(),
            placeholders: default_placeholders(),
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookhubConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write logs to `<data_dir>/logs/bookhub.log`.
    #[serde(default)]
    pub log_file: bool,
}

impl Default for BookhubConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_file: false,
        }
    }
}

/// Where the static resources live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// `http(s)://` base URL or a local directory.
    #[serde(default = "default_site_base")]
    pub base: String,
    #[serde(default = "default_lang")]
    pub default_lang: String,
    #[serde(default = "default_content_path")]
    pub content_path: String,
    #[serde(default = "default_languages_dir")]
    pub languages_dir: String,
    /// Request timeout for HTTP sources. Unset = no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SiteConfig {
    pub fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base: default_site_base(),
            default_lang: default_lang(),
            content_path: default_content_path(),
            languages_dir: default_languages_dir(),
            timeout_secs: None,
        }
    }
}

/// Page template and the element ids the renderer writes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_books_region")]
    pub books_region: String,
    #[serde(default = "default_courses_region")]
    pub courses_region: String,
    #[serde(default = "default_language_selector")]
    pub language_selector: String,
    #[serde(default = "default_theme_toggle")]
    pub theme_toggle: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            output: default_output(),
            books_region: default_books_region(),
            courses_region: default_courses_region(),
            language_selector: default_language_selector(),
            theme_toggle: default_theme_toggle(),
        }
    }
}

/// Card rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_max_courses")]
    pub max_courses: usize,
    /// Course descriptions longer than this many characters are cut.
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_courses: default_max_courses(),
            description_limit: default_description_limit(),
        }
    }
}

/// Entrance animation for freshly rendered cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    #[serde(default = "default_reveal_root_margin")]
    pub root_margin: String,
    /// Class names whose elements get animated.
    #[serde(default = "default_reveal_classes")]
    pub classes: Vec<String>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_reveal_threshold(),
            root_margin: default_reveal_root_margin(),
            classes: default_reveal_classes(),
        }
    }
}

/// Durable key/value storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// User-facing texts shown instead of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderText {
    pub books_empty: String,
    pub courses_empty: String,
    pub books_error: String,
    pub courses_error: String,
}

impl PlaceholderText {
    fn arabic() -> Self {
        Self {
            books_empty: "لا توجد كتب لعرضها حالياً.".to_string(),
            courses_empty: "لا توجد دورات لعرضها حالياً.".to_string(),
            books_error: "تعذر تحميل قائمة الكتب حالياً.".to_string(),
            courses_error: "تعذر تحميل قائمة الدورات حالياً.".to_string(),
        }
    }
}

impl Config {
    /// Placeholder texts for `lang`.
    ///
    /// Falls back to the default language's texts, then to the built-in
    /// Arabic ones.
    pub fn placeholders_for(&self, lang: &str) -> PlaceholderText {
        self.placeholders
            .get(lang)
            .or_else(|| self.placeholders.get(&self.site.default_lang))
            .cloned()
            .unwrap_or_else(PlaceholderText::arabic)
    }
}

fn default_data_dir() -> String {
    "~/.bookhub".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_site_base() -> String {
    "./site".to_string()
}
fn default_lang() -> String {
    "ar".to_string()
}
fn default_content_path() -> String {
    "data/all_content.json".to_string()
}
fn default_languages_dir() -> String {
    "languages".to_string()
}
fn default_template() -> String {
    "./site/index.html".to_string()
}
fn default_output() -> String {
    "./public/index.html".to_string()
}
fn default_books_region() -> String {
    "latest-books-container".to_string()
}
fn default_courses_region() -> String {
    "courses-container".to_string()
}
fn default_language_selector() -> String {
    "language-selector".to_string()
}
fn default_theme_toggle() -> String {
    "theme-toggle".to_string()
}
fn default_max_courses() -> usize {
    8
}
fn default_description_limit() -> usize {
    80
}
fn default_true() -> bool {
    true
}
fn default_reveal_threshold() -> f64 {
    0.1
}
fn default_reveal_root_margin() -> String {
    "0px 0px -50px 0px".to_string()
}
fn default_reveal_classes() -> Vec<String> {
    ["feature-card", "book-card", "category-card", "testimonial-card"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_db_path() -> String {
    "~/.bookhub/data/storage.db".to_string()
}
fn default_placeholders() -> HashMap<String, PlaceholderText> {
    let mut map = HashMap::new();
    map.insert("ar".to_string(), PlaceholderText::arabic());
    map.insert(
        "en".to_string(),
        PlaceholderText {
            books_empty: "No books to show right now.".to_string(),
            courses_empty: "No courses to show right now.".to_string(),
            books_error: "Could not load the book list right now.".to_string(),
            courses_error: "Could not load the course list right now.".to_string(),
        },
    );
    map.insert(
        "fr".to_string(),
        PlaceholderText {
            books_empty: "Aucun livre \u{00e0} afficher pour le moment.".to_string(),
            courses_empty: "Aucun cours \u{00e0} afficher pour le moment.".to_string(),
            books_error: "Impossible de charger la liste des livres pour le moment.".to_string(),
            courses_error: "Impossible de charger la liste des cours pour le moment."
                .to_string(),
        },
    );
    map
}

/// Configured placeholder tables override the built-in ones per language.
fn merge_placeholders<'de, D>(deserializer: D) -> Result<HashMap<String, PlaceholderText>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = default_placeholders();
    merged.extend(HashMap::<String, PlaceholderText>::deserialize(deserializer)?);
    Ok(merged)
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, BookhubError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| BookhubError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, BookhubError> {
    toml::from_str(content).map_err(|e| BookhubError::Config(format!("failed to parse config: {e}")))
}
