//! Catalog content records.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Badge attached to a book, e.g. `{"key": "badge_bestseller"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Badge {
    Keyed { key: String },
    Other(Value),
}

impl Badge {
    /// Translation key of the badge, when it has one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Keyed { key } => Some(key),
            Self::Other(_) => None,
        }
    }
}

impl From<Value> for Badge {
    fn from(value: Value) -> Self {
        match value.get("key").and_then(Value::as_str) {
            Some(key) => Self::Keyed {
                key: key.to_string(),
            },
            None => Self::Other(value),
        }
    }
}

/// A book or course entry.
///
/// Localizable text fields (`title`, `title_ar`, `category_fr`, ...) are
/// kept untyped in `fields` and read through [`crate::localize::resolve`].
/// `null` in a typed field reads as its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub old_price: Option<f64>,
    #[serde(default, deserialize_with = "truthy_badge")]
    pub badge: Option<Badge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, rename = "isFree", deserialize_with = "null_as_default")]
    pub is_free: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, `false`, `0` and `""` mean no badge.
fn truthy_badge<'de, D>(deserializer: D) -> Result<Option<Badge>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(is_truthy).map(Badge::from))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl ContentRecord {
    /// Raw value of a localizable field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// The combined content resource (`data/all_content.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogContent {
    #[serde(default)]
    latest_books: Option<Vec<ContentRecord>>,
    #[serde(default)]
    educational_courses: Option<Vec<ContentRecord>>,
}

impl CatalogContent {
    pub fn new(books: Vec<ContentRecord>, courses: Vec<ContentRecord>) -> Self {
        Self {
            latest_books: Some(books),
            educational_courses: Some(courses),
        }
    }

    /// Books, empty when the resource has none.
    pub fn books(&self) -> &[ContentRecord] {
        self.latest_books.as_deref().unwrap_or_default()
    }

    /// Courses, empty when the resource has none.
    pub fn courses(&self) -> &[ContentRecord] {
        self.educational_courses.as_deref().unwrap_or_default()
    }
}
