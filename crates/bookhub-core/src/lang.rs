//! Language codes, themes, and the persisted UI state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BookhubError;

/// Longest accepted language code.
const MAX_CODE_LEN: usize = 16;

/// A validated language code such as `ar`, `fr`, or `en`.
///
/// The code ends up in a resource path (`languages/<code>.json`), so only
/// ASCII alphanumerics, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lang(String);

impl Lang {
    /// Parse and validate a language code.
    pub fn new(code: &str) -> Result<Self, BookhubError> {
        let code = code.trim();
        let valid = !code.is_empty()
            && code.len() <= MAX_CODE_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BookhubError::InvalidLanguage(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Field suffix used to pick a localized record variant.
    ///
    /// Only Arabic and French have dedicated variants; every other
    /// language reads the English one.
    pub fn field_suffix(&self) -> &'static str {
        match self.0.as_str() {
            "ar" => "_ar",
            "fr" => "_fr",
            _ => "_en",
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.0 == "ar"
    }

    /// Value for the document's `dir` attribute.
    pub fn dir(&self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Lang {
    type Err = BookhubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Lang {
    type Error = BookhubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Lang> for String {
    fn from(lang: Lang) -> Self {
        lang.0
    }
}

/// Page color theme.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Storage value, also used as the body class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light-mode",
            Self::Dark => "dark-mode",
        }
    }

    /// Read a stored value. Anything but `dark-mode` is the light theme.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark-mode" {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language and theme persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub lang: Lang,
    pub theme: Theme,
}
