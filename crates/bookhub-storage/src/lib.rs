//! # bookhub-storage
//!
//! Durable key/value storage backing the persisted UI state (language,
//! theme) and the externally cached translation blob.

pub mod store;

pub use store::{Store, KEY_LANG, KEY_THEME, KEY_TRANSLATIONS};
