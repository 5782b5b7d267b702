//! # bookhub-core
//!
//! Core types, traits, configuration, and error handling for the BookHub
//! catalog renderer.

pub mod bundle;
pub mod config;
pub mod error;
pub mod lang;
pub mod localize;
pub mod record;
pub mod traits;

pub use config::shellexpand;
