/*!
 * # autoloc
 *
 * Auto-translation pipeline for delimiter-separated localization files.
 * Reads `key,value` catalogs, protects placeholders and markup, translates
 * sentence by sentence through DeepL or Azure with a persistent cache, and
 * writes normalized output files.
 */

// Library-wide lints configuration
#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use catalog::{Catalog, LanguageEntry};
pub use errors::{AppError, CatalogError, ProviderError};
pub use translation::{Pipeline, PipelineSettings, TranslationCache};
