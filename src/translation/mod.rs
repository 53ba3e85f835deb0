/*!
 * Text transformation layers of the translation pipeline.
 *
 * This module contains everything between a raw catalog value and its
 * translated form. It is split into several submodules:
 *
 * - `protect`: placeholder/tag protection and positional remapping
 * - `segment`: sentence segmentation and reassembly
 * - `cache`: persistent translation cache
 * - `retry`: bounded backoff schedule and the delay seam
 * - `formatting`: output normalizers (pipes, quotes, escapes)
 * - `pipeline`: the per-entry orchestrator
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::pipeline::{Pipeline, PipelineSettings};
pub use self::protect::{PlaceholderToken, Protector};
pub use self::retry::{Delay, NoDelay, RetryPolicy, TokioDelay};
pub use self::segment::Segmenter;

// Submodules
pub mod cache;
pub mod formatting;
pub mod pipeline;
pub mod protect;
pub mod retry;
pub mod segment;
