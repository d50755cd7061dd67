//! Startup and model-load pipeline.
//!
//! Catalogs load first, then the restored or default model; component
//! extraction follows scene spawn, all tracked through completion flags.

/// Catalog fetch and readiness polling.
pub mod catalog_loader;

/// Model selection events, scene spawn, and per-scene cache teardown.
pub mod model_loader;

/// Loading completion flags for state transitions and the status feed.
pub mod progress;
