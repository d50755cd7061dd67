//! Scene understanding for the loaded product model.
//!
//! Classifies mesh names into shoe components, extracts records from the
//! spawned scene graph, groups them into the component map, and switches
//! the studio environment.

/// Pure mesh-name → component classification over the ordered pattern
/// table.
pub mod classifier;

/// Component map cache, rebuild systems, and the frontend summary feed.
pub mod component_map;

/// Studio environment (skybox + environment light) switching.
pub mod environment;

/// Read-only scene traversal producing classified component records.
pub mod extractor;
