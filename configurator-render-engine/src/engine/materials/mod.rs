//! Material catalog types, the caching factory, and the swapper.
//!
//! A material flows catalog definition → cached template → per-mesh clone;
//! the swapper moves the live scene between assignment states with an
//! explicit diff.

/// Catalog material definitions and the property cache signature.
pub mod definition;

/// Caching material factory with per-texture failure recovery.
pub mod factory;

/// Assignment map, diffing, and application to live meshes.
pub mod swapper;
