//! Shared static data for the configurator render engine.
//!
//! Holds the shoe component taxonomy with its classification pattern
//! table, viewport render settings, asset path roots, and the browser
//! storage key table.

pub mod component;
pub mod path;
pub mod render_settings;
pub mod storage;
