//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and session persistence for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with catalog asset loading, the material
/// pipeline, interaction tools, and platform-specific configuration.
pub mod app_setup;

/// Application state machine and loading transitions.
///
/// Manages states from catalog loading through the initial model request
/// to runtime execution.
pub mod app_state;

/// Persisted model selection in browser localStorage.
///
/// Restores the previous visit's model on startup; native builds no-op.
pub mod session;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
