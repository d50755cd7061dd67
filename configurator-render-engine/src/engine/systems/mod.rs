/// FPS and loading-progress feeds for the frontend and the native
/// overlay.
pub mod status_feed;
