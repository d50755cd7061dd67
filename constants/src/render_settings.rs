use bevy::prelude::*;

/// Emissive tint for meshes in the hovered category.
pub const HOVER_TINT: Color = Color::srgb(0.878, 0.878, 0.878);

/// Emissive tint for meshes in the selected category.
pub const SELECTED_TINT: Color = Color::srgb(0.941, 0.941, 0.941);

/// Emissive intensity for hover/selection tints. Subtle on purpose, just
/// enough to read as feedback without washing out the material.
pub const HIGHLIGHT_INTENSITY: f32 = 0.08;

/// Base colour of the neutral material a part falls back to when its
/// assignment is cleared (0xcccccc).
pub const NEUTRAL_BASE_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);

/// Initial orbit camera placement relative to the product.
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, 1.0, 8.0);

/// Orbit dolly clamp range in world units.
pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
pub const CAMERA_MAX_DISTANCE: f32 = 20.0;

/// Fallback lighting underneath the HDR environment.
pub const AMBIENT_BRIGHTNESS: f32 = 80.0;
pub const FILL_LIGHT_ILLUMINANCE: f32 = 4_000.0;

/// Default skybox brightness when a background entry does not override it.
pub const DEFAULT_ENVIRONMENT_INTENSITY: f32 = 900.0;
