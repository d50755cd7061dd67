/// Orbit camera resource and pointer-driven controller.
pub mod orbit_camera;

pub use orbit_camera::{OrbitCamera, camera_controller};
