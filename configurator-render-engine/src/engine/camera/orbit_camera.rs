use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::render_settings::{
    CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_START_POSITION,
};

/// Orbit camera state around the product.
#[derive(Resource)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub last_mouse_pos: Vec2,
    /// Cumulative pointer travel since the last left press. The picker
    /// uses it to tell a selection click from an orbit drag.
    pub drag_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            yaw: 0.0,
            pitch: -(CAMERA_START_POSITION.y.atan2(CAMERA_START_POSITION.z)),
            distance: CAMERA_START_POSITION.length(),
            last_mouse_pos: Vec2::ZERO,
            drag_distance: 0.0,
        }
    }
}

/// Drive the viewport camera from pointer input: left-drag orbits, the
/// wheel dollies within the clamp range, and the transform eases toward
/// the target to avoid hard snaps.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut cursor_moved: EventReader<CursorMoved>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Update cursor position
    for cursor in cursor_moved.read() {
        orbit.last_mouse_pos = cursor.position;
    }

    let mouse_delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();

    if mouse_button.just_pressed(MouseButton::Left) {
        orbit.drag_distance = 0.0;
    }

    // Left drag orbits around the focus point
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        orbit.drag_distance += mouse_delta.length();
        let yaw_sens = 0.0045;
        let pitch_sens = 0.0040;
        orbit.yaw -= mouse_delta.x * yaw_sens;
        orbit.pitch -= mouse_delta.y * pitch_sens;
        orbit.pitch = orbit.pitch.clamp(-1.55, 1.55);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for event in scroll_events.read() {
        scroll_accum += match event.unit {
            MouseScrollUnit::Line => event.y * 1.0,
            MouseScrollUnit::Pixel => event.y * 0.05,
        };
    }

    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (orbit.distance * 0.12).clamp(0.05, 2.0);
        orbit.distance =
            (orbit.distance - scroll_accum * dolly_speed).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    let target_rot = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
    let target_pos = orbit.focus_point + target_rot * (Vec3::Z * orbit.distance);

    let lerp_speed = 12.0 * time.delta_secs();
    camera_transform.translation = camera_transform
        .translation
        .lerp(target_pos, lerp_speed.min(1.0));
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(target_rot, lerp_speed.min(1.0));
}
