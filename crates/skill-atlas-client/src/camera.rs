//! Keyboard camera controller for inspecting skill effects.
//!
//! WASD moves in the ground plane, Q/E moves down/up, and the arrow keys
//! pitch and yaw the camera in place.

use bevy::prelude::*;

/// Plugin for keyboard camera controls.
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, (camera_movement, camera_rotation));
    }
}

/// Settings for camera movement.
#[derive(Resource)]
pub struct CameraSettings {
    /// Movement speed in meters per second.
    pub move_speed: f32,
    /// Rotation speed in radians per second.
    pub rotate_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotate_speed: 1.0,
        }
    }
}

/// Marker component for the camera entity that should be controlled.
#[derive(Component, Default)]
pub struct ControlledCamera;

/// Handle WASD + Q/E translation along the world axes.
#[allow(clippy::needless_pass_by_value)]
fn camera_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<CameraSettings>,
    mut query: Query<&mut Transform, With<ControlledCamera>>,
) {
    let mut movement = Vec3::ZERO;

    if keyboard.pressed(KeyCode::KeyW) {
        movement.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        movement.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        movement.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        movement.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        movement.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        movement.y += 1.0;
    }

    if movement == Vec3::ZERO {
        return;
    }

    for mut transform in &mut query {
        transform.translation += movement * settings.move_speed * time.delta_secs();
    }
}

/// Handle arrow-key pitch and yaw around the camera's own axes.
#[allow(clippy::needless_pass_by_value)]
fn camera_rotation(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<CameraSettings>,
    mut query: Query<&mut Transform, With<ControlledCamera>>,
) {
    let mut rotation = Vec2::ZERO;

    // x is pitch, y is yaw.
    if keyboard.pressed(KeyCode::ArrowUp) {
        rotation.x += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        rotation.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowLeft) {
        rotation.y += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        rotation.y -= 1.0;
    }

    if rotation == Vec2::ZERO {
        return;
    }

    let angle = settings.rotate_speed * time.delta_secs();
    for mut transform in &mut query {
        transform.rotate_local_x(rotation.x * angle);
        transform.rotate_local_y(rotation.y * angle);
    }
}
