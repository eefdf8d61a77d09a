//! Demo scene: ground plane, light, player and enemy cubes.

use bevy::prelude::*;

use crate::camera::ControlledCamera;

/// Plugin that builds the demo scene and moves the player.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSettings>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, player_movement);
    }
}

/// Settings for player movement.
#[derive(Resource)]
pub struct PlayerSettings {
    /// Movement speed in meters per second.
    pub speed: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self { speed: 3.0 }
    }
}

/// The cube skills are cast from.
#[derive(Component)]
pub struct Player;

/// A static target cube.
#[derive(Component)]
pub struct Enemy;

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        ControlledCamera,
    ));

    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(10.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::default(),
    ));

    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));

    commands.spawn((
        Mesh3d(cube.clone()),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.3))),
        Transform::from_xyz(0.0, 0.5, 0.0),
        Player,
    ));

    commands.spawn((
        Mesh3d(cube),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.3, 0.8))),
        Transform::from_xyz(5.0, 0.5, 5.0),
        Enemy,
    ));

    tracing::info!("Scene ready");
}

/// Handle IJKL movement in the ground plane.
#[allow(clippy::needless_pass_by_value)]
fn player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<PlayerSettings>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let mut movement = Vec3::ZERO;

    if keyboard.pressed(KeyCode::KeyI) {
        movement.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyK) {
        movement.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyJ) {
        movement.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyL) {
        movement.x += 1.0;
    }

    transform.translation += movement * settings.speed * time.delta_secs();
}
