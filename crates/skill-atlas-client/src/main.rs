//! Sprite-sheet skill effect demo.
//!
//! Press Space to cast a water skill next to the player. IJKL moves the
//! player, WASD/QE moves the camera and the arrow keys turn it.

mod camera;
mod material;
mod scene;
mod skill;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use camera::CameraControllerPlugin;
use scene::ScenePlugin;
use skill::SkillPlugin;

fn main() {
    #[cfg(target_family = "wasm")]
    console_error_panic_hook::set_once();

    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            filter: "wgpu=error,naga=warn,skill_atlas=info,skill_atlas_client=info".to_owned(),
            ..default()
        }))
        .add_plugins((CameraControllerPlugin, ScenePlugin, SkillPlugin::default()))
        .run();
}
