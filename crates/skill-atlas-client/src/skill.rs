//! Skill effects: spawning, frame animation and despawning.
//!
//! Each skill owns its own [`SkillMaterial`], so several effects can play
//! different frames of the same sheet at once.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use bevy::image::ImageLoaderSettings;
use bevy::prelude::*;
use skill_atlas::animation::{DEFAULT_FRAME_SECONDS, DEFAULT_LIFETIME_SECONDS};
use skill_atlas::{
    AddressMode, AtlasGrid, BindingShape, FilterMode, FrameAnimation, Lifetime, Sampler,
    UvTransform,
};

use crate::material::{SkillMaterial, SkillMaterialPlugin, image_sampler};
use crate::scene::Player;

/// Plugin for skill effects.
#[derive(Default)]
pub struct SkillPlugin {
    pub settings: SkillSettings,
}

impl Plugin for SkillPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SkillMaterialPlugin {
            shape: self.settings.binding_shape.clone(),
        })
        .insert_resource(self.settings.clone())
        .add_systems(Startup, load_sprite_sheet)
        .add_systems(
            Update,
            (
                spawn_skill,
                animate_skills,
                despawn_skills,
                log_skill_frames,
            ),
        );
    }
}

/// Settings for skill effects.
#[derive(Resource, Clone)]
pub struct SkillSettings {
    /// Atlas image, relative to the asset folder.
    pub atlas_path: String,
    /// Layout of frames in the atlas.
    pub grid: AtlasGrid,
    /// Addressing and filtering of the atlas. Clamped by default so the
    /// edges of a frame never pick up texels from the neighbouring frame.
    pub sampler: Sampler,
    /// How the frame uniform is declared in the generated shader.
    pub binding_shape: BindingShape,
    /// Time each frame is shown.
    pub frame_duration: Duration,
    /// Time until a skill despawns.
    pub lifetime: Duration,
    /// Spawn position relative to the player.
    pub spawn_offset: Vec3,
    /// Uniform scale of the skill quad.
    pub spawn_scale: f32,
    /// Key that casts a skill.
    pub spawn_key: KeyCode,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            atlas_path: "water.png".to_owned(),
            grid: AtlasGrid::default(),
            sampler: Sampler::new(AddressMode::ClampToEdge, FilterMode::Linear),
            binding_shape: BindingShape::bare(),
            frame_duration: Duration::from_secs_f32(DEFAULT_FRAME_SECONDS),
            lifetime: Duration::from_secs_f32(DEFAULT_LIFETIME_SECONDS),
            spawn_offset: Vec3::new(1.0, 1.0, 0.0),
            spawn_scale: 0.5,
            spawn_key: KeyCode::Space,
        }
    }
}

impl SkillSettings {
    /// Transform of the frame a freshly spawned skill shows.
    pub fn first_frame(&self) -> skill_atlas::AtlasResult<UvTransform> {
        self.grid.frame_transform(0)
    }
}

/// Shared assets for all skills.
#[derive(Resource)]
pub struct SkillSpriteSheet {
    pub texture: Handle<Image>,
    pub quad: Handle<Mesh>,
}

/// A live skill effect.
#[derive(Component)]
pub struct WaterSkill {
    pub animation: FrameAnimation,
    pub lifetime: Lifetime,
}

impl WaterSkill {
    #[must_use]
    pub fn new(settings: &SkillSettings) -> Self {
        Self {
            animation: FrameAnimation::new(settings.grid.frame_count(), settings.frame_duration),
            lifetime: Lifetime::new(settings.lifetime),
        }
    }
}

/// Load the atlas with the configured sampler and build the shared quad.
#[allow(clippy::needless_pass_by_value)]
fn load_sprite_sheet(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    settings: Res<SkillSettings>,
) {
    let sampler = image_sampler(&settings.sampler);
    let texture: Handle<Image> = asset_server.load_with_settings(
        settings.atlas_path.clone(),
        move |loader: &mut ImageLoaderSettings| {
            loader.sampler = sampler.clone();
        },
    );
    let quad = meshes.add(Rectangle::new(1.0, 1.0));

    tracing::info!(
        "Loading skill sheet {} ({} frames)",
        settings.atlas_path,
        settings.grid.frame_count()
    );

    commands.insert_resource(SkillSpriteSheet { texture, quad });
}

/// Cast a skill next to the player on key press.
#[allow(clippy::needless_pass_by_value)]
fn spawn_skill(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<SkillSettings>,
    sheet: Option<Res<SkillSpriteSheet>>,
    mut materials: ResMut<Assets<SkillMaterial>>,
    query: Query<&Transform, With<Player>>,
) {
    if !keyboard.just_pressed(settings.spawn_key) {
        return;
    }
    let Some(sheet) = sheet else {
        return;
    };
    let Ok(player) = query.single() else {
        return;
    };

    let frame = match settings.first_frame() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Cannot spawn skill: {}", e);
            return;
        }
    };

    let position = player.translation + settings.spawn_offset;
    let material = materials.add(SkillMaterial::new(sheet.texture.clone(), frame));

    commands.spawn((
        Mesh3d(sheet.quad.clone()),
        MeshMaterial3d(material),
        Transform::from_translation(position)
            .with_rotation(Quat::from_rotation_y(-FRAC_PI_2))
            .with_scale(Vec3::splat(settings.spawn_scale)),
        WaterSkill::new(&settings),
    ));

    tracing::info!("Skill spawned at {}", position);
}

/// Step each skill's animation and point its material at the new frame.
#[allow(clippy::needless_pass_by_value)]
fn animate_skills(
    time: Res<Time>,
    settings: Res<SkillSettings>,
    mut materials: ResMut<Assets<SkillMaterial>>,
    mut query: Query<(&mut WaterSkill, &MeshMaterial3d<SkillMaterial>)>,
) {
    for (mut skill, material) in &mut query {
        let Some(frame) = skill.animation.tick(time.delta()) else {
            continue;
        };

        match settings.grid.frame_transform(frame) {
            Ok(transform) => {
                if let Some(skill_material) = materials.get_mut(&material.0) {
                    skill_material.set_transform(transform);
                }
            }
            Err(e) => {
                tracing::error!("Skill frame {} has no transform: {}", frame, e);
            }
        }
    }
}

/// Remove skills whose lifetime ran out.
#[allow(clippy::needless_pass_by_value)]
fn despawn_skills(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut WaterSkill)>,
) {
    for (entity, mut skill) in &mut query {
        if skill.lifetime.tick(time.delta()) {
            commands.entity(entity).despawn();
            tracing::info!("Skill despawned");
        }
    }
}

fn log_skill_frames(query: Query<(&Transform, &WaterSkill)>) {
    for (transform, skill) in &query {
        tracing::debug!(
            "Skill position: {}, current frame: {}",
            transform.translation,
            skill.animation.current()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_water_sheet() {
        let settings = SkillSettings::default();
        assert_eq!(settings.grid.frame_count(), 25);
        assert_eq!(
            settings.first_frame().unwrap().to_vec4(),
            Vec4::new(0.0, 0.0, 0.2, 0.2)
        );
        assert_eq!(settings.sampler.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(settings.frame_duration, Duration::from_millis(50));
    }

    #[test]
    fn new_skill_starts_on_first_frame() {
        let skill = WaterSkill::new(&SkillSettings::default());
        assert_eq!(skill.animation.current(), 0);
        assert_eq!(skill.animation.loop_start(), 1);
        assert!(!skill.lifetime.is_finished());
    }

    #[test]
    fn zero_lifetime_skill_despawns_on_next_update() {
        let settings = SkillSettings {
            lifetime: Duration::ZERO,
            ..SkillSettings::default()
        };
        let mut skill = WaterSkill::new(&settings);
        assert!(skill.lifetime.tick(Duration::from_millis(16)));
    }
}
