//! Custom material that shows one frame of a skill sprite sheet.
//!
//! The fragment shader is generated by `skill_atlas::wgsl` at plugin build
//! time for the configured binding shape, so the uniform can be declared as
//! a bare `vec4` or a wrapped struct without a second shader file.

use std::sync::OnceLock;

use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::pbr::{Material, MaterialPlugin};
use bevy::prelude::*;
use bevy::render::render_resource::AsBindGroup;
use bevy::shader::{Shader, ShaderRef};
use skill_atlas::{AddressMode, BindingShape, FilterMode, Sampler, ShaderOptions, ShaderTarget, UvTransform};

/// Asset path reported for the generated shader in logs and errors.
const SHADER_PATH: &str = "skill_atlas/skill_material.wgsl";

/// Generated fragment shader, registered once per process.
static SKILL_SHADER: OnceLock<Handle<Shader>> = OnceLock::new();

/// Plugin that generates the skill shader and registers [`SkillMaterial`].
pub struct SkillMaterialPlugin {
    /// How the frame uniform is declared in the shader.
    pub shape: BindingShape,
}

impl Plugin for SkillMaterialPlugin {
    fn build(&self, app: &mut App) {
        let options = ShaderOptions {
            shape: self.shape.clone(),
            target: ShaderTarget::Bevy,
        };

        match skill_atlas::wgsl::generate(&options) {
            Ok(source) => {
                if let Some(mut shaders) = app.world_mut().get_resource_mut::<Assets<Shader>>() {
                    let handle = shaders.add(Shader::from_wgsl(source, SHADER_PATH));
                    if SKILL_SHADER.set(handle).is_err() {
                        tracing::warn!("Skill shader already registered, keeping the first one");
                    }
                } else {
                    tracing::error!("Shader assets are not initialized; add DefaultPlugins first");
                }
            }
            Err(e) => {
                tracing::error!("Failed to generate skill shader: {}", e);
            }
        }

        app.add_plugins(MaterialPlugin::<SkillMaterial>::default());
    }
}

/// Material bound as: slot 0 frame offset/scale, slot 1 atlas, slot 2 sampler.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SkillMaterial {
    /// `(ox, oy, sx, sy)` of the visible frame.
    #[uniform(0)]
    pub frame: Vec4,
    #[texture(1)]
    #[sampler(2)]
    pub texture: Handle<Image>,
}

impl SkillMaterial {
    #[must_use]
    pub fn new(texture: Handle<Image>, transform: UvTransform) -> Self {
        Self {
            frame: transform.to_vec4(),
            texture,
        }
    }

    /// Point the material at another frame.
    pub fn set_transform(&mut self, transform: UvTransform) {
        self.frame = transform.to_vec4();
    }

    #[must_use]
    pub fn transform(&self) -> UvTransform {
        UvTransform::from_vec4(self.frame)
    }
}

impl Material for SkillMaterial {
    fn fragment_shader() -> ShaderRef {
        SKILL_SHADER
            .get()
            .cloned()
            .map_or(ShaderRef::Default, ShaderRef::Handle)
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}

fn image_address_mode(mode: AddressMode) -> ImageAddressMode {
    match mode {
        AddressMode::ClampToEdge => ImageAddressMode::ClampToEdge,
        AddressMode::Repeat => ImageAddressMode::Repeat,
        AddressMode::MirrorRepeat => ImageAddressMode::MirrorRepeat,
    }
}

fn image_filter_mode(filter: FilterMode) -> ImageFilterMode {
    match filter {
        FilterMode::Nearest => ImageFilterMode::Nearest,
        FilterMode::Linear => ImageFilterMode::Linear,
    }
}

/// GPU sampler matching the reference [`Sampler`].
#[must_use]
pub fn image_sampler(sampler: &Sampler) -> ImageSampler {
    let filter = image_filter_mode(sampler.filter);
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: image_address_mode(sampler.address_mode_u),
        address_mode_v: image_address_mode(sampler.address_mode_v),
        mag_filter: filter,
        min_filter: filter,
        ..default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_packs_transform_as_uniform() {
        let transform = UvTransform::new(Vec2::new(0.4, 0.2), Vec2::splat(0.2));
        let mut material = SkillMaterial::new(Handle::default(), transform);
        assert_eq!(material.frame, Vec4::new(0.4, 0.2, 0.2, 0.2));

        material.set_transform(UvTransform::IDENTITY);
        assert_eq!(material.transform(), UvTransform::IDENTITY);
    }

    #[test]
    fn sampler_maps_to_image_descriptor() {
        let sampler = Sampler {
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::ClampToEdge,
            filter: FilterMode::Nearest,
        };

        let ImageSampler::Descriptor(descriptor) = image_sampler(&sampler) else {
            panic!("expected an explicit descriptor");
        };
        assert_eq!(descriptor.address_mode_u, ImageAddressMode::Repeat);
        assert_eq!(descriptor.address_mode_v, ImageAddressMode::ClampToEdge);
        assert_eq!(descriptor.mag_filter, ImageFilterMode::Nearest);
        assert_eq!(descriptor.min_filter, ImageFilterMode::Nearest);
    }
}
