//! Three-stop distance fog material.
//!
//! Meshes under a [`FoggedScene`] entity get their standard material swapped for
//! a [`DistanceFogMaterial`], which paints every fragment purely by its distance
//! to the camera. The [`FogSettings`] resource is live-tunable: changes are
//! uploaded to the material and the clear color on the next frame.

mod params;
mod presets;

pub use params::*;
pub use presets::*;

use bevy::{
    asset::embedded_asset,
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderType},
    shader::ShaderRef,
};

const FOG_SHADER_PATH: &str = "embedded://bevy_spline_flythrough/fog/distance_fog.wgsl";

/// Live-tunable fog configuration.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct FogSettings {
    pub params: FogParams,
    /// The preset the params were last reset to.
    pub preset: FogPreset,
}

impl FogSettings {
    pub fn from_preset(preset: FogPreset) -> Self {
        Self {
            params: preset.params(),
            preset,
        }
    }

    /// Switch to the next preset, overwriting the current params.
    pub fn cycle_preset(&mut self) {
        self.preset = self.preset.next();
        self.preset.apply(&mut self.params);
    }
}

/// GPU layout of [`FogParams`]. Colors are linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct FogUniform {
    pub color_near: Vec4,
    pub color_mid: Vec4,
    pub color_far: Vec4,
    pub near: f32,
    pub mid: f32,
    pub far: f32,
}

impl From<&FogParams> for FogUniform {
    fn from(params: &FogParams) -> Self {
        Self {
            color_near: params.color_near.to_linear().to_vec4(),
            color_mid: params.color_mid.to_linear().to_vec4(),
            color_far: params.color_far.to_linear().to_vec4(),
            near: params.near,
            mid: params.mid,
            far: params.far,
        }
    }
}

/// Opaque material that replaces surface shading with distance fog.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct DistanceFogMaterial {
    #[uniform(0)]
    pub fog: FogUniform,
}

impl Material for DistanceFogMaterial {
    fn fragment_shader() -> ShaderRef {
        FOG_SHADER_PATH.into()
    }
}

/// Marker for a scene root whose meshes should be drawn with fog.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FoggedScene;

/// The shared fog material instance.
#[derive(Resource, Debug, Clone)]
pub struct FogMaterialHandle(pub Handle<DistanceFogMaterial>);

fn create_fog_material(
    mut commands: Commands,
    settings: Res<FogSettings>,
    mut materials: ResMut<Assets<DistanceFogMaterial>>,
) {
    let handle = materials.add(DistanceFogMaterial {
        fog: FogUniform::from(&settings.params),
    });
    commands.insert_resource(FogMaterialHandle(handle));
}

/// Upload changed fog settings to the material and the clear color.
fn sync_fog_settings(
    settings: Res<FogSettings>,
    handle: Option<Res<FogMaterialHandle>>,
    mut materials: ResMut<Assets<DistanceFogMaterial>>,
    mut clear_color: ResMut<ClearColor>,
) {
    if !settings.is_changed() {
        return;
    }

    let params = &settings.params;
    if !params.is_ordered() {
        warn!(
            "Fog bands are not ordered (near {}, mid {}, far {}); blends will step",
            params.near, params.mid, params.far
        );
    }

    if let Some(handle) = handle {
        if let Some(mut material) = materials.get_mut(&handle.0) {
            material.fog = FogUniform::from(params);
        }
    }

    // Geometry fades into the far color, so the sky should match it
    clear_color.0 = params.color_far;
}

/// Swap standard materials under fogged scenes for the fog material.
///
/// Scenes spawn asynchronously, so this keeps checking for new meshes.
fn apply_fog_material(
    mut commands: Commands,
    handle: Option<Res<FogMaterialHandle>>,
    roots: Query<Entity, With<FoggedScene>>,
    children: Query<&Children>,
    standard: Query<(), With<MeshMaterial3d<StandardMaterial>>>,
) {
    let Some(handle) = handle else {
        return;
    };

    for root in &roots {
        for entity in children.iter_descendants(root) {
            if standard.contains(entity) {
                commands
                    .entity(entity)
                    .remove::<MeshMaterial3d<StandardMaterial>>()
                    .insert(MeshMaterial3d(handle.0.clone()));
            }
        }
    }
}

/// Plugin that adds the distance fog material.
///
/// Tag a scene root with [`FoggedScene`] to fog every mesh below it.
/// Insert [`FogSettings`] before adding the plugin to start from a custom look.
pub struct DistanceFogPlugin;

impl Plugin for DistanceFogPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "distance_fog.wgsl");

        app.add_plugins(MaterialPlugin::<DistanceFogMaterial>::default())
            .init_resource::<FogSettings>()
            .init_resource::<ClearColor>()
            .register_type::<FogSettings>()
            .register_type::<FoggedScene>()
            .add_systems(Startup, create_fog_material)
            .add_systems(Update, (apply_fog_material, sync_fog_settings));
    }
}
