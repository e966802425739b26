//! Canyon fly-through demo.
//!
//! Expects `camera.glb`, `target.glb` and `canyon.glb` in the `assets/` folder
//! (paths can be changed in `flythrough.toml`).
//!
//! Run with: `cargo run`

use std::path::Path;

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use bevy_spline_flythrough::prelude::*;

const CONFIG_PATH: &str = "flythrough.toml";

fn main() -> AppExit {
    let settings = match FlythroughConfig::load_or_default(Path::new(CONFIG_PATH))
        .and_then(|config| config.resolve())
    {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Invalid {CONFIG_PATH}: {err}");
            return AppExit::error();
        }
    };
    let scene = settings.scene.clone();

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((FrameTimeDiagnosticsPlugin::default(), LogDiagnosticsPlugin::default()))
        .add_plugins(FlythroughPlugin::new(settings))
        .insert_resource(SceneAsset(scene))
        .add_systems(Startup, setup)
        .run()
}

#[derive(Resource)]
struct SceneAsset(Option<String>);

fn setup(mut commands: Commands, asset_server: Res<AssetServer>, scene: Res<SceneAsset>) {
    commands.spawn((Camera3d::default(), FlythroughCamera));

    if let Some(path) = &scene.0 {
        commands.spawn((
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()))),
            FoggedScene,
        ));
    }

    info!("=== Canyon Fly-through ===");
    info!("  P      - Cycle fog preset");
    info!("  G      - Toggle path gizmos");
    info!("  [ / ]  - Halve / double loop duration");
    info!("  - / =  - Narrow / widen field of view");
}
