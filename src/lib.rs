//! # bevy_spline_flythrough
//!
//! A Bevy plugin for looping camera fly-throughs along authored spline paths,
//! with a three-stop distance fog material for the scenery.
//!
//! ## Features
//!
//! - Path extraction from glTF line meshes, in vertex order, in world space
//! - Closed Catmull-Rom curves (uniform or centripetal), optionally arc-length parameterized
//! - A stateless loop clock driving a camera path and a phase-shifted target path
//! - A fog material blending near, mid and far colors by distance to the camera
//! - TOML configuration with fog presets, and live tuning hotkeys
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_spline_flythrough::prelude::*;
//!
//! fn main() {
//!     let settings = FlythroughConfig::default().resolve().unwrap();
//!
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(FlythroughPlugin::new(settings))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn((Camera3d::default(), FlythroughCamera));
//!     commands.spawn((
//!         SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset("canyon.glb"))),
//!         FoggedScene,
//!     ));
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`FlythroughPlugin`]: Everything below, configured from [`FlythroughSettings`]
//! - [`CameraRigPlugin`]: Path loading, rig construction and per-frame camera update
//! - [`DistanceFogPlugin`]: The fog material and its live settings
//! - [`TuningControlsPlugin`]: Hotkeys for loop, fog and view settings (optional)
//! - [`DebugPathsPlugin`]: Gizmo overlay of both paths (optional, `debug` feature)

pub mod clock;
pub mod config;
pub mod controls;
pub mod error;
pub mod fog;
pub mod geometry;
pub mod rig;
pub mod spline;

#[cfg(feature = "debug")]
pub mod debug;

pub use config::{FlythroughConfig, FlythroughSettings};
pub use controls::TuningControlsPlugin;
pub use error::FlythroughError;
pub use fog::DistanceFogPlugin;
pub use rig::CameraRigPlugin;

#[cfg(feature = "debug")]
pub use debug::DebugPathsPlugin;

use bevy::prelude::*;

/// Plugin bundling the rig, the fog material, the hotkeys and (with the
/// `debug` feature) the path overlay, seeded from resolved settings.
pub struct FlythroughPlugin {
    pub settings: FlythroughSettings,
}

impl FlythroughPlugin {
    pub fn new(settings: FlythroughSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for FlythroughPlugin {
    fn build(&self, app: &mut App) {
        let settings = &self.settings;
        app.insert_resource(settings.looping)
            .insert_resource(settings.fog)
            .insert_resource(settings.view)
            .insert_resource(settings.curve)
            .insert_resource(settings.paths.clone())
            .add_plugins((CameraRigPlugin, DistanceFogPlugin, TuningControlsPlugin));

        #[cfg(feature = "debug")]
        app.add_plugins(DebugPathsPlugin);
    }
}

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::clock::{CyclicClock, CyclicParams, LoopSettings, PhaseOffset};
    pub use crate::config::{FlythroughConfig, FlythroughSettings};
    pub use crate::controls::TuningControlsPlugin;
    pub use crate::error::FlythroughError;
    pub use crate::fog::{
        DistanceFogMaterial, DistanceFogPlugin, FogParams, FogPreset, FogSettings, FoggedScene,
    };
    pub use crate::rig::{
        CameraPose, CameraRig, CameraRigPlugin, CurveSettings, FlythroughCamera, FlythroughPaths,
        RigState, ViewSettings,
    };
    pub use crate::spline::{CatmullRomKind, ClosedCurve, Parameterization};
    pub use crate::FlythroughPlugin;

    #[cfg(feature = "debug")]
    pub use crate::debug::{DebugPathStyle, DebugPathsPlugin};
}
