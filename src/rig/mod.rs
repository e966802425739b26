//! Camera rig: a camera flying a closed path while looking at a point on a
//! second closed path.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_spline_flythrough::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .insert_resource(FlythroughPaths {
//!             camera: "camera.glb".into(),
//!             target: "target.glb".into(),
//!         })
//!         .add_plugins(CameraRigPlugin)
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn((Camera3d::default(), FlythroughCamera));
//!         })
//!         .run();
//! }
//! ```

mod components;
mod systems;

pub use components::*;
pub use systems::{
    apply_view_settings, drive_camera_rig, install_camera_rig, load_paths, resolve_camera_rig,
    rig_from_geometry, PathFailure, PathHandles, PathLoad, RigBuild,
};

use bevy::prelude::*;

use crate::clock::{LoopSettings, PhaseOffset};

/// System sets of the per-frame rig update, in execution order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigSystems {
    /// Clock and curve evaluation, camera transform write.
    Drive,
    /// Anything that reads the fresh pose (overlays).
    Observe,
}

/// Plugin that loads both paths, builds the [`CameraRig`] and drives the
/// [`FlythroughCamera`] every frame.
///
/// Loading failures are fatal and exit the app.
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoopSettings>()
            .init_resource::<ViewSettings>()
            .init_resource::<CurveSettings>()
            .init_resource::<FlythroughPaths>()
            .init_resource::<RigState>()
            .register_type::<FlythroughCamera>()
            .register_type::<LoopSettings>()
            .register_type::<PhaseOffset>()
            .register_type::<ViewSettings>()
            .register_type::<CurveSettings>()
            .register_type::<FlythroughPaths>()
            .register_type::<RigState>()
            .configure_sets(Update, (RigSystems::Drive, RigSystems::Observe).chain())
            .add_systems(Startup, load_paths)
            .add_systems(
                Update,
                (
                    resolve_camera_rig
                        .pipe(install_camera_rig)
                        .run_if(resource_exists::<PathHandles>),
                    apply_view_settings,
                    drive_camera_rig.run_if(resource_exists::<CameraRig>),
                )
                    .chain()
                    .in_set(RigSystems::Drive),
            );
    }
}
