//! Gizmo overlay of both paths and the current look-at target.

use bevy::prelude::*;

use crate::rig::{CameraRig, RigState, RigSystems, ViewSettings};

/// Line segments per curve segment in the overlay.
const SAMPLES_PER_SEGMENT: usize = 16;

/// Colors and sizes of the path overlay.
#[derive(Resource, Debug, Clone)]
pub struct DebugPathStyle {
    pub camera_path_color: Color,
    pub target_path_color: Color,
    pub target_color: Color,
    /// Radius of the sphere drawn at the target.
    pub target_radius: f32,
}

impl Default for DebugPathStyle {
    fn default() -> Self {
        Self {
            camera_path_color: Color::srgb(1.0, 0.0, 0.0),
            target_path_color: Color::srgb(0.0, 1.0, 0.0),
            target_color: Color::srgb(0.0, 1.0, 0.0),
            target_radius: 5.0,
        }
    }
}

/// Sampled polylines of both paths, rebuilt when the rig changes.
#[derive(Default)]
pub struct PathPolylines {
    camera: Vec<Vec3>,
    target: Vec<Vec3>,
}

fn draw_debug_paths(
    mut gizmos: Gizmos,
    view: Res<ViewSettings>,
    style: Res<DebugPathStyle>,
    rig: Option<Res<CameraRig>>,
    state: Res<RigState>,
    mut polylines: Local<PathPolylines>,
) {
    let Some(rig) = rig else {
        return;
    };

    if rig.is_changed() {
        polylines.camera = rig.camera.sample(rig.camera.segment_count() * SAMPLES_PER_SEGMENT);
        polylines.target = rig.target.sample(rig.target.segment_count() * SAMPLES_PER_SEGMENT);
    }

    if !view.debug_paths {
        return;
    }

    gizmos.linestrip(polylines.camera.iter().copied(), style.camera_path_color);
    gizmos.linestrip(polylines.target.iter().copied(), style.target_path_color);

    if let Some(pose) = state.pose {
        gizmos.sphere(
            Isometry3d::from_translation(pose.target),
            style.target_radius,
            style.target_color,
        );
    }
}

/// Plugin that draws the camera path (red), the target path (green) and the
/// current target when [`ViewSettings::debug_paths`] is set.
pub struct DebugPathsPlugin;

impl Plugin for DebugPathsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugPathStyle>()
            .add_systems(Update, draw_debug_paths.in_set(RigSystems::Observe));
    }
}
