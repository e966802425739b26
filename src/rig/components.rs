use bevy::prelude::*;

use crate::clock::CyclicParams;
use crate::geometry::look_at_rotation;
use crate::spline::{CatmullRomKind, ClosedCurve, Parameterization};

/// Marker for the camera driven by the [`CameraRig`].
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FlythroughCamera;

/// The camera path and the look-at target path, built once at startup.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    /// Path the camera travels along.
    pub camera: ClosedCurve,
    /// Path of the point the camera looks at.
    pub target: ClosedCurve,
}

/// Where the camera is and where it looks for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// `None` when the camera sits exactly on its target.
    pub rotation: Option<Quat>,
}

impl CameraRig {
    pub fn new(camera: ClosedCurve, target: ClosedCurve) -> Self {
        Self { camera, target }
    }

    /// Evaluate both paths and aim the camera at the target.
    ///
    /// World up is +Y. When looking straight up or down, the direction of
    /// travel along the camera path takes over as up so the roll stays stable.
    pub fn pose(&self, primary: f32, secondary: f32) -> CameraPose {
        let position = self.camera.position_at(primary);
        let target = self.target.position_at(secondary);
        let travel = self.camera.tangent_at(primary);

        CameraPose {
            position,
            target,
            rotation: look_at_rotation(position, target, Vec3::Y, &[travel]),
        }
    }
}

/// Latest clock output and pose, for overlays and diagnostics.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct RigState {
    pub params: CyclicParams,
    pub pose: Option<CameraPose>,
}

/// How the paths are interpolated once loaded.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub struct CurveSettings {
    pub kind: CatmullRomKind,
    pub parameterization: Parameterization,
}

/// Live-tunable view options.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ViewSettings {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Draw both paths and the target as gizmos.
    pub debug_paths: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 14.0,
            near_clip: 0.1,
            far_clip: 15_000.0,
            debug_paths: false,
        }
    }
}

impl ViewSettings {
    pub const FOV_RANGE: (f32, f32) = (5.0, 50.0);

    /// Nudge the field of view, staying inside [`Self::FOV_RANGE`].
    pub fn adjust_fov(&mut self, delta_degrees: f32) {
        let (min, max) = Self::FOV_RANGE;
        self.fov_degrees = (self.fov_degrees + delta_degrees).clamp(min, max);
    }
}

/// Asset paths of the two authored line paths.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct FlythroughPaths {
    pub camera: String,
    pub target: String,
}

impl Default for FlythroughPaths {
    fn default() -> Self {
        Self {
            camera: "camera.glb".to_string(),
            target: "target.glb".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32, height: f32) -> ClosedCurve {
        ClosedCurve::new(vec![
            Vec3::new(0.0, height, 0.0),
            Vec3::new(size, height, 0.0),
            Vec3::new(size, height, size),
            Vec3::new(0.0, height, size),
        ])
        .unwrap()
    }

    #[test]
    fn test_pose_evaluates_both_paths() {
        let rig = CameraRig::new(square(10.0, 5.0), square(10.0, 0.0));
        let pose = rig.pose(0.0, 0.5);

        assert!((pose.position - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-4);
        assert!((pose.target - Vec3::new(10.0, 0.0, 10.0)).length() < 1e-3);

        let forward = pose.rotation.unwrap() * Vec3::NEG_Z;
        assert!((forward - (pose.target - pose.position).normalize()).length() < 1e-4);
    }

    #[test]
    fn test_pose_looking_straight_down_follows_travel() {
        // Target path sits directly below the camera path
        let rig = CameraRig::new(square(10.0, 50.0), square(10.0, 0.0));
        let pose = rig.pose(0.0, 0.0);

        let rotation = pose.rotation.unwrap();
        assert!(rotation.is_finite());
        assert!((rotation * Vec3::NEG_Z - Vec3::NEG_Y).length() < 1e-4);

        let travel = rig.camera.tangent_at(0.0);
        assert!((rotation * Vec3::Y).dot(travel) > 0.99);
    }

    #[test]
    fn test_pose_on_target_keeps_orientation_undefined() {
        let rig = CameraRig::new(square(10.0, 0.0), square(10.0, 0.0));
        assert!(rig.pose(0.3, 0.3).rotation.is_none());
    }

    #[test]
    fn test_fov_is_clamped() {
        let mut view = ViewSettings::default();
        view.adjust_fov(100.0);
        assert_eq!(view.fov_degrees, 50.0);
        view.adjust_fov(-100.0);
        assert_eq!(view.fov_degrees, 5.0);
    }
}
