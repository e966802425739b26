use bevy::{
    asset::{DependencyLoadState, LoadState, RecursiveDependencyLoadState},
    gltf::{Gltf, GltfMesh, GltfNode},
    prelude::*,
};

use crate::clock::{CyclicClock, LoopSettings};
use crate::error::{FlythroughError, Result};
use crate::spline::{build_curve, find_line_geometry};

use super::{CameraRig, CurveSettings, FlythroughCamera, FlythroughPaths, RigState, ViewSettings};

/// Handles of the path documents while they are loading.
#[derive(Resource, Debug, Clone)]
pub struct PathHandles {
    pub camera: Handle<Gltf>,
    pub target: Handle<Gltf>,
}

/// Start loading both path documents.
pub fn load_paths(
    mut commands: Commands,
    paths: Res<FlythroughPaths>,
    asset_server: Res<AssetServer>,
) {
    info!(
        "Loading camera path `{}` and target path `{}`",
        paths.camera, paths.target
    );
    commands.insert_resource(PathHandles {
        camera: asset_server.load(paths.camera.clone()),
        target: asset_server.load(paths.target.clone()),
    });
}

/// Loading progress of one path document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLoad {
    Pending,
    Ready,
    /// The document or one of its dependencies failed to load.
    Failed(String),
}

impl PathLoad {
    pub fn from_states(
        states: Option<(LoadState, DependencyLoadState, RecursiveDependencyLoadState)>,
    ) -> Self {
        match states {
            Some((LoadState::Failed(err), _, _)) => Self::Failed(err.to_string()),
            Some((_, _, RecursiveDependencyLoadState::Failed(err))) => {
                Self::Failed(err.to_string())
            }
            Some((LoadState::Loaded, _, RecursiveDependencyLoadState::Loaded)) => Self::Ready,
            _ => Self::Pending,
        }
    }
}

/// A path that could not be turned into a curve, with the asset it came from.
#[derive(Debug)]
pub struct PathFailure {
    pub path: String,
    pub error: FlythroughError,
}

/// Outcome of one attempt to build the rig. `None` while still loading.
pub type RigBuild = Option<Result<CameraRig, PathFailure>>;

/// Build both curves from the line geometry found in each path document.
pub fn rig_from_geometry(
    camera: Option<(Vec<f32>, Mat4)>,
    target: Option<(Vec<f32>, Mat4)>,
    paths: &FlythroughPaths,
    settings: &CurveSettings,
) -> Result<CameraRig, PathFailure> {
    let build = |geometry: Option<(Vec<f32>, Mat4)>, path: &str| {
        let (buffer, world) = geometry.unzip();
        build_curve(
            buffer.as_deref(),
            &world.unwrap_or(Mat4::IDENTITY),
            settings.kind,
            settings.parameterization,
        )
        .map_err(|error| PathFailure {
            path: path.to_string(),
            error,
        })
    };

    let camera = build(camera, &paths.camera)?;
    let target = build(target, &paths.target)?;
    Ok(CameraRig::new(camera, target))
}

/// Check both path documents and build the rig once they are loaded.
#[allow(clippy::too_many_arguments)]
pub fn resolve_camera_rig(
    handles: Res<PathHandles>,
    paths: Res<FlythroughPaths>,
    curve_settings: Res<CurveSettings>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    nodes: Res<Assets<GltfNode>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    meshes: Res<Assets<Mesh>>,
) -> RigBuild {
    let mut pending = false;
    for (handle, path) in [(&handles.camera, &paths.camera), (&handles.target, &paths.target)] {
        match PathLoad::from_states(asset_server.get_load_states(handle)) {
            PathLoad::Failed(reason) => {
                return Some(Err(PathFailure {
                    path: path.clone(),
                    error: FlythroughError::AssetLoad {
                        path: path.clone(),
                        reason,
                    },
                }));
            }
            PathLoad::Pending => pending = true,
            PathLoad::Ready => {}
        }
    }

    if pending {
        return None;
    }

    let geometry = |handle: &Handle<Gltf>| {
        gltfs
            .get(handle)
            .and_then(|gltf| find_line_geometry(gltf, &nodes, &gltf_meshes, &meshes))
    };

    Some(rig_from_geometry(
        geometry(&handles.camera),
        geometry(&handles.target),
        &paths,
        &curve_settings,
    ))
}

/// Install a built rig, or log the failure and exit the app.
///
/// Any failure is fatal, since a rig without a path has nothing to show.
pub fn install_camera_rig(
    In(build): In<RigBuild>,
    mut commands: Commands,
    curve_settings: Res<CurveSettings>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(build) = build else {
        return;
    };

    commands.remove_resource::<PathHandles>();

    match build {
        Ok(rig) => {
            info!(
                "Camera rig ready: {} camera points, {} target points ({} interpolation)",
                rig.camera.control_points().len(),
                rig.target.control_points().len(),
                curve_settings.kind.name(),
            );
            commands.insert_resource(rig);
        }
        Err(PathFailure { path, error }) => {
            error!("Failed to build path from `{path}`: {error}");
            exit.write(AppExit::error());
        }
    }
}

/// Per-tick update: clock, then both curves, then the camera transform.
pub fn drive_camera_rig(
    time: Res<Time>,
    settings: Res<LoopSettings>,
    rig: Res<CameraRig>,
    mut state: ResMut<RigState>,
    mut cameras: Query<&mut Transform, With<FlythroughCamera>>,
) {
    let params = CyclicClock::evaluate(time.elapsed_secs_f64(), &settings);
    let pose = rig.pose(params.primary as f32, params.secondary as f32);

    for mut transform in &mut cameras {
        transform.translation = pose.position;
        if let Some(rotation) = pose.rotation {
            transform.rotation = rotation;
        }
    }

    state.params = params;
    state.pose = Some(pose);
}

/// Push changed view settings into the camera projection.
pub fn apply_view_settings(
    settings: Res<ViewSettings>,
    mut cameras: Query<&mut Projection, With<FlythroughCamera>>,
) {
    if !settings.is_changed() {
        return;
    }

    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = settings.fov_degrees.to_radians();
            perspective.near = settings.near_clip;
            perspective.far = settings.far_clip;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc, time::Duration};

    use bevy::asset::{io::AssetReaderError, AssetLoadError};

    use super::*;
    use crate::clock::PhaseOffset;
    use crate::spline::ClosedCurve;

    fn rig_app(settings: LoopSettings) -> App {
        let square = |height: f32| {
            ClosedCurve::new(vec![
                Vec3::new(0.0, height, 0.0),
                Vec3::new(10.0, height, 0.0),
                Vec3::new(10.0, height, 10.0),
                Vec3::new(0.0, height, 10.0),
            ])
            .unwrap()
        };

        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .insert_resource(settings)
            .insert_resource(CameraRig::new(square(5.0), square(0.0)))
            .init_resource::<RigState>()
            .add_systems(Update, drive_camera_rig);
        app
    }

    #[test]
    fn test_tick_moves_tagged_camera_only() {
        let mut app = rig_app(LoopSettings {
            period_secs: 4.0,
            offset: PhaseOffset::Seconds(1.0),
        });
        let camera = app.world_mut().spawn((Transform::default(), FlythroughCamera)).id();
        let bystander = app.world_mut().spawn(Transform::default()).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(2));
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!((transform.translation - Vec3::new(10.0, 5.0, 10.0)).length() < 1e-3);

        // Target is a quarter loop ahead, at the last corner
        let forward = transform.rotation * Vec3::NEG_Z;
        let expected = (Vec3::new(0.0, 0.0, 10.0) - transform.translation).normalize();
        assert!((forward - expected).length() < 1e-3);

        let state = app.world().resource::<RigState>();
        assert!((state.params.primary - 0.5).abs() < 1e-9);
        assert!((state.params.secondary - 0.75).abs() < 1e-9);

        assert_eq!(app.world().get::<Transform>(bystander), Some(&Transform::default()));
    }

    #[test]
    fn test_loop_setting_change_applies_next_tick() {
        let mut app = rig_app(LoopSettings {
            period_secs: 4.0,
            offset: PhaseOffset::Fraction(0.0),
        });
        app.world_mut().spawn((Transform::default(), FlythroughCamera));

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(1));
        app.update();
        assert!((app.world().resource::<RigState>().params.primary - 0.25).abs() < 1e-9);

        app.world_mut().resource_mut::<LoopSettings>().period_secs = 8.0;
        app.update();
        assert!((app.world().resource::<RigState>().params.primary - 0.125).abs() < 1e-9);
    }

    fn square_path(offset: Vec3) -> Option<(Vec<f32>, Mat4)> {
        let buffer = vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 10.0, 0.0, 10.0, 0.0, 0.0, 10.0];
        Some((buffer, Mat4::from_translation(offset)))
    }

    fn install_app(build: Result<CameraRig, PathFailure>) -> App {
        let mut build = Some(build);

        let mut app = App::new();
        app.init_resource::<CurveSettings>()
            .add_systems(Update, (move || build.take()).pipe(install_camera_rig));
        app
    }

    fn not_found() -> Arc<AssetLoadError> {
        Arc::new(AssetLoadError::AssetReaderError(AssetReaderError::NotFound(
            PathBuf::from("textures/rock.png"),
        )))
    }

    #[test]
    fn test_load_states() {
        assert_eq!(PathLoad::from_states(None), PathLoad::Pending);
        assert_eq!(
            PathLoad::from_states(Some((
                LoadState::Loading,
                DependencyLoadState::NotLoaded,
                RecursiveDependencyLoadState::NotLoaded,
            ))),
            PathLoad::Pending
        );
        assert_eq!(
            PathLoad::from_states(Some((
                LoadState::Loaded,
                DependencyLoadState::Loaded,
                RecursiveDependencyLoadState::Loaded,
            ))),
            PathLoad::Ready
        );
        assert!(matches!(
            PathLoad::from_states(Some((
                LoadState::Failed(not_found()),
                DependencyLoadState::NotLoaded,
                RecursiveDependencyLoadState::NotLoaded,
            ))),
            PathLoad::Failed(_)
        ));
    }

    #[test]
    fn test_failed_dependency_fails_the_path() {
        // The document itself loaded, but a buffer or texture it references did not
        let load = PathLoad::from_states(Some((
            LoadState::Loaded,
            DependencyLoadState::Failed(not_found()),
            RecursiveDependencyLoadState::Failed(not_found()),
        )));
        assert!(matches!(load, PathLoad::Failed(_)));
    }

    #[test]
    fn test_rig_from_geometry_places_both_paths() {
        let rig = rig_from_geometry(
            square_path(Vec3::ZERO),
            square_path(Vec3::new(0.0, 50.0, 0.0)),
            &FlythroughPaths::default(),
            &CurveSettings::default(),
        )
        .unwrap();

        assert_eq!(rig.camera.control_points().len(), 4);
        assert!((rig.target.position_at(0.0) - Vec3::new(0.0, 50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_rig_from_geometry_names_the_failing_path() {
        let paths = FlythroughPaths::default();
        let settings = CurveSettings::default();

        let missing = rig_from_geometry(square_path(Vec3::ZERO), None, &paths, &settings);
        assert!(matches!(
            missing,
            Err(PathFailure {
                ref path,
                error: FlythroughError::MissingPath,
            }) if *path == paths.target
        ));

        let single = Some((vec![1.0, 2.0, 3.0], Mat4::IDENTITY));
        let short = rig_from_geometry(single, square_path(Vec3::ZERO), &paths, &settings);
        assert!(matches!(
            short,
            Err(PathFailure {
                ref path,
                error: FlythroughError::InsufficientControlPoints { found: 1 },
            }) if *path == paths.camera
        ));
    }

    #[test]
    fn test_build_failure_exits_without_rig() {
        for error in [
            FlythroughError::MissingPath,
            FlythroughError::InsufficientControlPoints { found: 1 },
            FlythroughError::AssetLoad {
                path: "camera.glb".into(),
                reason: "not found".into(),
            },
        ] {
            let mut app = install_app(Err(PathFailure {
                path: "camera.glb".into(),
                error,
            }));
            app.update();

            assert!(app.world().get_resource::<CameraRig>().is_none());
            assert!(matches!(app.should_exit(), Some(AppExit::Error(_))));
        }
    }

    #[test]
    fn test_built_rig_is_installed() {
        let rig = rig_from_geometry(
            square_path(Vec3::ZERO),
            square_path(Vec3::ZERO),
            &FlythroughPaths::default(),
            &CurveSettings::default(),
        );
        let mut app = install_app(rig);
        app.world_mut().insert_resource(PathHandles {
            camera: Handle::default(),
            target: Handle::default(),
        });
        app.update();

        assert!(app.world().get_resource::<CameraRig>().is_some());
        assert!(app.world().get_resource::<PathHandles>().is_none());
        assert!(app.should_exit().is_none());
    }
}
