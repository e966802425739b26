//! Keyboard tuning of the live settings.
//!
//! Every change lands in a resource and takes effect on the next frame,
//! with no easing between old and new values.

use bevy::prelude::*;

use crate::clock::LoopSettings;
use crate::fog::FogSettings;
use crate::rig::ViewSettings;

/// Allowed loop durations, in seconds.
pub const LOOP_DURATION_RANGE: (f64, f64) = (10.0, 480.0);

/// Scale the loop duration, staying inside [`LOOP_DURATION_RANGE`].
pub fn scale_loop_duration(settings: &mut LoopSettings, factor: f64) {
    let (min, max) = LOOP_DURATION_RANGE;
    settings.period_secs = (settings.period_secs * factor).clamp(min, max);
}

/// System to handle tuning hotkeys.
pub fn handle_tuning_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut loop_settings: ResMut<LoopSettings>,
    mut fog: ResMut<FogSettings>,
    mut view: ResMut<ViewSettings>,
) {
    // P: cycle fog preset
    if keyboard.just_pressed(KeyCode::KeyP) {
        fog.cycle_preset();
        info!("Fog preset: {}", fog.preset.name());
    }

    // G: toggle path gizmos
    if keyboard.just_pressed(KeyCode::KeyG) {
        view.debug_paths = !view.debug_paths;
    }

    // [ / ]: faster / slower loop
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        scale_loop_duration(&mut loop_settings, 0.5);
        info!("Loop duration: {:.0}s", loop_settings.period_secs);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        scale_loop_duration(&mut loop_settings, 2.0);
        info!("Loop duration: {:.0}s", loop_settings.period_secs);
    }

    // - / =: narrower / wider field of view
    if keyboard.just_pressed(KeyCode::Minus) {
        view.adjust_fov(-1.0);
    }
    if keyboard.just_pressed(KeyCode::Equal) {
        view.adjust_fov(1.0);
    }
}

/// Plugin that adds the tuning hotkeys.
///
/// # Hotkeys
/// - `P`: Cycle fog preset
/// - `G`: Toggle path gizmos
/// - `[` / `]`: Halve / double the loop duration
/// - `-` / `=`: Narrow / widen the field of view
pub struct TuningControlsPlugin;

impl Plugin for TuningControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_tuning_hotkeys);
    }
}
