//! Cyclic mapping from wall-clock time to normalized loop parameters.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Phase offset of the look-at target relative to the camera.
///
/// Both conventions are supported because they read differently when the loop
/// period is tuned live: a `Fraction` keeps the target the same share of the
/// loop ahead, `Seconds` keeps it the same amount of time ahead.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOffset {
    /// Offset in seconds, added to the clock before wrapping.
    Seconds(f64),
    /// Offset as a fraction of the loop, added to the camera parameter.
    Fraction(f64),
}

impl Default for PhaseOffset {
    fn default() -> Self {
        Self::Fraction(0.06)
    }
}

/// Live-tunable loop timing. Read by value every tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct LoopSettings {
    /// Duration of one full loop, in seconds.
    pub period_secs: f64,
    /// How far ahead of the camera the target runs.
    pub offset: PhaseOffset,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            period_secs: 240.0,
            offset: PhaseOffset::default(),
        }
    }
}

/// The two loop parameters produced each tick, both in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct CyclicParams {
    /// Camera position parameter.
    pub primary: f64,
    /// Target position parameter.
    pub secondary: f64,
}

/// Stateless clock: every evaluation is computed from absolute time.
pub struct CyclicClock;

impl CyclicClock {
    /// Map absolute time to the camera and target parameters.
    ///
    /// A non-positive or non-finite period yields `(0, 0)`.
    pub fn evaluate(time_secs: f64, settings: &LoopSettings) -> CyclicParams {
        let period = settings.period_secs;
        if !(period.is_finite() && period > 0.0) {
            return CyclicParams::default();
        }

        let primary = wrap_unit(time_secs.rem_euclid(period) / period);
        let secondary = match settings.offset {
            PhaseOffset::Seconds(offset) => {
                wrap_unit((time_secs + offset).rem_euclid(period) / period)
            }
            PhaseOffset::Fraction(fraction) => wrap_unit(primary + fraction),
        };

        CyclicParams { primary, secondary }
    }
}

fn wrap_unit(t: f64) -> f64 {
    let wrapped = t.rem_euclid(1.0);
    if wrapped >= 1.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}
