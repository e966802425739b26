use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::FogParams;

/// Built-in fog looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FogPreset {
    /// Deep blue through magenta to white.
    #[default]
    Default,
    /// Dark with a pale yellow glow in the middle distance.
    Nightlight,
    /// Dark with a muted red middle band.
    Wine,
}

impl FogPreset {
    pub const ALL: [FogPreset; 3] = [Self::Default, Self::Nightlight, Self::Wine];

    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Nightlight,
            Self::Nightlight => Self::Wine,
            Self::Wine => Self::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Nightlight => "nightlight",
            Self::Wine => "wine",
        }
    }

    /// Overwrite the colors and distances of `params` with this preset.
    pub fn apply(self, params: &mut FogParams) {
        match self {
            Self::Default => *params = FogParams::default(),
            Self::Nightlight => {
                params.color_near = Color::srgb_u8(0x06, 0x04, 0x15);
                params.color_mid = Color::srgb_u8(0xfd, 0xff, 0xa3);
                params.color_far = Color::srgb_u8(0x0d, 0x0a, 0x0f);
                dark_fog(params);
            }
            Self::Wine => {
                params.color_near = Color::srgb_u8(0x05, 0x03, 0x15);
                params.color_mid = Color::srgb_u8(0x5d, 0x32, 0x43);
                params.color_far = Color::srgb_u8(0x0d, 0x09, 0x0f);
                dark_fog(params);
            }
        }
    }

    /// The fog parameters of this preset.
    pub fn params(self) -> FogParams {
        let mut params = FogParams::default();
        self.apply(&mut params);
        params
    }
}

/// Shorter bands shared by the dark presets.
fn dark_fog(params: &mut FogParams) {
    params.near = 1000.0;
    params.mid = 5500.0;
    params.far = 8000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_ordered() {
        for preset in FogPreset::ALL {
            assert!(preset.params().is_ordered(), "{}", preset.name());
        }
    }

    #[test]
    fn test_cycle_visits_every_preset() {
        let mut preset = FogPreset::Default;
        for _ in 0..FogPreset::ALL.len() {
            preset = preset.next();
        }
        assert_eq!(preset, FogPreset::Default);
    }

    #[test]
    fn test_dark_presets_share_distances() {
        let night = FogPreset::Nightlight.params();
        let wine = FogPreset::Wine.params();
        assert_eq!((night.near, night.mid, night.far), (1000.0, 5500.0, 8000.0));
        assert_eq!((wine.near, wine.mid, wine.far), (night.near, night.mid, night.far));
        assert_ne!(night.color_mid, wine.color_mid);
    }
}
