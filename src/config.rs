//! TOML configuration for a fly-through.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the values it
//! overrides:
//!
//! ```toml
//! [loop]
//! duration_secs = 120.0
//! target_offset = { seconds = 7.5 }
//!
//! [fog]
//! preset = "wine"
//! color_mid = "#884455"
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::{LoopSettings, PhaseOffset};
use crate::error::{FlythroughError, Result};
use crate::fog::{FogPreset, FogSettings};
use crate::rig::{CurveSettings, FlythroughPaths, ViewSettings};
use crate::spline::{CatmullRomKind, Parameterization};

/// Top-level fly-through configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlythroughConfig {
    #[serde(rename = "loop")]
    pub looping: LoopConfig,
    pub fog: FogConfig,
    pub view: ViewConfig,
    pub paths: PathsConfig,
    pub curve: CurveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Seconds per loop.
    pub duration_secs: f64,
    /// Either `{ fraction = .. }` of the loop or `{ seconds = .. }`.
    pub target_offset: PhaseOffset,
}

impl Default for LoopConfig {
    fn default() -> Self {
        let settings = LoopSettings::default();
        Self {
            duration_secs: settings.period_secs,
            target_offset: settings.offset,
        }
    }
}

/// Fog look: a preset, optionally with individual values overridden.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub preset: FogPreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub far: Option<f32>,
    /// `#rrggbb` hex colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_near: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_far: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub fov_degrees: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub debug_paths: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let view = ViewSettings::default();
        Self {
            fov_degrees: view.fov_degrees,
            near_clip: view.near_clip,
            far_clip: view.far_clip,
            debug_paths: view.debug_paths,
        }
    }
}

/// Asset paths, relative to the Bevy asset folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub camera: String,
    pub target: String,
    /// Scenery drawn with fog. Optional: the rig works without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let paths = FlythroughPaths::default();
        Self {
            camera: paths.camera,
            target: paths.target,
            scene: Some("canyon.glb".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub kind: CatmullRomKind,
    pub parameterization: Parameterization,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            kind: CatmullRomKind::Centripetal,
            parameterization: Parameterization::ArcLength,
        }
    }
}

/// Validated configuration, ready to insert as resources.
#[derive(Debug, Clone)]
pub struct FlythroughSettings {
    pub looping: LoopSettings,
    pub fog: FogSettings,
    pub view: ViewSettings,
    pub curve: CurveSettings,
    pub paths: FlythroughPaths,
    pub scene: Option<String>,
}

impl FlythroughConfig {
    /// Parse a configuration from TOML text. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FlythroughError::ConfigParse(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the configuration as pretty-printed TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlythroughError::ConfigParse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate and convert into runtime settings.
    pub fn resolve(&self) -> Result<FlythroughSettings> {
        let period = self.looping.duration_secs;
        if !(period.is_finite() && period > 0.0) {
            return Err(FlythroughError::InvalidLoopPeriod(period));
        }

        Ok(FlythroughSettings {
            looping: LoopSettings {
                period_secs: period,
                offset: self.looping.target_offset,
            },
            fog: self.fog.resolve()?,
            view: ViewSettings {
                fov_degrees: self.view.fov_degrees,
                near_clip: self.view.near_clip,
                far_clip: self.view.far_clip,
                debug_paths: self.view.debug_paths,
            },
            curve: CurveSettings {
                kind: self.curve.kind,
                parameterization: self.curve.parameterization,
            },
            paths: FlythroughPaths {
                camera: self.paths.camera.clone(),
                target: self.paths.target.clone(),
            },
            scene: self.paths.scene.clone(),
        })
    }
}

impl FogConfig {
    fn resolve(&self) -> Result<FogSettings> {
        let mut settings = FogSettings::from_preset(self.preset);
        let params = &mut settings.params;

        if let Some(near) = self.near {
            params.near = near;
        }
        if let Some(mid) = self.mid {
            params.mid = mid;
        }
        if let Some(far) = self.far {
            params.far = far;
        }
        if let Some(hex) = &self.color_near {
            params.color_near = parse_color(hex)?;
        }
        if let Some(hex) = &self.color_mid {
            params.color_mid = parse_color(hex)?;
        }
        if let Some(hex) = &self.color_far {
            params.color_far = parse_color(hex)?;
        }

        Ok(settings)
    }
}

fn parse_color(hex: &str) -> Result<Color> {
    Srgba::hex(hex)
        .map(Color::Srgba)
        .map_err(|_| FlythroughError::InvalidColor(hex.to_string()))
}
