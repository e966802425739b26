mod curve;
mod extract;

pub use curve::*;
pub use extract::*;

use crate::error::Result;

use bevy::prelude::*;

/// Extract a path from a flat coordinate buffer and build its closed curve.
pub fn build_curve(
    buffer: Option<&[f32]>,
    world: &Mat4,
    kind: CatmullRomKind,
    parameterization: Parameterization,
) -> Result<ClosedCurve> {
    let points = extract_points(buffer, world)?;
    Ok(ClosedCurve::with_kind(points, kind)?.with_parameterization(parameterization))
}
