use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FlythroughError, Result};

/// Length table samples per curve segment.
const SAMPLES_PER_SEGMENT: usize = 32;

/// Flavour of Catmull-Rom interpolation used between control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(rename_all = "snake_case")]
pub enum CatmullRomKind {
    /// Classic uniform Catmull-Rom with tension 0.5.
    /// C1 continuous in the curve parameter, may overshoot on uneven spacing.
    Uniform,
    /// Centripetal Catmull-Rom (knot spacing `|Δp|^0.5`).
    /// Never forms cusps or self-intersections within a segment. Only G1 at
    /// control points: the direction is continuous but the speed in a uniform
    /// parameter can jump, so pair it with [`Parameterization::ArcLength`]
    /// for steady motion.
    #[default]
    Centripetal,
}

impl CatmullRomKind {
    /// Get the display name for this interpolation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Centripetal => "Centripetal",
        }
    }
}

/// How the normalized curve parameter maps onto the control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(rename_all = "snake_case")]
pub enum Parameterization {
    /// Each segment gets an equal share of `[0, 1)`.
    #[default]
    Uniform,
    /// `t` is a fraction of the total arc length, giving constant speed.
    ArcLength,
}

/// A closed Catmull-Rom curve through an ordered set of control points.
///
/// The curve is immutable once built and cheap to clone: control points live
/// behind an [`Arc`], so the same curve can be read from any number of systems.
///
/// `t = 0` sits on the first control point, increasing `t` visits the points
/// in order, and `t → 1` wraps smoothly back to the first point.
#[derive(Debug, Clone)]
pub struct ClosedCurve {
    points: Arc<[Vec3]>,
    kind: CatmullRomKind,
    arc_length: Option<Arc<LengthTable>>,
}

impl ClosedCurve {
    /// Minimum number of control points for a closed curve.
    pub const MIN_POINTS: usize = 2;

    /// Build a centripetal, uniformly parameterized closed curve.
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        Self::with_kind(points, CatmullRomKind::default())
    }

    /// Build a closed curve with a specific interpolation.
    pub fn with_kind(points: Vec<Vec3>, kind: CatmullRomKind) -> Result<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(FlythroughError::InsufficientControlPoints {
                found: points.len(),
            });
        }

        Ok(Self {
            points: points.into(),
            kind,
            arc_length: None,
        })
    }

    /// Switch the parameterization, building an arc length table if needed.
    pub fn with_parameterization(mut self, parameterization: Parameterization) -> Self {
        self.arc_length = match parameterization {
            Parameterization::Uniform => None,
            Parameterization::ArcLength => {
                let samples = (self.points.len() * SAMPLES_PER_SEGMENT).max(200);
                let table = LengthTable::sample(|u| self.evaluate(u), samples);
                Some(Arc::new(table))
            }
        };
        self
    }

    /// The control points, in traversal order.
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CatmullRomKind {
        self.kind
    }

    pub fn parameterization(&self) -> Parameterization {
        if self.arc_length.is_some() {
            Parameterization::ArcLength
        } else {
            Parameterization::Uniform
        }
    }

    /// Number of segments. A closed curve has one per control point.
    pub fn segment_count(&self) -> usize {
        self.points.len()
    }

    /// Total length of the loop, if an arc length table was built.
    pub fn length(&self) -> Option<f32> {
        self.arc_length.as_ref().map(|table| table.total())
    }

    /// Evaluate the curve at `t`. Any real `t` is accepted and wrapped into `[0, 1)`.
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.evaluate(self.to_curve_param(t))
    }

    /// Unit direction of travel at `t`, or zero where the curve is stationary.
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        self.velocity(self.to_curve_param(t)).normalize_or_zero()
    }

    /// Sample the loop into `samples + 1` points, first and last coinciding.
    pub fn sample(&self, samples: usize) -> Vec<Vec3> {
        if samples == 0 {
            return vec![self.points[0]];
        }

        (0..=samples)
            .map(|i| self.position_at(i as f32 / samples as f32))
            .collect()
    }

    fn to_curve_param(&self, t: f32) -> f32 {
        let t = wrap_unit(t);
        match &self.arc_length {
            Some(table) => wrap_unit(table.param_at_fraction(t)),
            None => t,
        }
    }

    /// Evaluate in the uniform curve parameter.
    fn evaluate(&self, u: f32) -> Vec3 {
        let (segment, t) = self.locate(wrap_unit(u));
        let [c0, c1, c2, c3] = self.coefficients(segment);
        c0 + c1 * t + c2 * (t * t) + c3 * (t * t * t)
    }

    /// Derivative in the local segment parameter at uniform parameter `u`.
    fn velocity(&self, u: f32) -> Vec3 {
        let (segment, t) = self.locate(wrap_unit(u));
        let [_, c1, c2, c3] = self.coefficients(segment);
        c1 + c2 * (2.0 * t) + c3 * (3.0 * t * t)
    }

    fn locate(&self, u: f32) -> (usize, f32) {
        let n = self.points.len();
        let t_scaled = u * n as f32;
        let segment = (t_scaled.floor() as usize).min(n - 1);
        (segment, t_scaled - segment as f32)
    }

    /// Cubic coefficients `[c0, c1, c2, c3]` of one segment, in local `t`.
    fn coefficients(&self, segment: usize) -> [Vec3; 4] {
        let n = self.points.len();
        let p0 = self.points[(segment + n - 1) % n];
        let p1 = self.points[segment % n];
        let p2 = self.points[(segment + 1) % n];
        let p3 = self.points[(segment + 2) % n];

        match self.kind {
            CatmullRomKind::Uniform => uniform_coefficients(p0, p1, p2, p3),
            CatmullRomKind::Centripetal => centripetal_coefficients(p0, p1, p2, p3),
        }
    }
}

/// Reduce `t` into `[0, 1)`, wrapping negatives and values past one.
pub fn wrap_unit(t: f32) -> f32 {
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid may round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}

/// Cumulative chord lengths of a curve sampled at evenly spaced parameters.
#[derive(Debug)]
struct LengthTable {
    /// Entry `i` is the length covered between `u = 0` and `u = i / (len - 1)`.
    cumulative: Vec<f32>,
}

impl LengthTable {
    fn sample(evaluate: impl Fn(f32) -> Vec3, samples: usize) -> Self {
        let samples = samples.max(1);
        let mut cumulative = Vec::with_capacity(samples + 1);
        let mut covered = 0.0;
        let mut previous = evaluate(0.0);
        cumulative.push(covered);

        for i in 1..=samples {
            let point = evaluate(i as f32 / samples as f32);
            covered += point.distance(previous);
            cumulative.push(covered);
            previous = point;
        }

        Self { cumulative }
    }

    fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Uniform parameter at which `fraction` of the total length is covered.
    fn param_at_fraction(&self, fraction: f32) -> f32 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }

        let distance = fraction.clamp(0.0, 1.0) * total;
        let last = self.cumulative.len() - 1;
        let upper = self
            .cumulative
            .partition_point(|&covered| covered < distance)
            .clamp(1, last);

        let start = self.cumulative[upper - 1];
        let span = self.cumulative[upper] - start;
        let along = if span > 0.0 { (distance - start) / span } else { 0.0 };

        ((upper - 1) as f32 + along) / last as f32
    }
}

fn uniform_coefficients(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> [Vec3; 4] {
    [
        p1,
        0.5 * (-p0 + p2),
        0.5 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3),
        0.5 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3),
    ]
}

fn centripetal_coefficients(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> [Vec3; 4] {
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Coincident neighbours would divide by zero
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    // Tangents at p1 and p2, rescaled to the [0, 1] segment parameter
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    hermite_coefficients(p1, p2, m1, m2)
}

fn hermite_coefficients(p1: Vec3, p2: Vec3, m1: Vec3, m2: Vec3) -> [Vec3; 4] {
    [
        p1,
        m1,
        -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2,
        2.0 * p1 - 2.0 * p2 + m1 + m2,
    ]
}
