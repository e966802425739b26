use bevy::prelude::*;

/// Three-stop distance fog: a near, mid and far band, each with a color.
///
/// Distances are expected in increasing order. Out-of-order values are not
/// rejected; they just produce hard steps instead of smooth blends.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FogParams {
    pub near: f32,
    pub mid: f32,
    pub far: f32,
    pub color_near: Color,
    pub color_mid: Color,
    pub color_far: Color,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            near: 666.0,
            mid: 3000.0,
            far: 10_000.0,
            color_near: Color::srgb_u8(0x08, 0x00, 0x41),
            color_mid: Color::srgb_u8(0xb3, 0x00, 0xb0),
            color_far: Color::srgb_u8(0xff, 0xff, 0xff),
        }
    }
}

impl FogParams {
    /// Whether `near < mid < far`.
    pub fn is_ordered(&self) -> bool {
        self.near < self.mid && self.mid < self.far
    }

    /// Fog color at a given distance from the camera.
    ///
    /// Mirrors the fragment shader exactly. The result is always opaque.
    pub fn color_at_depth(&self, depth: f32) -> LinearRgba {
        let near = self.color_near.to_linear();
        let mid = self.color_mid.to_linear();
        let far = self.color_far.to_linear();

        let color = if depth < self.mid {
            let t = smoothstep(self.near, self.mid, depth);
            lerp_rgb(near, mid, t)
        } else {
            let t = smoothstep(self.mid, self.far, depth);
            lerp_rgb(mid, far, t)
        };

        color.with_alpha(1.0)
    }

    /// Fog color of a fragment seen from `camera`.
    pub fn color_at(&self, fragment: Vec3, camera: Vec3) -> LinearRgba {
        self.color_at_depth(fragment.distance(camera))
    }
}

/// Cubic Hermite ease between `edge0` and `edge1`.
///
/// An empty or inverted range (`edge1 <= edge0`) is a hard step at `edge1`:
/// `0` below it, `1` at or above it. This keeps NaN out of the fog color.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge1 { 0.0 } else { 1.0 };
    }
    let u = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    u * u * (3.0 - 2.0 * u)
}

fn lerp_rgb(a: LinearRgba, b: LinearRgba, t: f32) -> LinearRgba {
    LinearRgba::rgb(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FogParams {
        FogParams {
            near: 100.0,
            mid: 500.0,
            far: 1000.0,
            color_near: Color::linear_rgb(1.0, 0.0, 0.0),
            color_mid: Color::linear_rgb(0.0, 1.0, 0.0),
            color_far: Color::linear_rgb(0.0, 0.0, 1.0),
        }
    }

    fn close(a: LinearRgba, b: LinearRgba) -> bool {
        (a.to_vec4() - b.to_vec4()).length() < 1e-5
    }

    #[test]
    fn test_smoothstep_shape() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((smoothstep(100.0, 500.0, 300.0) - 0.5).abs() < 1e-6);
        assert!((smoothstep(0.0, 1.0, 0.25) - 0.15625).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_degenerate_range_is_a_step() {
        assert_eq!(smoothstep(5.0, 5.0, 4.0), 0.0);
        assert_eq!(smoothstep(5.0, 5.0, 5.0), 1.0);
        assert_eq!(smoothstep(5.0, 5.0, 6.0), 1.0);
        assert_eq!(smoothstep(9.0, 5.0, 7.0), 1.0);
    }

    #[test]
    fn test_band_boundaries_hit_reference_colors() {
        let p = params();
        assert!(close(p.color_at_depth(100.0), p.color_near.to_linear()));
        assert!(close(p.color_at_depth(500.0), p.color_mid.to_linear()));
        assert!(close(p.color_at_depth(1000.0), p.color_far.to_linear()));
        assert!(close(p.color_at_depth(0.0), p.color_near.to_linear()));
        assert!(close(p.color_at_depth(50_000.0), p.color_far.to_linear()));
    }

    #[test]
    fn test_midpoint_scenario() {
        let p = params();
        let color = p.color_at_depth(300.0);
        assert!(close(color, LinearRgba::rgb(0.5, 0.5, 0.0)));
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn test_no_overshoot_between_bands() {
        let p = params();
        let mut depth = 0.0;
        while depth < 1200.0 {
            let c = p.color_at_depth(depth);
            for channel in [c.red, c.green, c.blue] {
                assert!((0.0..=1.0).contains(&channel), "channel {channel} at {depth}");
            }
            if depth < 500.0 {
                assert_eq!(c.blue, 0.0);
            } else {
                assert_eq!(c.red, 0.0);
            }
            depth += 7.5;
        }
    }

    #[test]
    fn test_blend_is_monotonic_within_band() {
        let p = params();
        let mut previous = p.color_at_depth(100.0).green;
        let mut depth = 100.0;
        while depth < 500.0 {
            let green = p.color_at_depth(depth).green;
            assert!(green >= previous - 1e-6);
            previous = green;
            depth += 5.0;
        }
    }

    #[test]
    fn test_degenerate_bands_stay_finite() {
        let p = FogParams {
            near: 500.0,
            mid: 500.0,
            far: 500.0,
            ..params()
        };
        for depth in [0.0, 499.0, 500.0, 501.0] {
            let c = p.color_at_depth(depth);
            assert!(c.to_vec4().is_finite());
        }
        assert!(close(p.color_at_depth(499.0), p.color_near.to_linear()));
        assert!(close(p.color_at_depth(500.0), p.color_far.to_linear()));
        assert!(!p.is_ordered());
    }

    #[test]
    fn test_distance_uses_euclidean_depth() {
        let p = params();
        let camera = Vec3::new(10.0, 0.0, 0.0);
        let fragment = camera + Vec3::new(0.0, 180.0, 240.0); // 300 away
        assert!(close(p.color_at(fragment, camera), p.color_at_depth(300.0)));
    }
}
