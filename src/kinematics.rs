use glam::Vec2;

/// Below this length a vector has no usable direction.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Sprites are drawn pointing "up", so headings get a quarter turn added.
pub const REST_ORIENTATION_DEG: f32 = 90.0;

/// Visible surface the actors live on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Clamp a point into the interior, `inset` pixels from every edge.
    /// A viewport narrower than two insets collapses onto the inset line.
    pub fn clamp(&self, p: Vec2, inset: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(inset, (self.width - inset).max(inset)),
            p.y.clamp(inset, (self.height - inset).max(inset)),
        )
    }

    /// Uniform random point in the interior.
    pub fn random_point(&self, rng: &mut fastrand::Rng, inset: f32) -> Vec2 {
        Vec2::new(
            uniform(rng, inset, (self.width - inset).max(inset)),
            uniform(rng, inset, (self.height - inset).max(inset)),
        )
    }

    /// True once `p` is further than `margin` outside any edge.
    pub fn is_far_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.x > self.width + margin || p.y < -margin || p.y > self.height + margin
    }
}

/// Uniform sample in `[min, max)`. Degenerate ranges return `min`.
pub fn uniform(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.f32() * (max - min)
}

/// Unit vector from `from` to `to`, or zero when the points coincide.
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if !delta.is_finite() || delta.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return Vec2::ZERO;
    }
    delta.normalize_or_zero()
}

/// Move `pos` toward `target` by at most `max_step`, never overshooting.
pub fn step_toward(pos: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let dist = pos.distance(target);
    if dist <= max_step.max(0.0) {
        return target;
    }
    pos + direction(pos, target) * max_step.max(0.0)
}

/// Heading in degrees for a sprite moving along `delta`.
/// `None` when `delta` has no direction, so callers keep the old angle.
pub fn facing_degrees(delta: Vec2) -> Option<f32> {
    if !delta.is_finite() || delta.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return None;
    }
    Some(delta.y.atan2(delta.x).to_degrees() + REST_ORIENTATION_DEG)
}

/// Unit vector the sprite at `angle_deg` is facing.
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let rad = (angle_deg - REST_ORIENTATION_DEG).to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_of_coincident_points_is_zero() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(direction(p, p), Vec2::ZERO);
        assert!(direction(p, Vec2::new(f32::NAN, 0.0)).is_finite());
    }

    #[test]
    fn step_toward_stops_at_target() {
        let p = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 25.0);
        assert_eq!(p, Vec2::new(10.0, 0.0));

        let p = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        assert!((p.x - 4.0).abs() < 1e-5);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn facing_points_sprite_along_motion() {
        // Moving right: atan2 = 0, plus the rest offset.
        let a = facing_degrees(Vec2::new(1.0, 0.0)).unwrap();
        assert!((a - 90.0).abs() < 1e-4);
        assert!(facing_degrees(Vec2::ZERO).is_none());

        let v = heading_vector(a);
        assert!((v - Vec2::new(1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn viewport_clamp_handles_tiny_surfaces() {
        let vp = Viewport::new(30.0, 30.0);
        let p = vp.clamp(Vec2::new(500.0, -5.0), 20.0);
        assert_eq!(p, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn random_point_stays_inside() {
        let vp = Viewport::new(300.0, 200.0);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            let p = vp.random_point(&mut rng, 40.0);
            assert!(p.x >= 40.0 && p.x <= 260.0);
            assert!(p.y >= 40.0 && p.y <= 160.0);
        }
    }

    #[test]
    fn far_outside_uses_margin() {
        let vp = Viewport::new(100.0, 100.0);
        assert!(!vp.is_far_outside(Vec2::new(-399.0, 50.0), 400.0));
        assert!(vp.is_far_outside(Vec2::new(501.0, 50.0), 400.0));
    }
}
