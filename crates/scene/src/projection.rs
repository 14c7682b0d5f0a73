use foundation::math::{GeoPoint, RotationState, SphericalRotation, Vec2, Vec3};

use crate::config::DEFAULT_SCALE_DIVISOR;

/// Angular radius of the visible hemisphere, in degrees.
pub const CLIP_ANGLE_DEG: f64 = 90.0;

/// Slack added to the clip angle so points exactly on the horizon stay visible.
const CLIP_EPSILON_RAD: f64 = 1e-6;

pub type ScreenPoint = Vec2;

/// Cosine of the clip radius. A rotated unit vector is on the visible side iff its
/// `x` component (the one facing the viewer) is greater than this.
pub fn clip_cos() -> f64 {
    (CLIP_ANGLE_DEG.to_radians() + CLIP_EPSILON_RAD).cos()
}

/// Viewport and orientation of a single render frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub width: f64,
    pub height: f64,
    /// Sphere radius in pixels.
    pub scale: f64,
    pub rotation: RotationState,
}

impl ProjectionConfig {
    pub fn new(width: f64, height: f64, scale: f64, rotation: RotationState) -> Self {
        Self {
            width,
            height,
            scale,
            rotation,
        }
    }

    /// Fits the sphere into the viewport with the default margin.
    pub fn fit(width: f64, height: f64, rotation: RotationState) -> Self {
        Self::fit_with_divisor(width, height, DEFAULT_SCALE_DIVISOR, rotation)
    }

    pub fn fit_with_divisor(width: f64, height: f64, divisor: f64, rotation: RotationState) -> Self {
        let scale = width.min(height) / divisor;
        Self::new(width, height, scale, rotation)
    }

    /// Screen position of the projection center.
    pub fn center(&self) -> ScreenPoint {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn with_rotation(self, rotation: RotationState) -> Self {
        Self { rotation, ..self }
    }

    pub fn projection(&self) -> GeoProjection {
        GeoProjection::new(self)
    }
}

/// Orthographic projection with a precomputed rotation.
///
/// `project` and `is_visible` share the same rotated coordinates, and the
/// clipper in the layers crate uses `is_visible_vector`, so a point has a
/// marker exactly when paths through it are drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoProjection {
    rotation: SphericalRotation,
    scale: f64,
    center: Vec2,
    clip_cos: f64,
}

impl GeoProjection {
    pub fn new(config: &ProjectionConfig) -> Self {
        Self {
            rotation: config.rotation.spherical(),
            scale: config.scale,
            center: config.center(),
            clip_cos: clip_cos(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> ScreenPoint {
        self.center
    }

    pub fn rotation(&self) -> &SphericalRotation {
        &self.rotation
    }

    /// Projects `point` to screen coordinates without clipping.
    ///
    /// Returns `None` for degenerate input or output (non-finite values);
    /// callers treat that as "do not draw".
    pub fn project(&self, point: GeoPoint) -> Option<ScreenPoint> {
        if !point.lon_deg.is_finite() || !point.lat_deg.is_finite() {
            return None;
        }
        self.project_vector(self.rotation.rotate_to_vector(point))
    }

    /// Projects a viewer-frame vector (`x` toward the viewer, `y` right, `z` up).
    pub fn project_vector(&self, v: Vec3) -> Option<ScreenPoint> {
        let p = Vec2::new(
            self.center.x + v.y * self.scale,
            self.center.y - v.z * self.scale,
        );
        p.is_finite().then_some(p)
    }

    pub fn is_visible(&self, point: GeoPoint) -> bool {
        if !point.lon_deg.is_finite() || !point.lat_deg.is_finite() {
            return false;
        }
        self.is_visible_vector(self.rotation.rotate_to_vector(point))
    }

    pub fn is_visible_vector(&self, v: Vec3) -> bool {
        v.x > self.clip_cos
    }

    pub fn clip_cos(&self) -> f64 {
        self.clip_cos
    }

    /// Geographic point under `screen`, or `None` outside the sphere's disc.
    pub fn invert(&self, screen: ScreenPoint) -> Option<GeoPoint> {
        if !screen.is_finite() || self.scale <= 0.0 {
            return None;
        }
        let x = (screen.x - self.center.x) / self.scale;
        let y = (self.center.y - screen.y) / self.scale;
        let r2 = x * x + y * y;
        if r2 > 1.0 {
            return None;
        }
        let depth = (1.0 - r2).sqrt();
        Some(self.rotation.invert_vector(Vec3::new(depth, x, y)))
    }
}

/// Projects `point` for the given frame. See [`GeoProjection::project`].
pub fn project(point: GeoPoint, config: &ProjectionConfig) -> Option<ScreenPoint> {
    config.projection().project(point)
}

/// Whether `point` lies on the hemisphere facing the viewer under `rotation`.
pub fn is_visible(point: GeoPoint, rotation: &RotationState) -> bool {
    if !point.lon_deg.is_finite() || !point.lat_deg.is_finite() {
        return false;
    }
    rotation.spherical().rotate_to_vector(point).x > clip_cos()
}

#[cfg(test)]
mod tests {
    use super::{ProjectionConfig, is_visible, project};
    use foundation::math::{GeoPoint, RotationState, angular_distance_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn frame(rotation: RotationState) -> ProjectionConfig {
        ProjectionConfig::fit(800.0, 600.0, rotation)
    }

    #[test]
    fn fit_uses_smaller_dimension() {
        let cfg = frame(RotationState::default());
        assert_close(cfg.scale, 600.0 / 2.2, 1e-12);
        assert_eq!(cfg.center().x, 400.0);
        assert_eq!(cfg.center().y, 300.0);
    }

    #[test]
    fn origin_projects_to_center_without_rotation() {
        let cfg = frame(RotationState::default());
        let p = project(GeoPoint::new(0.0, 0.0), &cfg).expect("drawable");
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0, 1e-9);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let cfg = frame(RotationState::default());
        let east = project(GeoPoint::new(90.0, 0.0), &cfg).expect("drawable");
        assert_close(east.x, 400.0 + cfg.scale, 1e-9);
        let north = project(GeoPoint::new(0.0, 90.0), &cfg).expect("drawable");
        assert_close(north.y, 300.0 - cfg.scale, 1e-9);
    }

    #[test]
    fn facing_rotation_centers_the_point() {
        let paris = GeoPoint::new(2.35, 48.86);
        let cfg = frame(RotationState::facing(paris, 0.0));
        let p = project(paris, &cfg).expect("drawable");
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0, 1e-9);
    }

    #[test]
    fn non_finite_points_are_not_drawable() {
        let cfg = frame(RotationState::default());
        assert_eq!(project(GeoPoint::new(f64::NAN, 0.0), &cfg), None);
        assert!(!is_visible(GeoPoint::new(0.0, f64::INFINITY), &RotationState::default()));
    }

    #[test]
    fn visibility_matches_angular_distance() {
        let rotation = RotationState::new(-30.0, 20.0, 0.0);
        let center = rotation.center();
        for lon in (-180..180).step_by(15) {
            for lat in (-75..=75).step_by(15) {
                let p = GeoPoint::new(lon as f64, lat as f64);
                let d = angular_distance_deg(center, p);
                if (d - 90.0).abs() < 1e-3 {
                    continue;
                }
                assert_eq!(is_visible(p, &rotation), d < 90.0, "point {p:?} at {d}°");
            }
        }
    }

    #[test]
    fn horizon_point_is_visible_antipode_is_not() {
        let rotation = RotationState::default();
        assert!(is_visible(GeoPoint::new(90.0, 0.0), &rotation));
        assert!(is_visible(GeoPoint::new(0.0, 90.0), &rotation));
        assert!(!is_visible(GeoPoint::new(180.0, 0.0), &rotation));
        assert!(!is_visible(GeoPoint::new(90.01, 0.0), &rotation));
    }

    #[test]
    fn invert_round_trips_inside_disc() {
        let cfg = frame(RotationState::new(-100.0, -40.0, 10.0));
        let proj = cfg.projection();
        let p = GeoPoint::new(95.0, 30.0);
        assert!(proj.is_visible(p));
        let screen = proj.project(p).expect("drawable");
        let back = proj.invert(screen).expect("inside disc");
        assert_close(back.lon_deg, p.lon_deg, 1e-6);
        assert_close(back.lat_deg, p.lat_deg, 1e-6);
    }

    #[test]
    fn invert_outside_disc_is_none() {
        let cfg = frame(RotationState::default());
        let proj = cfg.projection();
        assert_eq!(proj.invert(foundation::math::Vec2::new(0.0, 0.0)), None);
    }
}
