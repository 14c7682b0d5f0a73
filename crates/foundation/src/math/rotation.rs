use std::f64::consts::{PI, TAU};

use super::{GeoPoint, Vec3, radians_from_vector, unit_vector_from_radians};

pub const MIN_LAT_DEG: f64 = -90.0;
pub const MAX_LAT_DEG: f64 = 90.0;

/// Orientation of the globe as three Euler angles in degrees.
///
/// The point `(lon, lat)` sits at the projection center when
/// `lon_deg == -lon` and `lat_deg == -lat`.
///
/// Invariant: every angle is finite and `lat_deg` is within [-90, 90]. Every
/// constructor and mutator enforces this: latitude is clamped, and a NaN
/// angle or non-finite longitude or roll becomes 0.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RotationState {
    lon_deg: f64,
    lat_deg: f64,
    roll_deg: f64,
}

impl RotationState {
    pub fn new(lon_deg: f64, lat_deg: f64, roll_deg: f64) -> Self {
        Self {
            lon_deg: finite_or_zero(lon_deg),
            lat_deg: clamp_lat(lat_deg),
            roll_deg: finite_or_zero(roll_deg),
        }
    }

    /// Rotation that brings `point` to the projection center, keeping `roll_deg`.
    pub fn facing(point: GeoPoint, roll_deg: f64) -> Self {
        Self::new(-point.lon_deg, -point.lat_deg, roll_deg)
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon_deg
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat_deg
    }

    pub fn roll_deg(&self) -> f64 {
        self.roll_deg
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.lon_deg, self.lat_deg, self.roll_deg]
    }

    /// Adds the given angles; latitude is clamped afterwards. A non-finite
    /// longitude delta is ignored.
    pub fn offset(&mut self, d_lon_deg: f64, d_lat_deg: f64) {
        if d_lon_deg.is_finite() {
            self.lon_deg = finite_or_zero(self.lon_deg + d_lon_deg);
        }
        self.lat_deg = clamp_lat(self.lat_deg + d_lat_deg);
    }

    /// Component-wise linear interpolation. `t` is clamped to [0, 1].
    ///
    /// At `t == 0.0` this returns `self` and at `t == 1.0` exactly `target`.
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t >= 1.0 {
            return *target;
        }
        Self::new(
            lerp(self.lon_deg, target.lon_deg, t),
            lerp(self.lat_deg, target.lat_deg, t),
            lerp(self.roll_deg, target.roll_deg, t),
        )
    }

    /// The geographic point currently at the projection center.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(-self.lon_deg, -self.lat_deg)
    }

    pub fn spherical(&self) -> SphericalRotation {
        SphericalRotation::new(*self)
    }
}

fn clamp_lat(lat_deg: f64) -> f64 {
    if lat_deg.is_nan() {
        return 0.0;
    }
    lat_deg.clamp(MIN_LAT_DEG, MAX_LAT_DEG)
}

fn finite_or_zero(deg: f64) -> f64 {
    if deg.is_finite() { deg } else { 0.0 }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Precomputed rotation of the sphere.
///
/// Longitude is rotated first (about the polar axis), then latitude about the
/// y axis and roll about the x axis. `rotate` maps geographic coordinates into
/// the viewer frame where `(0, 0)` faces the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalRotation {
    d_lambda: f64,
    cos_d_phi: f64,
    sin_d_phi: f64,
    cos_d_gamma: f64,
    sin_d_gamma: f64,
}

impl SphericalRotation {
    pub fn new(state: RotationState) -> Self {
        let d_phi = state.lat_deg.to_radians();
        let d_gamma = state.roll_deg.to_radians();
        Self {
            d_lambda: state.lon_deg.to_radians(),
            cos_d_phi: d_phi.cos(),
            sin_d_phi: d_phi.sin(),
            cos_d_gamma: d_gamma.cos(),
            sin_d_gamma: d_gamma.sin(),
        }
    }

    /// Rotates `(lambda, phi)` in radians into the viewer frame.
    pub fn rotate_radians(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_pi(lambda + self.d_lambda);
        let v = unit_vector_from_radians(lambda, phi);
        let k = v.z * self.cos_d_phi + v.x * self.sin_d_phi;
        (
            (v.y * self.cos_d_gamma - k * self.sin_d_gamma)
                .atan2(v.x * self.cos_d_phi - v.z * self.sin_d_phi),
            (k * self.cos_d_gamma + v.y * self.sin_d_gamma)
                .clamp(-1.0, 1.0)
                .asin(),
        )
    }

    /// Inverse of [`SphericalRotation::rotate_radians`].
    pub fn invert_radians(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let v = unit_vector_from_radians(lambda, phi);
        let k = v.z * self.cos_d_gamma - v.y * self.sin_d_gamma;
        let lambda = (v.y * self.cos_d_gamma + v.z * self.sin_d_gamma)
            .atan2(v.x * self.cos_d_phi + k * self.sin_d_phi);
        let phi = (k * self.cos_d_phi - v.x * self.sin_d_phi)
            .clamp(-1.0, 1.0)
            .asin();
        (wrap_pi(lambda - self.d_lambda), phi)
    }

    pub fn rotate(&self, point: GeoPoint) -> GeoPoint {
        let (lambda, phi) = self.rotate_radians(point.lon_deg.to_radians(), point.lat_deg.to_radians());
        GeoPoint::new(lambda.to_degrees(), phi.to_degrees())
    }

    pub fn invert(&self, point: GeoPoint) -> GeoPoint {
        let (lambda, phi) = self.invert_radians(point.lon_deg.to_radians(), point.lat_deg.to_radians());
        GeoPoint::new(lambda.to_degrees(), phi.to_degrees())
    }

    /// Rotated unit vector of `point`. `x` points toward the viewer.
    pub fn rotate_to_vector(&self, point: GeoPoint) -> Vec3 {
        let (lambda, phi) = self.rotate_radians(point.lon_deg.to_radians(), point.lat_deg.to_radians());
        unit_vector_from_radians(lambda, phi)
    }

    /// Maps a viewer-frame vector back to geographic coordinates.
    pub fn invert_vector(&self, v: Vec3) -> GeoPoint {
        let (lambda, phi) = radians_from_vector(v);
        let (lambda, phi) = self.invert_radians(lambda, phi);
        GeoPoint::new(lambda.to_degrees(), phi.to_degrees())
    }
}

/// Wraps an angle in radians into [-PI, PI].
fn wrap_pi(a: f64) -> f64 {
    if (-PI..=PI).contains(&a) {
        return a;
    }
    (a + PI).rem_euclid(TAU) - PI
}
