use super::Vec3;

/// Geographic coordinate on the unit sphere, in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Builds a point from optional coordinates.
    ///
    /// Returns `None` unless both are present and finite. Latitudes outside
    /// [-90, 90] are rejected as malformed.
    pub fn from_optional(lon_deg: Option<f64>, lat_deg: Option<f64>) -> Option<Self> {
        let (lon, lat) = (lon_deg?, lat_deg?);
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return None;
        }
        Some(Self::new(lon, lat))
    }

    /// Cartesian unit vector: x toward (0°, 0°), y toward (90°E, 0°), z toward the north pole.
    pub fn to_unit_vector(self) -> Vec3 {
        unit_vector_from_radians(self.lon_deg.to_radians(), self.lat_deg.to_radians())
    }

    /// Inverse of [`GeoPoint::to_unit_vector`]. The input does not need to be normalized.
    pub fn from_vector(v: Vec3) -> Self {
        let (lambda, phi) = radians_from_vector(v);
        Self::new(lambda.to_degrees(), phi.to_degrees())
    }
}

pub fn unit_vector_from_radians(lambda: f64, phi: f64) -> Vec3 {
    let cos_phi = phi.cos();
    Vec3::new(lambda.cos() * cos_phi, lambda.sin() * cos_phi, phi.sin())
}

pub fn radians_from_vector(v: Vec3) -> (f64, f64) {
    let v = v.normalize();
    (v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
}

/// Great-circle distance between two points, in degrees.
pub fn angular_distance_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat_deg.to_radians();
    let phi2 = b.lat_deg.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.lon_deg - a.lon_deg).to_radians();

    let s_phi = (d_phi * 0.5).sin();
    let s_lambda = (d_lambda * 0.5).sin();
    let h = s_phi * s_phi + phi1.cos() * phi2.cos() * s_lambda * s_lambda;
    (2.0 * h.sqrt().clamp(0.0, 1.0).asin()).to_degrees()
}
