//! Meridian and parallel lines for the globe grid.

use foundation::math::GeoPoint;
use scene::projection::GeoProjection;

use crate::clip::{ProjectedPath, clip_line};

const EPSILON: f64 = 1e-6;

/// A lon/lat grid with minor lines inside a latitude band and major meridians
/// running pole to pole.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Graticule {
    pub minor_step_deg: f64,
    pub major_step_deg: f64,
    /// Minor lines are limited to `[-minor_extent_deg, minor_extent_deg]` latitude.
    pub minor_extent_deg: f64,
    /// Sampling step along each line.
    pub precision_deg: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            minor_step_deg: 10.0,
            major_step_deg: 90.0,
            minor_extent_deg: 80.0,
            precision_deg: 2.5,
        }
    }
}

impl Graticule {
    /// All grid lines: major meridians, the equator, then minor meridians and
    /// parallels that do not coincide with a major line.
    pub fn lines(&self) -> Vec<Vec<GeoPoint>> {
        if !(self.minor_step_deg > 0.0 && self.major_step_deg > 0.0 && self.precision_deg > 0.0) {
            return Vec::new();
        }
        let major_lat = 90.0 - EPSILON;
        let minor_lat = self.minor_extent_deg + EPSILON;
        let major = self.major_step_deg;

        let mut out = Vec::new();
        for lon in steps(-180.0, 180.0, major) {
            out.push(self.meridian(lon, -major_lat, major_lat));
        }
        for lat in steps(-major_lat, major_lat, major) {
            out.push(self.parallel(lat, -180.0, 180.0));
        }
        for lon in steps(-180.0, 180.0, self.minor_step_deg) {
            if (lon % major).abs() > EPSILON {
                out.push(self.meridian(lon, -minor_lat, minor_lat));
            }
        }
        for lat in steps(-minor_lat, minor_lat, self.minor_step_deg) {
            if (lat % major).abs() > EPSILON {
                out.push(self.parallel(lat, -180.0, 180.0));
            }
        }
        out
    }

    fn meridian(&self, lon: f64, lat0: f64, lat1: f64) -> Vec<GeoPoint> {
        samples(lat0, lat1, self.precision_deg)
            .map(|lat| GeoPoint::new(lon, lat))
            .collect()
    }

    fn parallel(&self, lat: f64, lon0: f64, lon1: f64) -> Vec<GeoPoint> {
        samples(lon0, lon1, self.precision_deg)
            .map(|lon| GeoPoint::new(lon, lat))
            .collect()
    }
}

/// Grid lines generated once and clipped per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLayer {
    lines: Vec<Vec<GeoPoint>>,
}

impl Default for GraticuleLayer {
    fn default() -> Self {
        Self::new(Graticule::default())
    }
}

impl GraticuleLayer {
    pub fn new(graticule: Graticule) -> Self {
        Self {
            lines: graticule.lines(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All visible grid segments as one path.
    pub fn extract(&self, projection: &GeoProjection) -> ProjectedPath {
        let mut path = ProjectedPath::default();
        for line in &self.lines {
            path.push_lines(clip_line(projection, line));
        }
        path
    }
}

/// Multiples of `step` in `[start, end)`, starting at the first one `>= start`.
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (start / step).ceil() * step;
    (0..)
        .map(move |i| first + i as f64 * step)
        .take_while(move |v| *v < end)
}

/// `start, start + step, ...` below `end`, then `end` itself.
fn samples(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    (0..)
        .map(move |i| start + i as f64 * step)
        .take_while(move |v| *v < end - EPSILON)
        .chain(std::iter::once(end))
}
