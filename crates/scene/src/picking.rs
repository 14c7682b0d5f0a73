use foundation::math::Vec2;

use crate::projection::GeoProjection;
use crate::stations::{Station, StationSet};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit<'a> {
    pub station: &'a Station,
    pub screen: Vec2,
    /// Distance from the query point, in pixels.
    pub distance_px: f64,
}

/// Nearest visible station marker within `radius_px` of `screen`.
///
/// Ordering contract:
/// - The closest marker wins.
/// - On equal distance, the station that comes first in the set wins.
pub fn pick_station<'a>(
    projection: &GeoProjection,
    stations: &'a StationSet,
    screen: Vec2,
    radius_px: f64,
) -> Option<PickHit<'a>> {
    let mut best: Option<PickHit<'a>> = None;
    for (station, location) in stations.located() {
        if !projection.is_visible(location) {
            continue;
        }
        let Some(p) = projection.project(location) else {
            continue;
        };
        let distance_px = p.distance(screen);
        if distance_px > radius_px {
            continue;
        }
        if best.is_none_or(|b| distance_px < b.distance_px) {
            best = Some(PickHit {
                station,
                screen: p,
                distance_px,
            });
        }
    }
    best
}
