use foundation::math::{GeoPoint, RotationState};

use crate::projection::is_visible;
use crate::stations::{Station, StationId, StationSet};

/// A station on the hemisphere facing the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleStation<'a> {
    pub station: &'a Station,
    pub location: GeoPoint,
}

/// Stations visible under a rotation.
///
/// Derived, never mutated: recompute whenever the rotation or the station
/// set changes. Stations without a location are never included.
///
/// Ordering contract:
/// - Entries follow the iteration order of the source `StationSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleStationSet<'a> {
    entries: Vec<VisibleStation<'a>>,
}

impl<'a> VisibleStationSet<'a> {
    pub fn compute(rotation: &RotationState, stations: &'a StationSet) -> Self {
        let entries = stations
            .located()
            .filter(|(_, location)| is_visible(*location, rotation))
            .map(|(station, location)| VisibleStation { station, location })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.entries.iter().any(|e| &e.station.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisibleStation<'a>> + '_ {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::VisibleStationSet;
    use crate::stations::{Station, StationId, StationSet};
    use foundation::math::{GeoPoint, RotationState};

    fn set() -> StationSet {
        [
            Station::new("london", "London").with_location(Some(GeoPoint::new(-0.13, 51.5))),
            Station::new("sydney", "Sydney").with_location(Some(GeoPoint::new(151.2, -33.87))),
            Station::new("unknown", "No coordinates"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn front_hemisphere_only() {
        let stations = set();
        let facing_europe = RotationState::facing(GeoPoint::new(0.0, 45.0), 0.0);
        let visible = VisibleStationSet::compute(&facing_europe, &stations);
        assert!(visible.contains(&StationId::from("london")));
        assert!(!visible.contains(&StationId::from("sydney")));
        assert!(!visible.contains(&StationId::from("unknown")));

        let facing_australia = RotationState::facing(GeoPoint::new(150.0, -30.0), 0.0);
        let visible = VisibleStationSet::compute(&facing_australia, &stations);
        assert!(visible.contains(&StationId::from("sydney")));
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn recomputation_is_pure() {
        let stations = set();
        let r = RotationState::new(12.0, -7.0, 0.0);
        assert_eq!(
            VisibleStationSet::compute(&r, &stations),
            VisibleStationSet::compute(&r, &stations)
        );
    }
}
