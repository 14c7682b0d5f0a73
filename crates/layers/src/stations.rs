use scene::projection::{GeoProjection, ScreenPoint};
use scene::stations::StationId;
use scene::visibility::VisibleStationSet;

use crate::symbology::{GlobeStyle, MarkerStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct StationMarker {
    pub id: StationId,
    pub position: ScreenPoint,
    pub active: bool,
    pub style: MarkerStyle,
}

/// One circle marker per visible station.
///
/// Ordering contract:
/// - Markers follow the order of the visible set, so the active marker is
///   not moved to the top.
#[derive(Debug, Default, Copy, Clone)]
pub struct StationLayer;

impl StationLayer {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(
        &self,
        projection: &GeoProjection,
        visible: &VisibleStationSet<'_>,
        active: Option<&StationId>,
        style: &GlobeStyle,
    ) -> Vec<StationMarker> {
        visible
            .iter()
            .filter_map(|entry| {
                let position = projection.project(entry.location)?;
                let is_active = active == Some(&entry.station.id);
                Some(StationMarker {
                    id: entry.station.id.clone(),
                    position,
                    active: is_active,
                    style: *style.marker_for(is_active),
                })
            })
            .collect()
    }
}
