//! The globe widget: rotation controller, pointer bridge and renderer wired
//! to one station set and one set of boundaries.

use foundation::math::{GeoPoint, RotationState, Vec2};
use foundation::time::Time;
use formats::vector_chunk::VectorChunk;
use layers::symbology::GlobeStyle;
use runtime::Stamped;
use scene::config::GlobeConfig;
use scene::controller::{GlobeEvent, LocationSink, RotationController};
use scene::interaction::{InteractionBridge, PointerEvent};
use scene::picking::pick_station;
use scene::projection::{GeoProjection, ScreenPoint};
use scene::stations::{Station, StationId, StationSet};
use tracing::debug;

use crate::draw::DrawList;
use crate::renderer::{GlobeRenderer, Viewport};

#[derive(Debug)]
pub struct Globe {
    viewport: Viewport,
    style: GlobeStyle,
    controller: RotationController,
    bridge: InteractionBridge,
    renderer: GlobeRenderer,
    stations: StationSet,
    boundaries: VectorChunk,
    active: Option<StationId>,
}

impl Globe {
    pub fn new(config: GlobeConfig, width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height).with_scale_divisor(config.scale_divisor),
            style: GlobeStyle::default(),
            controller: RotationController::new(config),
            bridge: InteractionBridge::new(),
            renderer: GlobeRenderer::new(),
            stations: StationSet::new(),
            boundaries: VectorChunk::default(),
            active: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn controller(&self) -> &RotationController {
        &self.controller
    }

    pub fn rotation(&self) -> RotationState {
        self.controller.rotation()
    }

    pub fn set_stations(&mut self, stations: StationSet) {
        self.stations = stations;
    }

    pub fn stations(&self) -> &StationSet {
        &self.stations
    }

    pub fn set_boundaries(&mut self, boundaries: VectorChunk) {
        self.boundaries = boundaries;
    }

    pub fn boundaries(&self) -> &VectorChunk {
        &self.boundaries
    }

    pub fn active_station(&self) -> Option<&StationId> {
        self.active.as_ref()
    }

    /// Marks `id` as active and rotates it to the center.
    ///
    /// Returns whether a transition started. Clearing the selection, or
    /// selecting a station without coordinates, changes the highlight only.
    pub fn set_active_station(&mut self, id: Option<StationId>, now: Time) -> bool {
        self.active = id;
        let Some(id) = &self.active else {
            return false;
        };
        let target = self.stations.get(id).and_then(|s| s.location);
        debug!(station = %id, has_location = target.is_some(), "active station changed");
        self.controller.start_transition(target, now)
    }

    /// Registers the sink for the settled center after manual rotation.
    pub fn on_location_changed(&mut self, sink: impl LocationSink + 'static) {
        self.controller.on_quiescence(sink);
    }

    pub fn pointer(&mut self, event: PointerEvent, now: Time) -> Option<Vec2> {
        let scale = self.projection().scale();
        self.bridge.handle(event, &mut self.controller, scale, now)
    }

    pub fn is_dragging(&self) -> bool {
        self.bridge.is_dragging()
    }

    pub fn needs_frame(&self) -> bool {
        self.controller.needs_frame()
    }

    /// Advances animation and quiescence timers to `now`.
    ///
    /// Returns every event emitted since the previous frame, including those
    /// from selection and pointer input; the controller keeps none of them.
    pub fn sample_frame(&mut self, now: Time) -> Vec<Stamped<GlobeEvent>> {
        self.controller.sample_frame(now);
        self.controller.drain_events()
    }

    pub fn projection(&self) -> GeoProjection {
        self.viewport
            .projection_config(self.controller.rotation())
            .projection()
    }

    pub fn render(&self) -> DrawList {
        self.renderer.render(
            &self.boundaries,
            self.controller.rotation(),
            &self.stations,
            self.active.as_ref(),
            self.viewport,
            &self.style,
        )
    }

    pub fn center(&self) -> GeoPoint {
        self.controller.center()
    }

    /// Center read-out, e.g. `LAT: 35.68 LON: 139.69`.
    pub fn center_label(&self) -> String {
        let center = self.center();
        format!("LAT: {:.2} LON: {:.2}", center.lat_deg, center.lon_deg)
    }

    /// Geographic point under `screen`, if it is on the sphere.
    pub fn geo_at(&self, screen: ScreenPoint) -> Option<GeoPoint> {
        self.projection().invert(screen)
    }

    /// Nearest visible station whose marker is under `screen`.
    pub fn pick_station(&self, screen: ScreenPoint) -> Option<&Station> {
        let radius = self.style.active_marker.radius.max(self.style.marker.radius);
        pick_station(&self.projection(), &self.stations, screen, radius).map(|hit| hit.station)
    }
}
