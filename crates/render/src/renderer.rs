use foundation::math::RotationState;
use formats::vector_chunk::VectorChunk;
use layers::boundaries::BoundaryLayer;
use layers::graticule::GraticuleLayer;
use layers::stations::StationLayer;
use layers::symbology::GlobeStyle;
use scene::config::DEFAULT_SCALE_DIVISOR;
use scene::projection::ProjectionConfig;
use scene::stations::{StationId, StationSet};
use scene::visibility::VisibleStationSet;

use crate::draw::{DrawCommand, DrawList};

/// Output surface size in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// `scale = min(width, height) / scale_divisor`.
    pub scale_divisor: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale_divisor: DEFAULT_SCALE_DIVISOR,
        }
    }

    pub fn with_scale_divisor(self, scale_divisor: f64) -> Self {
        Self {
            scale_divisor,
            ..self
        }
    }

    pub fn projection_config(&self, rotation: RotationState) -> ProjectionConfig {
        ProjectionConfig::fit_with_divisor(self.width, self.height, self.scale_divisor, rotation)
    }
}

/// Builds the draw list for a frame.
///
/// Rendering is a pure function of its inputs: the same boundaries,
/// rotation, stations, active id, viewport and style always produce the same
/// list. Order is sphere, graticule, countries, then markers.
#[derive(Debug, Clone, Default)]
pub struct GlobeRenderer {
    graticule: GraticuleLayer,
    boundaries: BoundaryLayer,
    stations: StationLayer,
}

impl GlobeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &self,
        boundaries: &VectorChunk,
        rotation: RotationState,
        stations: &StationSet,
        active: Option<&StationId>,
        viewport: Viewport,
        style: &GlobeStyle,
    ) -> DrawList {
        let config = viewport.projection_config(rotation);
        let projection = config.projection();
        let mut list = DrawList::new(viewport.width, viewport.height);

        list.push(DrawCommand::Sphere {
            center: config.center(),
            radius: config.scale,
            style: style.sphere,
        });

        let graticule = self.graticule.extract(&projection);
        if !graticule.is_empty() {
            list.push(DrawCommand::Graticule {
                path: graticule,
                style: style.graticule,
            });
        }

        for feature in self.boundaries.extract(&projection, boundaries) {
            list.push(DrawCommand::Country {
                id: feature.id,
                path: feature.path,
                style: style.countries,
            });
        }

        let visible = VisibleStationSet::compute(&rotation, stations);
        for marker in self.stations.extract(&projection, &visible, active, style) {
            list.push(DrawCommand::Marker(marker));
        }

        list
    }
}
