use layers::clip::ProjectedPath;
use layers::stations::StationMarker;
use layers::symbology::PathStyle;
use scene::projection::ScreenPoint;
use scene::stations::StationId;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Ocean disc behind everything else.
    Sphere {
        center: ScreenPoint,
        radius: f64,
        style: PathStyle,
    },
    Graticule {
        path: ProjectedPath,
        style: PathStyle,
    },
    Country {
        id: Option<String>,
        path: ProjectedPath,
        style: PathStyle,
    },
    Marker(StationMarker),
}

/// Ordered draw commands for one frame; later commands paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = &StationMarker> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Marker(m) => Some(m),
            _ => None,
        })
    }

    pub fn marker(&self, id: &StationId) -> Option<&StationMarker> {
        self.markers().find(|m| &m.id == id)
    }

    pub fn country_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Country { .. }))
            .count()
    }
}
