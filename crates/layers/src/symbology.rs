use std::fmt;

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_hex(0x000000);
    pub const WHITE: Color = Color::from_hex(0xffffff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xrrggbb`.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathStyle {
    /// `None` leaves the path unfilled.
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl PathStyle {
    pub const fn new(fill: Option<Color>, stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }

    pub const fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl MarkerStyle {
    pub const fn new(radius: f64, fill: Color, stroke: Color, stroke_width: f64) -> Self {
        Self {
            radius,
            fill,
            stroke,
            stroke_width,
        }
    }
}

/// Colors and widths for every element of a globe frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeStyle {
    pub sphere: PathStyle,
    pub graticule: PathStyle,
    pub countries: PathStyle,
    pub marker: MarkerStyle,
    pub active_marker: MarkerStyle,
}

impl GlobeStyle {
    pub fn marker_for(&self, active: bool) -> &MarkerStyle {
        if active {
            &self.active_marker
        } else {
            &self.marker
        }
    }
}

const SLATE_900: Color = Color::from_hex(0x0f172a);
const SLATE_800: Color = Color::from_hex(0x1e293b);
const SLATE_700: Color = Color::from_hex(0x334155);
const GREEN_500: Color = Color::from_hex(0x22c55e);

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            sphere: PathStyle::new(Some(SLATE_900), GREEN_500, 2.0),
            graticule: PathStyle::new(None, SLATE_800, 0.5),
            countries: PathStyle::new(Some(SLATE_800), SLATE_700, 0.5).with_opacity(0.8),
            marker: MarkerStyle::new(3.0, GREEN_500, Color::BLACK, 1.0),
            active_marker: MarkerStyle::new(6.0, Color::WHITE, Color::BLACK, 1.0),
        }
    }
}
