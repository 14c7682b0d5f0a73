/// Scale divisor used when fitting the sphere to a viewport: `scale = min(w, h) / divisor`.
pub const DEFAULT_SCALE_DIVISOR: f64 = 2.2;

/// Tuning for globe interaction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeConfig {
    /// Drag sensitivity in degrees per pixel at unit scale.
    pub sensitivity: f64,
    /// Extra multiplier on drag deltas.
    pub drag_gain: f64,
    /// Duration of the animated transition toward a selected station.
    pub transition_ms: f64,
    /// Quiet period after the last drag before the center is reported.
    pub quiescence_ms: f64,
    pub scale_divisor: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            sensitivity: 75.0,
            drag_gain: 2.0,
            transition_ms: 1000.0,
            quiescence_ms: 500.0,
            scale_divisor: DEFAULT_SCALE_DIVISOR,
        }
    }
}

impl GlobeConfig {
    /// Degrees of rotation per pixel of pointer movement at the given projection scale.
    pub fn drag_factor(&self, scale: f64) -> f64 {
        if !scale.is_finite() || scale <= 0.0 {
            return 0.0;
        }
        self.sensitivity * self.drag_gain / scale
    }
}
