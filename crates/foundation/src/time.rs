/// Timestamp in milliseconds on a caller-chosen monotonic timebase.
///
/// Nothing in the workspace reads a wall clock below the binary; every
/// time-dependent operation receives a `Time` so runs are replayable.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms)
    }

    pub fn from_secs(s: f64) -> Self {
        Time(s * 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`; never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn after(self, ms: f64) -> Time {
        Time(self.0 + ms)
    }
}
