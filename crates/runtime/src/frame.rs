use foundation::time::Time;

/// Interval between display refreshes at 60 Hz, in milliseconds.
pub const DISPLAY_REFRESH_MS: f64 = 1000.0 / 60.0;

/// Deterministic frame metadata.
///
/// Stands in for the display-refresh callback: drivers step frames and hand
/// `frame.time` to whatever needs sampling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (milliseconds).
    pub dt_ms: f64,
    /// Time at the start of the frame.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_ms: f64) -> Self {
        Self::starting_at(Time::ZERO, index, dt_ms)
    }

    pub fn starting_at(origin: Time, index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            dt_ms,
            time: origin.after(index as f64 * dt_ms),
        }
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            dt_ms: self.dt_ms,
            time: self.time.after(self.dt_ms),
        }
    }
}

/// Produces consecutive frames from a fixed origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameClock {
    current: Frame,
}

impl FrameClock {
    pub fn new(origin: Time, dt_ms: f64) -> Self {
        Self {
            current: Frame::starting_at(origin, 0, dt_ms),
        }
    }

    pub fn display_refresh(origin: Time) -> Self {
        Self::new(origin, DISPLAY_REFRESH_MS)
    }

    pub fn current(&self) -> Frame {
        self.current
    }

    /// Advances one frame and returns it.
    pub fn tick(&mut self) -> Frame {
        self.current = self.current.next();
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock};
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 16.0);
        let b = Frame::new(10, 16.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(160.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(0.5));
    }

    #[test]
    fn clock_ticks_from_origin() {
        let mut clock = FrameClock::new(Time(1000.0), 10.0);
        assert_eq!(clock.current().time, Time(1000.0));
        assert_eq!(clock.tick().time, Time(1010.0));
        let f2 = clock.tick();
        assert_eq!(f2.index, 2);
        assert_eq!(f2.time, Time(1020.0));
    }
}
