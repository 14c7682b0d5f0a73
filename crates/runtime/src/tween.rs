use foundation::math::RotationState;
use foundation::time::Time;

pub trait Lerp: Copy {
    /// Value at `t` in [0, 1]. Implementations return exactly `to` at `t == 1`.
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *to;
        }
        self + (to - self) * t
    }
}

impl Lerp for RotationState {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        RotationState::lerp(self, to, t)
    }
}

/// Linear, fixed-duration interpolation between two values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Time,
    duration_ms: f64,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start: Time, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn to(&self) -> T {
        self.to
    }

    /// Normalized progress `min(1, elapsed / duration)`; monotone in `now`.
    pub fn progress(&self, now: Time) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (now.since(self.start) / self.duration_ms).min(1.0)
    }

    pub fn sample(&self, now: Time) -> T {
        self.from.lerp(&self.to, self.progress(now))
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::Tween;
    use foundation::time::Time;

    #[test]
    fn samples_linearly_and_ends_exactly() {
        let tw = Tween::new(0.0f64, 10.0, Time(100.0), 1000.0);
        assert_eq!(tw.sample(Time(50.0)), 0.0);
        assert_eq!(tw.sample(Time(100.0)), 0.0);
        assert_eq!(tw.sample(Time(600.0)), 5.0);
        assert_eq!(tw.sample(Time(1100.0)), 10.0);
        assert_eq!(tw.sample(Time(5000.0)), 10.0);
        assert!(tw.is_finished(Time(1100.0)));
        assert!(!tw.is_finished(Time(1099.0)));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let tw = Tween::new(1.0f64, 2.0, Time(0.0), 0.0);
        assert_eq!(tw.sample(Time(0.0)), 2.0);
    }
}
