use foundation::time::Time;

/// Trailing-edge debounce timer.
///
/// Every `trigger` pushes the deadline to `now + delay`, replacing any
/// pending fire. `poll` reports `true` exactly once when a deadline passes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<Time>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Time) {
        self.deadline = Some(now.after(self.delay_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    /// Returns `true` if the quiet period has elapsed at `now`. Disarms on fire.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use foundation::time::Time;

    #[test]
    fn fires_once_after_quiet_period() {
        let mut d = Debouncer::new(500.0);
        assert!(!d.poll(Time(10_000.0)));

        d.trigger(Time(0.0));
        assert!(!d.poll(Time(499.0)));
        assert!(d.poll(Time(500.0)));
        assert!(!d.poll(Time(501.0)));
        assert!(!d.is_pending());
    }

    #[test]
    fn retrigger_resets_deadline() {
        let mut d = Debouncer::new(500.0);
        d.trigger(Time(0.0));
        d.trigger(Time(400.0));
        assert!(!d.poll(Time(600.0)));
        assert_eq!(d.deadline(), Some(Time(900.0)));
        assert!(d.poll(Time(900.0)));
    }
}
