use foundation::time::Time;

/// An event stamped with the time it was emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub time: Time,
    pub event: E,
}

/// Append-only event log for traceability.
///
/// Producers emit typed events; drivers drain them once per frame.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, time: Time, event: E) {
        self.events.push(Stamped { time, event });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}
