//! Rotation state machine for the globe.
//!
//! The controller owns the `RotationState`. Manual drag deltas apply
//! immediately; selecting a station starts a fixed-duration linear
//! transition that is advanced by `sample_frame`. A drag delta cancels any
//! transition in flight, so the two writers never interleave.
//!
//! After manual rotation settles (no delta for `quiescence_ms`) the center
//! coordinate is reported once to the registered [`LocationSink`].

use std::fmt;

use foundation::math::{GeoPoint, RotationState};
use foundation::time::Time;
use runtime::{Debouncer, EventBus, Stamped, Tween};
use tracing::debug;

use crate::config::GlobeConfig;

/// Receives the globe center after manual rotation settles.
pub trait LocationSink {
    fn location_changed(&mut self, location: GeoPoint);
}

impl<F: FnMut(GeoPoint)> LocationSink for F {
    fn location_changed(&mut self, location: GeoPoint) {
        self(location)
    }
}

/// Sink that ignores every report.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopLocationSink;

impl LocationSink for NoopLocationSink {
    fn location_changed(&mut self, _location: GeoPoint) {}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerMode {
    Idle,
    Transition,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GlobeEvent {
    TransitionStarted { target: RotationState },
    TransitionFinished { rotation: RotationState },
    TransitionCancelled { at: RotationState },
    /// A transition was requested for a target without usable coordinates.
    TransitionRejected,
    LocationSettled { center: GeoPoint },
}

pub struct RotationController {
    config: GlobeConfig,
    rotation: RotationState,
    transition: Option<Tween<RotationState>>,
    quiescence: Debouncer,
    sink: Box<dyn LocationSink>,
    events: EventBus<GlobeEvent>,
}

impl fmt::Debug for RotationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationController")
            .field("config", &self.config)
            .field("rotation", &self.rotation)
            .field("transition", &self.transition)
            .field("quiescence", &self.quiescence)
            .finish_non_exhaustive()
    }
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(GlobeConfig::default())
    }
}

impl RotationController {
    pub fn new(config: GlobeConfig) -> Self {
        Self::with_rotation(config, RotationState::default())
    }

    pub fn with_rotation(config: GlobeConfig, rotation: RotationState) -> Self {
        Self {
            config,
            rotation,
            transition: None,
            quiescence: Debouncer::new(config.quiescence_ms),
            sink: Box::new(NoopLocationSink),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn mode(&self) -> ControllerMode {
        if self.transition.is_some() {
            ControllerMode::Transition
        } else {
            ControllerMode::Idle
        }
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the driver should keep scheduling frames (transition or pending report).
    pub fn needs_frame(&self) -> bool {
        self.transition.is_some() || self.quiescence.is_pending()
    }

    /// Geographic point at the projection center.
    pub fn center(&self) -> GeoPoint {
        self.rotation.center()
    }

    /// Registers the sink for settled-location reports, replacing any previous one.
    pub fn on_quiescence(&mut self, sink: impl LocationSink + 'static) {
        self.sink = Box::new(sink);
    }

    /// Applies a pointer movement of `(dx, dy)` pixels at projection `scale`.
    ///
    /// Cancels an in-flight transition and restarts the quiescence timer.
    pub fn apply_delta(&mut self, dx: f64, dy: f64, scale: f64, now: Time) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        if self.transition.take().is_some() {
            debug!(rotation = ?self.rotation.as_array(), "transition cancelled by drag");
            self.events
                .emit(now, GlobeEvent::TransitionCancelled { at: self.rotation });
        }

        let k = self.config.drag_factor(scale);
        self.rotation.offset(dx * k, -dy * k);
        self.quiescence.trigger(now);
    }

    /// Starts an animated transition that brings `target` to the center.
    ///
    /// Returns `false` and leaves the state untouched when `target` is `None`
    /// or has a non-finite coordinate. Roll is preserved.
    pub fn start_transition(&mut self, target: Option<GeoPoint>, now: Time) -> bool {
        let Some(target) = target.filter(|p| p.lon_deg.is_finite() && p.lat_deg.is_finite())
        else {
            debug!("transition rejected: target has no usable coordinates");
            self.events.emit(now, GlobeEvent::TransitionRejected);
            return false;
        };

        let to = RotationState::facing(target, self.rotation.roll_deg());
        debug!(
            from = ?self.rotation.as_array(),
            to = ?to.as_array(),
            duration_ms = self.config.transition_ms,
            "transition started"
        );
        self.transition = Some(Tween::new(self.rotation, to, now, self.config.transition_ms));
        self.events
            .emit(now, GlobeEvent::TransitionStarted { target: to });
        true
    }

    /// Target of the in-flight transition, if any.
    pub fn transition_target(&self) -> Option<RotationState> {
        self.transition.map(|t| t.to())
    }

    /// Advances time to `now`: samples the transition and fires a due location report.
    ///
    /// Call once per display refresh. Returns the rotation to render.
    pub fn sample_frame(&mut self, now: Time) -> RotationState {
        if let Some(tween) = self.transition {
            if tween.is_finished(now) {
                self.rotation = tween.to();
                self.transition = None;
                debug!(rotation = ?self.rotation.as_array(), "transition finished");
                self.events.emit(
                    now,
                    GlobeEvent::TransitionFinished {
                        rotation: self.rotation,
                    },
                );
            } else {
                self.rotation = tween.sample(now);
            }
        }

        if self.quiescence.poll(now) {
            let center = self.center();
            debug!(lat = center.lat_deg, lon = center.lon_deg, "rotation settled");
            self.events.emit(now, GlobeEvent::LocationSettled { center });
            self.sink.location_changed(center);
        }

        self.rotation
    }

    pub fn events(&self) -> &[Stamped<GlobeEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<GlobeEvent>> {
        self.events.drain()
    }
}
