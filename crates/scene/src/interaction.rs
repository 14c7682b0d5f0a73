use foundation::math::Vec2;
use foundation::time::Time;
use tracing::trace;

use crate::controller::RotationController;

/// Discrete pointer input, in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Position of the previous move (or of pointer-down for the first move).
        last_pos_px: Vec2,
    },
}

/// Turns pointer gestures into rotation deltas.
///
/// `Idle -> Dragging -> Idle`. Moves while idle are ignored; a gesture only
/// ends at pointer-up.
#[derive(Debug, Default, Clone)]
pub struct InteractionBridge {
    state: DragState,
}

impl InteractionBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn on_pointer_down(&mut self, pos_px: Vec2) {
        if !pos_px.is_finite() {
            return;
        }
        trace!(x = pos_px.x, y = pos_px.y, "drag start");
        self.state = DragState::Dragging {
            last_pos_px: pos_px,
        };
    }

    /// Forwards the movement since the previous event to `controller`.
    ///
    /// Returns the `(dx, dy)` that was applied, or `None` when not dragging.
    pub fn on_pointer_move(
        &mut self,
        pos_px: Vec2,
        controller: &mut RotationController,
        scale: f64,
        now: Time,
    ) -> Option<Vec2> {
        let DragState::Dragging { last_pos_px } = self.state else {
            return None;
        };
        if !pos_px.is_finite() {
            return None;
        }

        let delta = pos_px - last_pos_px;
        self.state = DragState::Dragging {
            last_pos_px: pos_px,
        };
        controller.apply_delta(delta.x, delta.y, scale, now);
        Some(delta)
    }

    pub fn on_pointer_up(&mut self) {
        if self.is_dragging() {
            trace!("drag end");
        }
        self.state = DragState::Idle;
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        controller: &mut RotationController,
        scale: f64,
        now: Time,
    ) -> Option<Vec2> {
        match event {
            PointerEvent::Down(pos) => {
                self.on_pointer_down(pos);
                None
            }
            PointerEvent::Move(pos) => self.on_pointer_move(pos, controller, scale, now),
            PointerEvent::Up => {
                self.on_pointer_up();
                None
            }
        }
    }
}
