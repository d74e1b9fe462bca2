//! Touch input and the gesture state machine.
//!
//! One touch sequence runs from touch-start to touch-end. A single finger
//! rotates the placed object about the vertical axis; two fingers pinch-scale
//! it. Deltas are frame-to-frame: every move replaces the stored reference
//! point, so nothing accumulates from the start of the sequence.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::debug;

use crate::camera::Point;
use crate::consts::{MIN_PINCH_DISTANCE_PX, ROTATE_PX_PER_RADIAN};
use crate::engine::Action;
use crate::scene::PlacedObject;

/// Which gesture the current touch sequence is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    #[default]
    None,
    Rotate,
    Scale,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No touch sequence in progress.
    #[default]
    Idle,
    /// One-finger tracking; a move rotates the placed object.
    Rotating {
        /// Page position of the first touch at the previous event.
        last: Point,
    },
    /// Two-finger pinch.
    Scaling {
        /// Page position of the first touch at the previous event.
        last: Point,
        /// Distance between the two touches at the previous event.
        last_distance: f64,
    },
}

impl GestureState {
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::None,
            Self::Rotating { .. } => GestureKind::Rotate,
            Self::Scaling { .. } => GestureKind::Scale,
        }
    }
}

/// Interprets touch sequences as rotate and scale gestures on the placed object.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    px_per_radian: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(ROTATE_PX_PER_RADIAN)
    }
}

impl GestureController {
    #[must_use]
    pub fn new(px_per_radian: f64) -> Self {
        Self { state: GestureState::Idle, px_per_radian }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// A finger touched down. `touches` lists every active touch.
    pub fn on_touch_start(&mut self, touches: &[Point], placed: Option<&PlacedObject>) {
        let Some(&first) = touches.first() else {
            return;
        };
        if !touches.iter().all(|p| p.is_finite()) {
            debug!(touches = touches.len(), "ignoring touch start with non-finite coordinates");
            return;
        }
        self.state = match (touches, placed) {
            ([a, b], Some(_)) => GestureState::Scaling { last: first, last_distance: a.distance(*b) },
            _ => GestureState::Rotating { last: first },
        };
        debug!(touches = touches.len(), kind = ?self.state.kind(), "touch sequence started");
    }

    /// Touches moved. Applies the gesture to `placed` and returns the update
    /// to report, if the object changed.
    pub fn on_touch_move(&mut self, touches: &[Point], placed: Option<&mut PlacedObject>) -> Option<Action> {
        let &first = touches.first()?;
        if !touches.iter().all(|p| p.is_finite()) {
            debug!(touches = touches.len(), "ignoring touch move with non-finite coordinates");
            return None;
        }
        let (last, pinch) = match self.state {
            GestureState::Idle => return None,
            GestureState::Rotating { last } => (last, None),
            GestureState::Scaling { last, last_distance } => (last, Some(last_distance)),
        };
        let delta_x = first.x - last.x;

        match (touches, pinch) {
            // Finger lifted mid-pinch: restart single-touch tracking from the remaining touch.
            ([_], Some(_)) => {
                self.state = GestureState::Rotating { last: first };
                None
            }
            ([_], None) => {
                self.state = GestureState::Rotating { last: first };
                let obj = placed?;
                #[allow(clippy::cast_possible_truncation)]
                let angle = (delta_x / self.px_per_radian) as f32;
                if !angle.is_finite() {
                    debug!(delta_x, "skipping non-finite rotation");
                    return None;
                }
                obj.transform.rotation.y += angle;
                Some(Action::ObjectTransformed { id: obj.id, transform: obj.transform })
            }
            ([a, b], Some(previous)) => {
                let current = a.distance(*b);
                self.state = GestureState::Scaling { last: first, last_distance: current };
                if previous <= MIN_PINCH_DISTANCE_PX {
                    return None;
                }
                let obj = placed?;
                #[allow(clippy::cast_possible_truncation)]
                let factor = (current / previous) as f32;
                if !factor.is_finite() || factor <= 0.0 {
                    debug!(current, previous, "skipping degenerate pinch factor");
                    return None;
                }
                obj.transform.scale_by(factor);
                Some(Action::ObjectTransformed { id: obj.id, transform: obj.transform })
            }
            _ => {
                self.state = match self.state {
                    GestureState::Scaling { last_distance, .. } => GestureState::Scaling { last: first, last_distance },
                    _ => GestureState::Rotating { last: first },
                };
                None
            }
        }
    }

    /// The touch sequence ended.
    pub fn on_touch_end(&mut self) {
        if self.state != GestureState::Idle {
            debug!(kind = ?self.state.kind(), "touch sequence ended");
        }
        self.state = GestureState::Idle;
    }
}
