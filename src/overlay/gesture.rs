//! Tap-versus-drag discrimination for the floating widget.
//!
//! All pointer input for the widget arrives on its root surface. The close control
//! is never given its own listener; a tap is routed to it by hit-testing the release
//! coordinate against the control's bounds, so child elements can never swallow
//! part of a drag.

use std::time::{Duration, Instant};

use super::geometry::{PointerPosition, WidgetPosition};

/// Cumulative `|dx| + |dy|` (pixels) beyond which a press counts as a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: i32 = 8;

/// A release must come sooner than this after the press to count as a tap.
pub const DEFAULT_TAP_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pointer: PointerPosition,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: f32, y: f32, timestamp: Instant) -> Self {
        Self {
            phase,
            pointer: PointerPosition::new(x, y),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// The widget should be placed at this position.
    Moved(WidgetPosition),
    /// A short, motionless press was released.
    Tapped { hit_close_control: bool },
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    pub drag_threshold_px: i32,
    pub tap_timeout: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            tap_timeout: DEFAULT_TAP_TIMEOUT,
        }
    }
}

/// State captured on press; lives until release or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start_position: WidgetPosition,
    pub start_pointer: PointerPosition,
    pub pressed_at: Instant,
    /// Latches once the threshold is exceeded and stays set for the session.
    pub has_moved: bool,
}

#[derive(Debug, Default)]
pub struct GestureStateMachine {
    config: GestureConfig,
    session: Option<GestureSession>,
}

impl GestureStateMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Feeds one pointer event through the machine.
    ///
    /// `current` is the widget position at the time of the event; it only matters on
    /// `Down`. `hit_close_control` is consulted only when a release classifies as a tap.
    /// Events that cannot be interpreted (a `Move` or `Up` with no press) yield
    /// [`GestureAction::None`].
    pub fn on_pointer_event<F>(
        &mut self,
        event: &PointerEvent,
        current: WidgetPosition,
        hit_close_control: F,
    ) -> GestureAction
    where
        F: FnOnce(PointerPosition) -> bool,
    {
        match event.phase {
            PointerPhase::Down => {
                self.session = Some(GestureSession {
                    start_position: current,
                    start_pointer: event.pointer,
                    pressed_at: event.timestamp,
                    has_moved: false,
                });
                GestureAction::None
            }
            PointerPhase::Move => {
                let Some(session) = self.session.as_mut() else {
                    return GestureAction::None;
                };
                // `as` truncates toward zero.
                let dx = (event.pointer.x - session.start_pointer.x) as i32;
                let dy = (event.pointer.y - session.start_pointer.y) as i32;
                let travelled = dx.saturating_abs().saturating_add(dy.saturating_abs());
                if travelled > self.config.drag_threshold_px {
                    session.has_moved = true;
                }
                GestureAction::Moved(session.start_position.offset(dx, dy))
            }
            PointerPhase::Up => {
                let Some(session) = self.session.take() else {
                    return GestureAction::None;
                };
                let elapsed = event.timestamp.saturating_duration_since(session.pressed_at);
                if !session.has_moved && elapsed < self.config.tap_timeout {
                    GestureAction::Tapped {
                        hit_close_control: hit_close_control(event.pointer),
                    }
                } else {
                    GestureAction::None
                }
            }
            PointerPhase::Cancel => {
                self.session = None;
                GestureAction::None
            }
        }
    }
}
