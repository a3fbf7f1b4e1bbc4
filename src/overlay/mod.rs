pub mod commands;
pub mod controller;
pub mod geometry;
pub mod gesture;
pub mod state;

pub use controller::OverlayController;
pub use geometry::{Bounds, PointerPosition, WidgetPosition};
pub use gesture::{
    GestureAction, GestureConfig, GestureSession, GestureStateMachine, PointerEvent, PointerPhase,
};
pub use state::{DisplayMode, OverlaySnapshot, OverlayState, OverlayStatus};
