//! Boundary to whatever actually puts the widget on screen.
//!
//! The overlay core only ever talks to these traits; `console` provides the
//! in-process implementation used by the binary and the tests.

pub mod console;

use std::fmt;

use serde::Serialize;

use crate::error::OverlayError;
use crate::overlay::{PointerPosition, WidgetPosition};

pub use console::{ConsoleCapability, ConsoleSurface, WidgetLayout, WidgetView};

/// Opaque token for one attached widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SurfaceHandle(pub u64);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the host should draw when the widget is first attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContent {
    pub text: String,
    pub close_glyph: char,
}

impl WidgetContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            close_glyph: '✕',
        }
    }
}

pub trait DisplaySurface: Send + Sync {
    fn attach(
        &self,
        position: WidgetPosition,
        content: &WidgetContent,
    ) -> Result<SurfaceHandle, OverlayError>;

    fn update_position(
        &self,
        handle: SurfaceHandle,
        position: WidgetPosition,
    ) -> Result<(), OverlayError>;

    fn update_text(&self, handle: SurfaceHandle, text: &str) -> Result<(), OverlayError>;

    fn detach(&self, handle: SurfaceHandle) -> Result<(), OverlayError>;

    /// Whether `at` falls inside the close control's current on-screen bounds.
    /// Unknown handles never hit.
    fn hit_close_control(&self, handle: SurfaceHandle, at: PointerPosition) -> bool;
}

/// Permission to draw over other applications.
pub trait OverlayCapability: Send + Sync {
    fn is_granted(&self) -> bool;

    /// Fire-and-forget: points the user at wherever the grant is made.
    fn request_grant(&self);
}
