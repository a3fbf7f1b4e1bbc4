use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::host::SurfaceHandle;

use super::geometry::WidgetPosition;
use super::gesture::{GestureConfig, GestureStateMachine};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    #[default]
    Expanded,
    Collapsed,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Expanded => DisplayMode::Collapsed,
            DisplayMode::Collapsed => DisplayMode::Expanded,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum OverlayStatus {
    #[default]
    Inactive,
    Active,
}

/// Everything that exists only while the widget is on screen.
#[derive(Debug)]
pub struct ActiveOverlay {
    pub handle: SurfaceHandle,
    pub position: WidgetPosition,
    pub mode: DisplayMode,
    /// Last text pushed to the surface.
    pub text: String,
    pub gestures: GestureStateMachine,
    pub active_since: DateTime<Utc>,
}

impl ActiveOverlay {
    pub fn new(
        handle: SurfaceHandle,
        position: WidgetPosition,
        text: String,
        gestures: GestureConfig,
    ) -> Self {
        Self {
            handle,
            position,
            mode: DisplayMode::Expanded,
            text,
            gestures: GestureStateMachine::new(gestures),
            active_since: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub enum OverlayState {
    #[default]
    Inactive,
    Active(ActiveOverlay),
}

impl OverlayState {
    pub fn active_mut(&mut self) -> Option<&mut ActiveOverlay> {
        match self {
            OverlayState::Active(active) => Some(active),
            OverlayState::Inactive => None,
        }
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        match self {
            OverlayState::Inactive => OverlaySnapshot::default(),
            OverlayState::Active(active) => OverlaySnapshot {
                status: OverlayStatus::Active,
                handle: Some(active.handle),
                position: Some(active.position),
                mode: Some(active.mode),
                text: Some(active.text.clone()),
                active_since: Some(active.active_since),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub status: OverlayStatus,
    pub handle: Option<SurfaceHandle>,
    pub position: Option<WidgetPosition>,
    pub mode: Option<DisplayMode>,
    pub text: Option<String>,
    pub active_since: Option<DateTime<Utc>>,
}

impl OverlaySnapshot {
    pub fn is_active(&self) -> bool {
        self.status == OverlayStatus::Active
    }
}
