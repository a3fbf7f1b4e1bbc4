use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::error::OverlayError;
use crate::overlay::{Bounds, PointerPosition, WidgetPosition};

use super::{DisplaySurface, OverlayCapability, SurfaceHandle, WidgetContent};

// Set to true to log every surface mutation
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Fixed widget geometry; the close control occupies the right-hand strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetLayout {
    pub width: i32,
    pub height: i32,
    pub close_width: i32,
}

impl Default for WidgetLayout {
    fn default() -> Self {
        Self {
            width: 140,
            height: 44,
            close_width: 36,
        }
    }
}

impl WidgetLayout {
    pub fn close_bounds(&self, position: WidgetPosition) -> Bounds {
        Bounds::new(
            position
                .x
                .saturating_add(self.width)
                .saturating_sub(self.close_width),
            position.y,
            self.close_width,
            self.height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    pub position: WidgetPosition,
    pub text: String,
}

/// In-memory display surface that logs what a real compositor would draw.
/// Holds at most one widget; a second `attach` is refused.
pub struct ConsoleSurface {
    layout: WidgetLayout,
    widgets: Mutex<HashMap<SurfaceHandle, WidgetView>>,
    next_handle: AtomicU64,
    attach_count: AtomicUsize,
    detach_count: AtomicUsize,
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new(WidgetLayout::default())
    }
}

impl ConsoleSurface {
    pub fn new(layout: WidgetLayout) -> Self {
        Self {
            layout,
            widgets: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
            attach_count: AtomicUsize::new(0),
            detach_count: AtomicUsize::new(0),
        }
    }

    pub fn widget(&self, handle: SurfaceHandle) -> Option<WidgetView> {
        self.widgets().get(&handle).cloned()
    }

    pub fn attached(&self) -> Vec<(SurfaceHandle, WidgetView)> {
        let mut widgets: Vec<_> = self
            .widgets()
            .iter()
            .map(|(handle, view)| (*handle, view.clone()))
            .collect();
        widgets.sort_by_key(|(handle, _)| handle.0);
        widgets
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }

    fn widgets(&self) -> MutexGuard<'_, HashMap<SurfaceHandle, WidgetView>> {
        self.widgets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplaySurface for ConsoleSurface {
    fn attach(
        &self,
        position: WidgetPosition,
        content: &WidgetContent,
    ) -> Result<SurfaceHandle, OverlayError> {
        let mut widgets = self.widgets();
        if let Some(existing) = widgets.keys().next() {
            log_warn!("[surface] refusing second widget while {existing} is attached");
            return Err(OverlayError::Surface(format!(
                "widget {existing} is already attached"
            )));
        }
        let handle = SurfaceHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        widgets.insert(
            handle,
            WidgetView {
                position,
                text: content.text.clone(),
            },
        );
        drop(widgets);
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        log_info!(
            "[surface] attached {handle} at ({}, {}): [{} {}]",
            position.x,
            position.y,
            content.text,
            content.close_glyph
        );
        Ok(handle)
    }

    fn update_position(
        &self,
        handle: SurfaceHandle,
        position: WidgetPosition,
    ) -> Result<(), OverlayError> {
        let mut widgets = self.widgets();
        let view = widgets
            .get_mut(&handle)
            .ok_or(OverlayError::StaleHandle(handle))?;
        view.position = position;
        log_debug!("[surface] {handle} moved to ({}, {})", position.x, position.y);
        Ok(())
    }

    fn update_text(&self, handle: SurfaceHandle, text: &str) -> Result<(), OverlayError> {
        let mut widgets = self.widgets();
        let view = widgets
            .get_mut(&handle)
            .ok_or(OverlayError::StaleHandle(handle))?;
        if view.text != text {
            log_info!("[surface] {handle} shows {text}");
        }
        view.text = text.to_string();
        Ok(())
    }

    fn detach(&self, handle: SurfaceHandle) -> Result<(), OverlayError> {
        self.widgets()
            .remove(&handle)
            .ok_or(OverlayError::StaleHandle(handle))?;
        self.detach_count.fetch_add(1, Ordering::SeqCst);
        log_info!("[surface] detached {handle}");
        Ok(())
    }

    fn hit_close_control(&self, handle: SurfaceHandle, at: PointerPosition) -> bool {
        self.widgets()
            .get(&handle)
            .map(|view| self.layout.close_bounds(view.position).contains(at))
            .unwrap_or(false)
    }
}

/// Grant flag for the console host; `grant` stands in for the user flipping the switch.
#[derive(Debug, Default)]
pub struct ConsoleCapability {
    granted: AtomicBool,
}

impl ConsoleCapability {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }

    pub fn grant(&self) {
        self.granted.store(true, Ordering::SeqCst);
        log_info!("[capability] overlay permission granted");
    }

    pub fn revoke(&self) {
        self.granted.store(false, Ordering::SeqCst);
        log_info!("[capability] overlay permission revoked");
    }
}

impl OverlayCapability for ConsoleCapability {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request_grant(&self) {
        log_info!(
            "[capability] allow \"Display over other apps\" to enable the overlay (type `grant`)"
        );
    }
}
