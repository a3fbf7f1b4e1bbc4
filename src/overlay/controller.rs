use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, error, info, warn};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::OverlayError;
use crate::host::{DisplaySurface, OverlayCapability, WidgetContent};
use crate::sampling::SamplingScheduler;
use crate::settings::OverlaySettings;
use crate::temperature::{
    format_widget, SampleValue, TemperatureSource, COLLAPSED_GLYPH, WIDGET_UNAVAILABLE,
};

use super::gesture::{GestureAction, PointerEvent};
use super::state::{ActiveOverlay, DisplayMode, OverlaySnapshot, OverlayState};

/// Owns the floating widget for as long as it is on screen.
///
/// `activate` and `deactivate` are the only lifecycle entry points; host callbacks are
/// bridged onto them by the caller. Lifecycle operations serialise on the scheduler
/// lock. Render state lives behind a plain mutex shared with the sampling loop, and
/// no critical section on it awaits.
pub struct OverlayController {
    surface: Arc<dyn DisplaySurface>,
    capability: Arc<dyn OverlayCapability>,
    source: Arc<dyn TemperatureSource>,
    settings: OverlaySettings,
    state: Arc<Mutex<OverlayState>>,
    scheduler: AsyncMutex<SamplingScheduler>,
}

impl OverlayController {
    pub fn new(
        surface: Arc<dyn DisplaySurface>,
        capability: Arc<dyn OverlayCapability>,
        source: Arc<dyn TemperatureSource>,
        settings: OverlaySettings,
    ) -> Self {
        Self {
            surface,
            capability,
            source,
            settings,
            state: Arc::new(Mutex::new(OverlayState::Inactive)),
            scheduler: AsyncMutex::new(SamplingScheduler::new("overlay")),
        }
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        lock_state(&self.state).snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.snapshot().is_active()
    }

    pub fn capability(&self) -> &Arc<dyn OverlayCapability> {
        &self.capability
    }

    /// Puts the widget on screen at the default position, expanded, and starts sampling.
    /// Already active is not an error: the current snapshot is returned unchanged.
    pub async fn activate(&self) -> Result<OverlaySnapshot, OverlayError> {
        let mut scheduler = self.scheduler.lock().await;

        {
            let state = lock_state(&self.state);
            if let OverlayState::Active(active) = &*state {
                info!("Overlay already active as {}", active.handle);
                return Ok(state.snapshot());
            }
        }

        if !self.capability.is_granted() {
            warn!("Refusing to activate overlay: display capability not granted");
            return Err(OverlayError::CapabilityDenied);
        }

        let position = self.settings.default_position();
        let handle = self
            .surface
            .attach(position, &WidgetContent::new(WIDGET_UNAVAILABLE))?;

        *lock_state(&self.state) = OverlayState::Active(ActiveOverlay::new(
            handle,
            position,
            WIDGET_UNAVAILABLE.to_string(),
            self.settings.gesture_config(),
        ));

        let source = self.source.clone();
        let interval_ms = self.settings.sample_interval_ms;
        let state = self.state.clone();
        let surface = self.surface.clone();
        let started = scheduler.start(
            move || source.read(),
            // Constant cadence: the widget keeps sampling while collapsed so expanding
            // never has to wait for fresh data.
            move || interval_ms,
            move |value| apply_sample(&state, surface.as_ref(), value),
        );

        if let Err(err) = started {
            error!("Overlay sampling failed to start: {err:#}");
            self.release(true);
            return Err(err.into());
        }

        info!(
            "Overlay activated as {handle} at ({}, {})",
            position.x, position.y
        );
        Ok(self.snapshot())
    }

    /// Stops sampling and detaches the widget. Safe to call any number of times.
    pub async fn deactivate(&self) {
        let mut scheduler = self.scheduler.lock().await;
        if let Err(err) = scheduler.stop().await {
            error!("Overlay sampling did not stop cleanly: {err:#}");
        }
        if !self.release(true) {
            debug!("Overlay already inactive");
        }
    }

    /// The host tore the widget down on its own; drop our side without detaching.
    pub async fn surface_lost(&self) {
        let mut scheduler = self.scheduler.lock().await;
        if let Err(err) = scheduler.stop().await {
            error!("Overlay sampling did not stop cleanly: {err:#}");
        }
        if self.release(false) {
            warn!("Overlay surface lost; overlay is now inactive");
        }
    }

    /// Routes one pointer event through the gesture machine and applies the outcome.
    /// Returns the action the machine produced.
    pub async fn handle_pointer(&self, event: PointerEvent) -> GestureAction {
        let action = {
            let mut state = lock_state(&self.state);
            let Some(active) = state.active_mut() else {
                return GestureAction::None;
            };

            let surface = &self.surface;
            let handle = active.handle;
            let action = active
                .gestures
                .on_pointer_event(&event, active.position, |at| {
                    surface.hit_close_control(handle, at)
                });

            if let GestureAction::Moved(position) = action {
                active.position = position;
                ignore_stale(surface.update_position(handle, position));
            }
            action
        };

        match action {
            GestureAction::Tapped {
                hit_close_control: true,
            } => {
                info!("Close control tapped");
                self.deactivate().await;
            }
            GestureAction::Tapped {
                hit_close_control: false,
            } => {
                self.toggle_display_mode().await;
            }
            GestureAction::Moved(_) | GestureAction::None => {}
        }
        action
    }

    /// Flips between expanded and collapsed. Expanding samples immediately so the
    /// widget never shows a stale value. Returns the new mode, or `None` when inactive.
    pub async fn toggle_display_mode(&self) -> Option<DisplayMode> {
        let mode = {
            let mut state = lock_state(&self.state);
            let active = state.active_mut()?;
            active.mode = active.mode.toggled();
            if active.mode == DisplayMode::Collapsed {
                render(self.surface.as_ref(), active, COLLAPSED_GLYPH.to_string());
            }
            active.mode
        };

        debug!("Overlay display mode is now {mode:?}");
        if mode == DisplayMode::Expanded && !self.scheduler.lock().await.resample_now() {
            // Sampling stopped underneath us; render directly so the value is not stale.
            let value = self.source.read();
            apply_sample(&self.state, self.surface.as_ref(), value);
        }
        Some(mode)
    }

    /// Swaps the state to inactive; detaches the old widget when asked to.
    /// Returns whether anything was active.
    fn release(&self, detach: bool) -> bool {
        let previous = std::mem::take(&mut *lock_state(&self.state));
        let OverlayState::Active(active) = previous else {
            return false;
        };

        if detach {
            ignore_stale(self.surface.detach(active.handle));
            info!("Overlay {} detached", active.handle);
        }
        true
    }
}

fn apply_sample(state: &Mutex<OverlayState>, surface: &dyn DisplaySurface, value: SampleValue) {
    let mut state = lock_state(state);
    let Some(active) = state.active_mut() else {
        return;
    };
    if active.mode == DisplayMode::Expanded {
        render(surface, active, format_widget(value));
    }
}

fn render(surface: &dyn DisplaySurface, active: &mut ActiveOverlay, text: String) {
    ignore_stale(surface.update_text(active.handle, &text));
    active.text = text;
}

fn ignore_stale(result: Result<(), OverlayError>) {
    match result {
        Ok(()) => {}
        Err(OverlayError::StaleHandle(handle)) => {
            debug!("Ignoring update for stale surface handle {handle}");
        }
        Err(err) => warn!("Surface update failed: {err}"),
    }
}

fn lock_state(state: &Mutex<OverlayState>) -> MutexGuard<'_, OverlayState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
