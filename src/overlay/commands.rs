use std::time::{Duration, Instant};

use crate::{
    overlay::{GestureAction, OverlayController, OverlaySnapshot, PointerEvent, PointerPhase},
    screen::ScreenView,
    AppState,
};

/// Press-to-release gap for a synthesized tap; well inside the tap window.
const TAP_HOLD: Duration = Duration::from_millis(50);

fn controller_from_state(state: &AppState) -> &OverlayController {
    &state.overlay
}

pub async fn start_overlay(state: &AppState) -> Result<OverlaySnapshot, String> {
    let controller = controller_from_state(state);
    controller.activate().await.map_err(|e| e.to_string())
}

pub async fn stop_overlay(state: &AppState) -> Result<OverlaySnapshot, String> {
    let controller = controller_from_state(state);
    controller.deactivate().await;
    Ok(controller.snapshot())
}

pub fn get_overlay_state(state: &AppState) -> OverlaySnapshot {
    controller_from_state(state).snapshot()
}

/// Returns whether the capability is already granted; when it is not, the grant flow
/// is kicked off.
pub fn request_overlay_permission(state: &AppState) -> bool {
    let capability = controller_from_state(state).capability();
    if capability.is_granted() {
        return true;
    }
    capability.request_grant();
    false
}

pub async fn pointer_event(
    state: &AppState,
    phase: PointerPhase,
    x: f32,
    y: f32,
) -> Result<GestureAction, String> {
    let controller = controller_from_state(state);
    if !controller.is_active() {
        return Err("overlay is not running".to_string());
    }
    Ok(controller
        .handle_pointer(PointerEvent::new(phase, x, y, Instant::now()))
        .await)
}

/// Sends a press and a release at the same point, timestamped `TAP_HOLD` apart, so the
/// gesture machine sees a tap no matter how slowly the command arrived.
pub async fn tap(state: &AppState, x: f32, y: f32) -> Result<GestureAction, String> {
    let controller = controller_from_state(state);
    if !controller.is_active() {
        return Err("overlay is not running".to_string());
    }
    let pressed = Instant::now();
    controller
        .handle_pointer(PointerEvent::new(PointerPhase::Down, x, y, pressed))
        .await;
    Ok(controller
        .handle_pointer(PointerEvent::new(PointerPhase::Up, x, y, pressed + TAP_HOLD))
        .await)
}

pub fn get_screen_view(state: &AppState) -> ScreenView {
    let controller = controller_from_state(state);
    state
        .screen
        .view(controller.is_active(), controller.capability().is_granted())
}

pub fn toggle_temperature_visibility(state: &AppState) -> ScreenView {
    state.screen.toggle_visibility();
    get_screen_view(state)
}

pub fn set_keep_screen_on(state: &AppState, keep_on: bool) -> Result<ScreenView, String> {
    state.screen.set_keep_screen_on(keep_on);

    let mut settings = state.settings.screen();
    settings.keep_screen_on = keep_on;
    state
        .settings
        .update_screen(settings)
        .map_err(|e| e.to_string())?;

    Ok(get_screen_view(state))
}
