use std::sync::{Arc, Mutex};

use temperature_overlay_lib::{
    console::{dispatch, parse_command, run_console, Flow},
    overlay::{DisplayMode, OverlayStatus, WidgetPosition},
    settings::SettingsStore,
    temperature::SampleValue,
    AppState,
};
use tokio::time::{self, Duration};

fn app(reading: Arc<Mutex<SampleValue>>) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();
    let source = move || -> SampleValue { *reading.lock().unwrap() };
    (AppState::new(settings, Arc::new(source)), dir)
}

async fn run(state: &AppState, line: &str) -> Flow {
    dispatch(state, parse_command(line).unwrap()).await
}

fn widget_text(state: &AppState) -> String {
    let handle = state.overlay.snapshot().handle.expect("overlay active");
    state.surface.widget(handle).expect("widget attached").text
}

#[tokio::test(start_paused = true)]
async fn permission_gates_start_and_taps_drive_the_widget() {
    let reading = Arc::new(Mutex::new(Some(27.25)));
    let (state, _dir) = app(reading.clone());

    run(&state, "start").await;
    assert_eq!(state.overlay.snapshot().status, OverlayStatus::Inactive);
    assert_eq!(state.surface.attach_count(), 0);

    run(&state, "grant").await;
    run(&state, "start").await;
    time::sleep(Duration::from_millis(10)).await;
    assert_eq!(widget_text(&state), "27.3 °C");

    // Drag by (40, 25).
    run(&state, "down 60 130").await;
    run(&state, "move 100 155").await;
    run(&state, "up 100 155").await;
    assert_eq!(
        state.overlay.snapshot().position,
        Some(WidgetPosition::new(70, 145))
    );
    assert_eq!(state.overlay.snapshot().mode, Some(DisplayMode::Expanded));

    // Tap the body: collapse.
    run(&state, "down 80 150").await;
    run(&state, "up 80 150").await;
    assert_eq!(state.overlay.snapshot().mode, Some(DisplayMode::Collapsed));
    assert_eq!(widget_text(&state), "•");

    // A new reading while collapsed is sampled but not shown.
    *reading.lock().unwrap() = Some(30.0);
    time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(widget_text(&state), "•");

    // Tap again: expand and show the fresh value at once.
    run(&state, "down 80 150").await;
    run(&state, "up 80 150").await;
    assert_eq!(widget_text(&state), "30.0 °C");

    // Close strip of a widget at (70, 145) spans x in [174, 210).
    run(&state, "down 190 160").await;
    run(&state, "up 190 160").await;
    assert_eq!(state.overlay.snapshot().status, OverlayStatus::Inactive);
    assert_eq!(state.surface.detach_count(), 1);

    // Stopping again is a no-op.
    run(&state, "stop").await;
    assert_eq!(state.surface.detach_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn console_script_tears_down_on_quit() {
    let reading = Arc::new(Mutex::new(None));
    let (state, _dir) = app(reading);
    state.screen.start().await.unwrap();

    let script: &[u8] = b"grant\nstart\nbogus\nhide\nkeepon off\nstatus\nquit\nstart\n";
    run_console(&state, tokio::io::BufReader::new(script))
        .await
        .unwrap();

    assert_eq!(state.overlay.snapshot().status, OverlayStatus::Inactive);
    assert_eq!(state.surface.attach_count(), 1);
    assert_eq!(state.surface.detach_count(), 1);
    assert!(!state.screen.is_visible());
    assert!(!state.screen.keep_screen_on());
    assert!(!state.settings.screen().keep_screen_on);
}

#[tokio::test(start_paused = true)]
async fn typed_taps_collapse_and_close() {
    let reading = Arc::new(Mutex::new(Some(22.0)));
    let (state, _dir) = app(reading);
    run(&state, "grant").await;
    run(&state, "start").await;
    time::sleep(Duration::from_millis(10)).await;

    // Body of a widget at (30, 120).
    run(&state, "tap 80 130").await;
    assert_eq!(state.overlay.snapshot().mode, Some(DisplayMode::Collapsed));
    assert_eq!(widget_text(&state), "•");

    // Far longer than the tap window passes between typed lines.
    std::thread::sleep(std::time::Duration::from_millis(300));
    run(&state, "tap 80 130").await;
    assert_eq!(widget_text(&state), "22.0 °C");

    // Close strip starts at x = 134.
    let script: &[u8] = b"tap 80 130\ntap 150 130\nstatus\n";
    run_console(&state, tokio::io::BufReader::new(script))
        .await
        .unwrap();

    assert_eq!(state.overlay.snapshot().status, OverlayStatus::Inactive);
    assert_eq!(state.surface.attach_count(), 1);
    assert_eq!(state.surface.detach_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn panel_and_overlay_share_one_source() {
    let reading = Arc::new(Mutex::new(Some(19.95)));
    let (state, _dir) = app(reading);
    run(&state, "grant").await;
    run(&state, "start").await;
    state.screen.start().await.unwrap();
    time::sleep(Duration::from_millis(10)).await;

    assert_eq!(widget_text(&state), "20.0 °C");
    assert_eq!(state.screen.temperature_text(), "Temperature: 20.0 °C");

    assert_eq!(run(&state, "quit").await, Flow::Quit);
    state.overlay.deactivate().await;
    state.screen.stop().await.unwrap();
}
