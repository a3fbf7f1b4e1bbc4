pub mod console;
pub mod error;
pub mod host;
pub mod overlay;
pub mod sampling;
pub mod screen;
pub mod settings;
pub mod temperature;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use host::{ConsoleCapability, ConsoleSurface, OverlayCapability};
use log::{info, warn};
use overlay::OverlayController;
use screen::TemperatureScreen;
use settings::SettingsStore;
use temperature::TemperatureSource;

pub use error::OverlayError;

pub struct AppState {
    pub overlay: OverlayController,
    pub screen: TemperatureScreen,
    pub settings: SettingsStore,
    pub capability: Arc<ConsoleCapability>,
    pub surface: Arc<ConsoleSurface>,
}

impl AppState {
    /// Wires both sampling instantiations to one source and the console host.
    pub fn new(settings: SettingsStore, source: Arc<dyn TemperatureSource>) -> Self {
        let snapshot = settings.snapshot();
        let surface = Arc::new(ConsoleSurface::default());
        let capability = Arc::new(ConsoleCapability::new(snapshot.overlay_permission_granted));

        let overlay = OverlayController::new(
            surface.clone(),
            capability.clone(),
            source.clone(),
            snapshot.overlay,
        );
        let screen = TemperatureScreen::new(source, snapshot.screen);

        Self {
            overlay,
            screen,
            settings,
            capability,
            surface,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Temperature overlay starting up...");

    let settings = SettingsStore::from_env()?;
    let source = temperature::source_from_settings(&settings.source());
    let state = AppState::new(settings, source);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        state.screen.start().await?;
        if !state.capability.is_granted() {
            warn!("Overlay permission not granted yet; `grant` to allow it");
        }

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        console::run_console(&state, stdin).await
    })
}
