//! Foreground temperature panel.
//!
//! A second sampling loop that, unlike the overlay's, slows down while the panel is
//! hidden. The overlay deliberately does not follow this policy: it keeps sampling
//! at full rate while collapsed so expanding can show a fresh value at once.

mod view;

pub use view::ScreenView;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::info;
use tokio::sync::Mutex as AsyncMutex;

use crate::sampling::SamplingScheduler;
use crate::settings::ScreenSettings;
use crate::temperature::{format_screen, SampleValue, TemperatureSource};

pub struct TemperatureScreen {
    source: Arc<dyn TemperatureSource>,
    settings: ScreenSettings,
    visible: Arc<AtomicBool>,
    keep_screen_on: AtomicBool,
    latest: Arc<Mutex<SampleValue>>,
    scheduler: AsyncMutex<SamplingScheduler>,
}

impl TemperatureScreen {
    pub fn new(source: Arc<dyn TemperatureSource>, settings: ScreenSettings) -> Self {
        Self {
            source,
            keep_screen_on: AtomicBool::new(settings.keep_screen_on),
            settings,
            visible: Arc::new(AtomicBool::new(true)),
            latest: Arc::new(Mutex::new(None)),
            scheduler: AsyncMutex::new(SamplingScheduler::new("screen")),
        }
    }

    pub async fn start(&self) -> Result<()> {
        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_running() {
            return Ok(());
        }

        let source = self.source.clone();
        let visible = self.visible.clone();
        let latest = self.latest.clone();
        let visible_ms = self.settings.visible_interval_ms;
        let hidden_ms = self.settings.hidden_interval_ms;

        scheduler.start(
            move || source.read(),
            move || {
                if visible.load(Ordering::SeqCst) {
                    visible_ms
                } else {
                    hidden_ms
                }
            },
            move |value| {
                *latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
            },
        )
    }

    pub async fn stop(&self) -> Result<()> {
        self.scheduler.lock().await.stop().await
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Flips panel visibility and returns the new state. The polling interval follows
    /// on the next tick; the loop is not restarted.
    pub fn toggle_visibility(&self) -> bool {
        let visible = !self.visible.fetch_xor(true, Ordering::SeqCst);
        info!(
            "Temperature panel {}",
            if visible { "shown" } else { "hidden" }
        );
        visible
    }

    pub fn keep_screen_on(&self) -> bool {
        self.keep_screen_on.load(Ordering::SeqCst)
    }

    pub fn set_keep_screen_on(&self, keep_on: bool) {
        self.keep_screen_on.store(keep_on, Ordering::SeqCst);
        info!("Keep screen on {}", if keep_on { "enabled" } else { "disabled" });
    }

    pub fn latest(&self) -> SampleValue {
        *self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn temperature_text(&self) -> String {
        format_screen(self.latest())
    }

    pub fn view(&self, overlay_running: bool, permission_granted: bool) -> ScreenView {
        ScreenView::new(
            self.is_visible().then(|| self.temperature_text()),
            self.keep_screen_on(),
            overlay_running,
            permission_granted,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use tokio::time::{self, Duration};

    fn counting_source(reads: Arc<AtomicUsize>) -> Arc<dyn TemperatureSource> {
        Arc::new(move || -> SampleValue {
            reads.fetch_add(1, Ordering::SeqCst);
            Some(36.6)
        })
    }

    #[tokio::test(start_paused = true)]
    async fn polls_fast_while_visible_and_slow_while_hidden() {
        let reads = Arc::new(AtomicUsize::new(0));
        let screen =
            TemperatureScreen::new(counting_source(reads.clone()), ScreenSettings::default());
        screen.start().await.unwrap();

        // Ticks at 0, 5s, 10s.
        time::sleep(Duration::from_millis(11_000)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 3);
        assert_eq!(screen.temperature_text(), "Temperature: 36.6 °C");

        assert!(!screen.toggle_visibility());
        // 15s still fires on the old interval; the next one is 30s after it.
        time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 4);
        time::sleep(Duration::from_millis(25_000)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 4);
        time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 5);

        screen.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn starts_unavailable() {
        let source: Arc<dyn TemperatureSource> = Arc::new(|| -> SampleValue { None });
        let screen = TemperatureScreen::new(source, ScreenSettings::default());
        assert_eq!(screen.temperature_text(), "Temperature: unavailable");
        screen.start().await.unwrap();
        screen.start().await.unwrap();
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(screen.latest(), None);
        screen.stop().await.unwrap();
    }

    #[test]
    fn hidden_panel_omits_temperature() {
        let source: Arc<dyn TemperatureSource> = Arc::new(|| -> SampleValue { Some(20.0) });
        let screen = TemperatureScreen::new(source, ScreenSettings::default());
        assert!(screen.view(false, true).temperature.is_some());
        screen.toggle_visibility();
        assert!(screen.view(false, true).temperature.is_none());
    }

    #[test]
    fn keep_screen_on_follows_settings_then_toggles() {
        let settings = ScreenSettings {
            keep_screen_on: false,
            ..ScreenSettings::default()
        };
        let source: Arc<dyn TemperatureSource> = Arc::new(|| -> SampleValue { None });
        let screen = TemperatureScreen::new(source, settings);
        assert!(!screen.keep_screen_on());
        screen.set_keep_screen_on(true);
        assert!(screen.keep_screen_on());
    }
}
