mod battery;
mod sensors;

pub use battery::BatteryTemperatureSource;
pub use sensors::SensorTemperatureSource;

use std::sync::Arc;

use crate::settings::{SourceKind, SourceSettings};

/// A Celsius reading, or `None` when the device did not report one.
pub type SampleValue = Option<f32>;

/// Widget text while no reading is available.
pub const WIDGET_UNAVAILABLE: &str = "--.- °C";

/// Widget text while collapsed.
pub const COLLAPSED_GLYPH: &str = "•";

pub const SCREEN_UNAVAILABLE: &str = "Temperature: unavailable";

/// Source of temperature readings. Reads are expected to be fast and side-effect free.
pub trait TemperatureSource: Send + Sync {
    fn read(&self) -> SampleValue;
}

impl<F> TemperatureSource for F
where
    F: Fn() -> SampleValue + Send + Sync,
{
    fn read(&self) -> SampleValue {
        self()
    }
}

pub fn source_from_settings(settings: &SourceSettings) -> Arc<dyn TemperatureSource> {
    match settings.kind {
        SourceKind::Battery => Arc::new(BatteryTemperatureSource::new(
            settings.battery_path.clone(),
        )),
        SourceKind::Sensors => Arc::new(SensorTemperatureSource::new(
            settings.sensor_label.clone(),
        )),
    }
}

/// Rounds to one decimal, half away from zero, and renders with a `.` separator
/// regardless of locale.
pub fn format_celsius(value: f32) -> String {
    let tenths = (f64::from(value) * 10.0).round() as i64;
    let sign = if tenths < 0 { "-" } else { "" };
    let magnitude = tenths.unsigned_abs();
    format!("{sign}{}.{} °C", magnitude / 10, magnitude % 10)
}

pub fn format_widget(value: SampleValue) -> String {
    match value {
        Some(celsius) if celsius.is_finite() => format_celsius(celsius),
        _ => WIDGET_UNAVAILABLE.to_string(),
    }
}

pub fn format_screen(value: SampleValue) -> String {
    match value {
        Some(celsius) if celsius.is_finite() => format!("Temperature: {}", format_celsius(celsius)),
        _ => SCREEN_UNAVAILABLE.to_string(),
    }
}
