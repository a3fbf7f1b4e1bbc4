use std::sync::Mutex;

use sysinfo::Components;

use super::{SampleValue, TemperatureSource};

/// Reads hardware sensors through `sysinfo`.
///
/// With a label filter the first component whose label contains it (ignoring case)
/// is used; without one, the first component reported.
pub struct SensorTemperatureSource {
    components: Mutex<Components>,
    label_filter: Option<String>,
}

impl SensorTemperatureSource {
    pub fn new(label_filter: Option<String>) -> Self {
        Self {
            components: Mutex::new(Components::new_with_refreshed_list()),
            label_filter: label_filter.map(|label| label.to_lowercase()),
        }
    }
}

impl TemperatureSource for SensorTemperatureSource {
    fn read(&self) -> SampleValue {
        let mut components = self
            .components
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        components.refresh();

        let component = components.list().iter().find(|component| {
            self.label_filter
                .as_deref()
                .map_or(true, |filter| component.label().to_lowercase().contains(filter))
        })?;

        let celsius = component.temperature();
        celsius.is_finite().then_some(celsius)
    }
}
