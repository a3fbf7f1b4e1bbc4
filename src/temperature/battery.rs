use std::fs;
use std::path::PathBuf;

use log::debug;

use super::{SampleValue, TemperatureSource};

/// Reads a power-supply temperature attribute reported in tenths of a degree Celsius,
/// e.g. `/sys/class/power_supply/BAT0/temp`.
pub struct BatteryTemperatureSource {
    path: PathBuf,
}

impl BatteryTemperatureSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TemperatureSource for BatteryTemperatureSource {
    fn read(&self) -> SampleValue {
        match fs::read_to_string(&self.path) {
            Ok(contents) => parse_tenths(&contents),
            Err(err) => {
                debug!("battery temperature unavailable at {}: {err}", self.path.display());
                None
            }
        }
    }
}

fn parse_tenths(contents: &str) -> SampleValue {
    let tenths: i32 = contents.trim().parse().ok()?;
    Some(tenths as f32 / 10.0)
}
