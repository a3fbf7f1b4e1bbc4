use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::overlay::{GestureConfig, WidgetPosition};

pub const SETTINGS_PATH_ENV: &str = "TEMPERATURE_OVERLAY_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "temperature-overlay.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverlaySettings {
    pub default_x: i32,
    pub default_y: i32,
    pub drag_threshold_px: i32,
    pub tap_timeout_ms: u64,
    /// Overlay sampling cadence; not slowed while collapsed.
    pub sample_interval_ms: u64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            default_x: 30,
            default_y: 120,
            drag_threshold_px: 8,
            tap_timeout_ms: 250,
            sample_interval_ms: 5_000,
        }
    }
}

impl OverlaySettings {
    pub fn default_position(&self) -> WidgetPosition {
        WidgetPosition::new(self.default_x, self.default_y)
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            drag_threshold_px: self.drag_threshold_px,
            tap_timeout: Duration::from_millis(self.tap_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScreenSettings {
    pub visible_interval_ms: u64,
    pub hidden_interval_ms: u64,
    pub keep_screen_on: bool,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            visible_interval_ms: 5_000,
            hidden_interval_ms: 30_000,
            keep_screen_on: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    #[default]
    Battery,
    Sensors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub battery_path: PathBuf,
    pub sensor_label: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Battery,
            battery_path: PathBuf::from("/sys/class/power_supply/BAT0/temp"),
            sensor_label: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSettings {
    pub overlay: OverlaySettings,
    pub screen: ScreenSettings,
    pub source: SourceSettings,
    pub overlay_permission_granted: bool,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Uses `TEMPERATURE_OVERLAY_SETTINGS` when set, otherwise a file in the working directory.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn overlay(&self) -> OverlaySettings {
        self.read().overlay.clone()
    }

    pub fn screen(&self) -> ScreenSettings {
        self.read().screen.clone()
    }

    pub fn source(&self) -> SourceSettings {
        self.read().source.clone()
    }

    pub fn update_screen(&self, settings: ScreenSettings) -> Result<()> {
        let mut guard = self.write();
        guard.screen = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
