use std::fmt;

use serde::Serialize;

pub const HIDDEN_NOTICE: &str = "Temperature is hidden. (Polling slows down to save battery.)";
pub const PERMISSION_PROMPT: &str =
    "Permission required: Allow “Display over other apps” to enable the overlay.";

/// What the foreground panel currently shows, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub keep_screen_on: bool,
    pub toggle_label: &'static str,
    /// `None` while the panel is hidden.
    pub temperature: Option<String>,
    pub overlay_line: &'static str,
}

impl ScreenView {
    pub fn new(
        temperature: Option<String>,
        keep_screen_on: bool,
        overlay_running: bool,
        permission_granted: bool,
    ) -> Self {
        let toggle_label = if temperature.is_some() {
            "Hide temperature"
        } else {
            "Show temperature"
        };
        let overlay_line = match (permission_granted, overlay_running) {
            (false, _) => PERMISSION_PROMPT,
            (true, true) => "Overlay running.",
            (true, false) => "Overlay stopped.",
        };
        Self {
            keep_screen_on,
            toggle_label,
            temperature,
            overlay_line,
        }
    }
}

impl fmt::Display for ScreenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] Keep screen on",
            if self.keep_screen_on { "x" } else { " " }
        )?;
        writeln!(f, "<{}>", self.toggle_label)?;
        match &self.temperature {
            Some(text) => writeln!(f, "{text}")?,
            None => writeln!(f, "{HIDDEN_NOTICE}")?,
        }
        write!(f, "{}", self.overlay_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_visible_panel() {
        let view = ScreenView::new(Some("Temperature: 30.1 °C".into()), true, true, true);
        assert_eq!(
            view.to_string(),
            "[x] Keep screen on\n<Hide temperature>\nTemperature: 30.1 °C\nOverlay running."
        );
    }

    #[test]
    fn hidden_panel_shows_notice() {
        let view = ScreenView::new(None, false, false, true);
        assert_eq!(view.toggle_label, "Show temperature");
        assert!(view.to_string().contains(HIDDEN_NOTICE));
        assert!(view.to_string().ends_with("Overlay stopped."));
    }

    #[test]
    fn missing_permission_replaces_overlay_status() {
        let view = ScreenView::new(None, false, true, false);
        assert_eq!(view.overlay_line, PERMISSION_PROMPT);
    }
}
