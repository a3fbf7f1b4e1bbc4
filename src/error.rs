use crate::host::SurfaceHandle;

/// Failures surfaced by the overlay lifecycle.
///
/// None of these are fatal: `CapabilityDenied` is a refusal with no state change,
/// `StaleHandle` is swallowed by the controller when gesture or sampling callbacks
/// race teardown.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("overlay display capability has not been granted")]
    CapabilityDenied,
    #[error("display surface handle {0} is no longer attached")]
    StaleHandle(SurfaceHandle),
    #[error("display surface refused the widget: {0}")]
    Surface(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
