//! Panel error types.

use orrery_scene::ColorError;

/// Errors surfaced by [`OrreryPanel`](crate::OrreryPanel).
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// No renderable surface could be acquired at attach. Fatal.
    #[error("renderable surface unavailable: {0}")]
    SurfaceUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured background colour did not parse.
    #[error("invalid background colour: {0}")]
    InvalidBackgroundColor(#[from] ColorError),

    /// The backend reported a fatal fault while drawing.
    #[error("render failed: {0}")]
    RenderFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}
