use thiserror::Error;

/// Everything that can go wrong is missing or malformed input.
/// Callers log these and carry on with a blank or partial frame.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid view config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid layout measurement: {0}")]
    Layout(#[source] serde_json::Error),

    #[error("invalid shape source: {0}")]
    ShapeSource(#[source] serde_json::Error),

    #[error("shape source has an empty extent ({width}x{height})")]
    EmptyViewBox { width: f32, height: f32 },

    #[error("canvas has no 2d context")]
    NoCanvasContext,

    #[error("drawing surface call failed: {0}")]
    Surface(String),
}
