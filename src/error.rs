use thiserror::Error;

/// Everything that can go wrong while assembling the sky. None of it is fatal:
/// callers log and carry on without the affected piece.
#[derive(Error, Debug)]
pub enum SkyError {
    /// No drawing surface could be acquired for a layer.
    #[error("no surface available for layer `{layer}`")]
    SurfaceMissing { layer: &'static str },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A spawn window with `min > max` or a negative bound.
    #[error("invalid spawn window for {emitter}: {min_ms}..{max_ms} ms")]
    InvalidWindow {
        emitter: &'static str,
        min_ms: f32,
        max_ms: f32,
    },

    /// The layer compositing shader failed to build.
    #[error("failed to load layer material: {0}")]
    Material(String),

    #[error("unknown layer `{0}`")]
    UnknownLayer(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
