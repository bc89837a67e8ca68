use std::path::PathBuf;

/// Failures from the host renderer's texture calls
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("could not allocate texture {name} ({width}x{height}): {reason}")]
    Allocation {
        name: String,
        width: u32,
        height: u32,
        reason: String,
    },
}

/// Failures reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
