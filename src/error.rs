// Crate error type. Every variant states *where* things went wrong.
// The per-frame render path never produces one of these.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the viewer window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the composed frame to the window failed

    #[error("Config read error ({path}): {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error ({path}): {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config invalid: {0}")]
    ConfigInvalid(String), // Values parsed but out of range

    #[error("Snapshot error ({path}): {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Surface size error: {0}")]
    SurfaceSize(String), // Buffers that must match the viewport did not
}
