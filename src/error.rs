use thiserror::Error;

/// Errors that can occur while encoding or decoding a history snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Snapshot is {actual:?} but was recorded as {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Errors that can occur while importing an image onto the canvas
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Failed to record imported image: {0}")]
    Snapshot(#[from] SnapshotError),
}
