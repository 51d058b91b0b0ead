use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clip index {index} out of range (collection has {len} clips)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Video not found at index {0}")]
    VideoNotFound(usize),

    #[error("An open clip is already being marked")]
    OpenClipPending,

    #[error("No open clip to close")]
    NoOpenClip,

    #[error("Thumbnail capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Indexing past the end of a collection is a caller bug, so it is logged at
/// error level before being returned.
pub(crate) fn index_out_of_range(index: usize, len: usize) -> CoreError {
    tracing::error!(index, len, "clip index out of range");
    CoreError::IndexOutOfRange { index, len }
}
