use clipmark_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to execute ffprobe: {0}")]
    FfprobeExec(String),

    #[error("ffprobe failed: {0}")]
    FfprobeFailed(String),

    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),

    #[error("ffmpeg failed: {0}")]
    FfmpegFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MediaError>;

impl From<MediaError> for CoreError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::Io(io) => CoreError::Io(io),
            other => CoreError::Capture(other.to_string()),
        }
    }
}
