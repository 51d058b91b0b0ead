use clipmark_core::capture::FrameCapture;
use clipmark_core::types::{Thumbnail, TimeMs};
use std::path::{Path, PathBuf};

use crate::error::{MediaError, Result};

/// Default thumbnail width in pixels; height follows the aspect ratio.
pub const DEFAULT_THUMB_WIDTH: u32 = 160;

/// Extract a single thumbnail at a specific time from a video file.
pub fn extract_thumbnail(
    source_path: &Path,
    output_path: &Path,
    time_seconds: f64,
    width: u32,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let status = std::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-ss",
            &format!("{time_seconds:.3}"),
            "-i",
            &source_path.to_string_lossy(),
            "-vframes",
            "1",
            "-vf",
            &format!("scale={width}:-1"),
            "-q:v",
            "5",
            &output_path.to_string_lossy(),
        ])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()?;

    if !status.success() {
        return Err(MediaError::FfmpegFailed(format!(
            "thumbnail extraction at {time_seconds:.3}s failed"
        )));
    }
    Ok(())
}

/// Cache location for the frame of `media` at `offset`:
/// `<cache_dir>/<media stem>/<ms>.jpg`.
pub fn thumbnail_path(cache_dir: &Path, media: &Path, offset: TimeMs) -> PathBuf {
    let stem = media
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    cache_dir.join(stem).join(format!("{}.jpg", offset.0))
}

/// Frame grabber backed by ffmpeg with an on-disk cache.
#[derive(Debug, Clone)]
pub struct FfmpegFrameCapture {
    pub cache_dir: PathBuf,
    pub width: u32,
}

impl FfmpegFrameCapture {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            width: DEFAULT_THUMB_WIDTH,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    fn capture(&self, media: &Path, offset: TimeMs) -> Result<PathBuf> {
        let path = thumbnail_path(&self.cache_dir, media, offset);
        if path.exists() {
            tracing::debug!(path = %path.display(), "thumbnail cache hit");
            return Ok(path);
        }
        if !media.exists() {
            return Err(MediaError::FileNotFound(media.to_path_buf()));
        }
        extract_thumbnail(media, &path, offset.as_seconds(), self.width)?;
        tracing::debug!(path = %path.display(), "thumbnail extracted");
        Ok(path)
    }
}

impl FrameCapture for FfmpegFrameCapture {
    fn capture_thumbnail(&self, media: &Path, offset: TimeMs) -> clipmark_core::Result<Thumbnail> {
        let path = self.capture(media, offset)?;
        Ok(Thumbnail::Frame { path })
    }
}
