use std::path::Path;

use crate::error::Result;
use crate::types::{Thumbnail, TimeMs};

/// Grabs a still frame from the media for a clip thumbnail.
///
/// Implementations may be slow. Errors never reach the editor's caller: the
/// editor logs them and keeps the clip's previous thumbnail.
pub trait FrameCapture {
    fn capture_thumbnail(&self, media: &Path, offset: TimeMs) -> Result<Thumbnail>;
}

/// Capture that always yields the placeholder. Used when no frame grabber
/// is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderCapture;

impl FrameCapture for PlaceholderCapture {
    fn capture_thumbnail(&self, _media: &Path, _offset: TimeMs) -> Result<Thumbnail> {
        Ok(Thumbnail::Placeholder)
    }
}
