//! ffprobe/ffmpeg helpers backing the editor's media collaborators.

pub mod error;
pub mod probe;
pub mod thumbnails;

pub use error::{MediaError, Result};
pub use probe::{import_video, probe_media};
pub use thumbnails::FfmpegFrameCapture;
