use clipmark_core::types::{MediaInfo, TimeMs, Video};
use serde::Deserialize;
use std::path::Path;

use crate::error::{MediaError, Result};

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    /// Per-stream duration, used when the container reports none.
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run ffprobe on a media file and parse the result into a `MediaInfo`.
pub fn probe_media(path: impl AsRef<Path>) -> Result<MediaInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let output = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| MediaError::FfprobeExec(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::FfprobeFailed(stderr.into_owned()));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    let info = parse_probe_output(&probe).ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;
    tracing::debug!(
        path = %path.display(),
        duration = %info.duration,
        width = info.width,
        height = info.height,
        fps = info.fps,
        "probed media"
    );
    Ok(info)
}

/// Probe a file and wrap it as a `Video` with no clips.
pub fn import_video(path: impl AsRef<Path>) -> Result<Video> {
    let path = path.as_ref();
    let media = probe_media(path)?;
    Ok(Video::new(path, media))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `None` when the file has no video stream; clips are marked on frames.
fn parse_probe_output(probe: &FfprobeOutput) -> Option<MediaInfo> {
    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video")?;

    let duration = probe
        .format
        .duration
        .as_deref()
        .or(video_stream.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(TimeMs::from_seconds)
        .unwrap_or(TimeMs::ZERO);

    let fps = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    Some(MediaInfo {
        duration,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        fps,
    })
}

/// Parse ffprobe frame rate string like "30000/1001" or "30/1" into f64.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().ok()?;
        let d: f64 = den.parse().ok()?;
        if d == 0.0 {
            return None;
        }
        Some(n / d)
    } else {
        rate.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
