//! Flat clip listing for downstream training and review tools.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{BoundingBox, Project, Visibility};

/// One exported clip with its label resolved to a name.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportedClip {
    pub video: PathBuf,
    pub label: String,
    pub action_class: i32,
    pub name: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Every closed, shown clip in video order, then time order. Dimmed and
/// hidden clips are left out.
pub fn export_clips(project: &Project) -> Vec<ExportedClip> {
    project
        .videos
        .iter()
        .flat_map(|video| {
            video.clips.iter().filter_map(move |clip| {
                if clip.visibility != Visibility::Shown {
                    return None;
                }
                let end = clip.time_end()?;
                let start = clip.time_start();
                Some(ExportedClip {
                    video: video.path.clone(),
                    label: project.labels.label_for(clip.action_class).to_string(),
                    action_class: clip.action_class,
                    name: clip.name.clone(),
                    start_ms: start.0,
                    end_ms: end.0,
                    start_seconds: start.as_seconds(),
                    end_seconds: end.as_seconds(),
                    bounding_box: clip.bounding_box,
                })
            })
        })
        .collect()
}

/// Write [`export_clips`] as a pretty JSON array. Returns the number of
/// clips written.
pub fn write_json(path: impl AsRef<Path>, project: &Project) -> Result<usize> {
    let clips = export_clips(project);
    let json = serde_json::to_string_pretty(&clips)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(path = %path.as_ref().display(), clips = clips.len(), "clips exported");
    Ok(clips.len())
}
