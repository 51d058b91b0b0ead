use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::path::PathBuf;
use uuid::Uuid;

use crate::collection::ClipCollection;

/// Label shown for clips whose class index is unset or out of range.
pub const UNCLASSIFIED_LABEL: &str = "Other";

// ---------------------------------------------------------------------------
// TimeMs
// ---------------------------------------------------------------------------

/// Offset from the start of the media, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub const ZERO: Self = Self(0);

    pub fn from_seconds(s: f64) -> Self {
        Self((s * 1_000.0).round() as i64)
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1_000.0
    }
}

impl Add for TimeMs {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeMs {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.0.unsigned_abs();
        let ms = total_ms % 1_000;
        let total_secs = total_ms / 1_000;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        if self.0 < 0 {
            write!(f, "-{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        } else {
            write!(f, "{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        }
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether a clip is drawn, selectable and exported.
///
/// Hidden clips are neither drawn nor hit-tested. Dimmed clips are drawn
/// faded and stay selectable but are left out of exports. Shown clips take
/// part in everything.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Visibility {
    Hidden,
    Dimmed,
    #[default]
    Shown,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }

    /// Flip between hidden and shown. Dimmed is left as is, which keeps a
    /// double toggle an identity for every value.
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Hidden => Visibility::Shown,
            Visibility::Shown => Visibility::Hidden,
            Visibility::Dimmed => Visibility::Dimmed,
        }
    }
}

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Normalized region of interest inside the frame. Every component lies in
/// `[0, 1]`, including boxes read from disk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawBoundingBox")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64, confidence: f64) -> Self {
        Self {
            x: unit(x),
            y: unit(y),
            width: unit(width),
            height: unit(height),
            confidence: unit(confidence),
        }
    }
}

#[derive(Deserialize)]
struct RawBoundingBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    confidence: f64,
}

impl From<RawBoundingBox> for BoundingBox {
    fn from(raw: RawBoundingBox) -> Self {
        Self::new(raw.x, raw.y, raw.width, raw.height, raw.confidence)
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Thumbnail
// ---------------------------------------------------------------------------

/// Handle to a captured frame. The editor never looks inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Thumbnail {
    #[default]
    Placeholder,
    Frame { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// One labeled interval on the timeline.
///
/// The time range is private so that `time_start <= time_end` always holds:
/// assignments that would invert it swap the two values instead. An open
/// clip has no end yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    time_start: TimeMs,
    time_end: Option<TimeMs>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Index into the project's label set; `-1` means unclassified.
    #[serde(default = "unclassified")]
    pub action_class: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Thumbnail,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

fn unclassified() -> i32 {
    -1
}

impl Clip {
    /// Start marking a clip at `start`. The end is assigned later.
    pub fn open(start: TimeMs) -> Self {
        Self {
            id: Uuid::new_v4(),
            time_start: TimeMs(start.0.max(0)),
            time_end: None,
            visibility: Visibility::Shown,
            action_class: unclassified(),
            name: String::new(),
            description: String::new(),
            thumbnail: Thumbnail::Placeholder,
            bounding_box: None,
        }
    }

    /// A closed clip over `[start, end]` (swapped if given backwards).
    pub fn new(start: TimeMs, end: TimeMs) -> Self {
        let mut clip = Self::open(start);
        clip.set_end(end);
        clip
    }

    pub fn with_class(mut self, action_class: i32) -> Self {
        self.action_class = action_class;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn time_start(&self) -> TimeMs {
        self.time_start
    }

    pub fn time_end(&self) -> Option<TimeMs> {
        self.time_end
    }

    pub fn is_open(&self) -> bool {
        self.time_end.is_none()
    }

    pub fn duration(&self) -> Option<TimeMs> {
        self.time_end.map(|end| end - self.time_start)
    }

    /// Assign the end time, swapping with the start if it lands earlier.
    pub fn set_end(&mut self, end: TimeMs) {
        self.time_end = Some(TimeMs(end.0.max(0)));
        self.normalize();
    }

    /// Assign both ends. Only the owning collection may call this, since
    /// the start is its sort key.
    pub(crate) fn set_range(&mut self, start: TimeMs, end: Option<TimeMs>) {
        self.time_start = TimeMs(start.0.max(0));
        self.time_end = end.map(|e| TimeMs(e.0.max(0)));
        self.normalize();
    }

    /// Clamp negative times to zero and swap an inverted range. Applied to
    /// every clip entering a collection, including clips read from disk.
    pub(crate) fn normalize(&mut self) {
        self.time_start = TimeMs(self.time_start.0.max(0));
        self.time_end = self.time_end.map(|e| TimeMs(e.0.max(0)));
        if let Some(end) = self.time_end {
            if end < self.time_start {
                self.time_end = Some(self.time_start);
                self.time_start = end;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LabelSet
// ---------------------------------------------------------------------------

/// Ordered action class names. A reserved "Other" label sits after the last
/// real class and stands in for unclassified clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelSet {
    pub classes: Vec<String>,
}

impl LabelSet {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn is_unclassified(&self, index: i32) -> bool {
        index < 0 || index as usize >= self.classes.len()
    }

    /// Resolve a class index to its display name.
    pub fn label_for(&self, index: i32) -> &str {
        if index >= 0 {
            if let Some(name) = self.classes.get(index as usize) {
                return name;
            }
            if index as usize != self.classes.len() {
                tracing::warn!(index, classes = self.classes.len(), "class index out of range");
            }
        }
        UNCLASSIFIED_LABEL
    }

    /// Class names as a list widget shows them, reserved label last.
    pub fn display_names(&self) -> Vec<&str> {
        self.classes
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(UNCLASSIFIED_LABEL))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MediaInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaInfo {
    pub duration: TimeMs,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl MediaInfo {
    pub fn with_duration(duration: TimeMs) -> Self {
        Self {
            duration,
            width: 0,
            height: 0,
            fps: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// A media file and the clips marked on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub path: PathBuf,
    pub media: MediaInfo,
    #[serde(default)]
    pub clips: ClipCollection,
}

impl Video {
    pub fn new(path: impl Into<PathBuf>, media: MediaInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            media,
            clips: ClipCollection::new(),
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub labels: LabelSet,
    pub videos: Vec<Video>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
