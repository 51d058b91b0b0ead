//! Interval timeline editing for labeling actions in video.
//!
//! [`TimelineEditor`] owns the clips of one video and turns pointer and key
//! input into edits. The pieces it is built from are usable on their own.

pub mod capture;
pub mod collection;
pub mod drag;
pub mod editor;
pub mod error;
pub mod export;
pub mod mapper;
pub mod project;
pub mod types;
pub mod zoom;

pub use capture::{FrameCapture, PlaceholderCapture};
pub use collection::ClipCollection;
pub use drag::{DragEditStateMachine, DragState, Modifiers};
pub use editor::{Key, TimelineEditor, TimelineEvent};
pub use error::{CoreError, Result};
pub use hit_test::{ClipRect, Hit, HitRegion};
pub use mapper::{TimeCoordinateMapper, TimelineGeometry};
pub use types::*;
pub use zoom::ZoomController;
