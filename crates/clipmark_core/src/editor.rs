use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capture::FrameCapture;
use crate::collection::ClipCollection;
use crate::drag::{DragEditStateMachine, DragState, EditCommit, Modifiers};
use crate::error::{CoreError, Result};
use crate::hit_test::{self, ClipRect, Hit, HitRegion};
use crate::mapper::{TimeCoordinateMapper, TimelineGeometry};
use crate::types::{Clip, Thumbnail, TimeMs, Visibility};
use crate::zoom::ZoomController;

/// Keys the timeline reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Home,
    End,
    EditModifier,
    JumpModifier,
}

/// Notifications for the surrounding UI, returned by every input handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEvent {
    /// The scrub position moved; views showing the current time follow it.
    PositionChanged(f64),
    /// Ask playback to seek, and start playing when `play` is set.
    SeekRequested { seconds: f64, play: bool },
    SelectionChanged(Option<usize>),
    /// Clip data changed; list views must be rebuilt.
    ClipsChanged { selected: Option<usize> },
    Redraw,
}

/// Owns the clips of one media item and turns pointer and key input into
/// edits on them.
pub struct TimelineEditor {
    media_path: PathBuf,
    duration_seconds: f64,
    geometry: TimelineGeometry,
    zoom: ZoomController,
    clips: ClipCollection,
    drag: DragEditStateMachine,
    capture: Box<dyn FrameCapture>,
    pointer_seconds: f64,
    selected: Option<Uuid>,
    candidate: Option<usize>,
    hover: HitRegion,
    scrubbing: bool,
    open_clip: Option<Uuid>,
}

impl TimelineEditor {
    pub fn new(
        media_path: impl Into<PathBuf>,
        duration: TimeMs,
        clips: ClipCollection,
        capture: Box<dyn FrameCapture>,
    ) -> Self {
        // a clip saved while still open resumes as the clip being marked
        let open = clips.iter().find(|c| c.is_open()).map(|c| (c.id, c.time_start()));
        if let Some((id, start)) = open {
            debug!(%id, start = %start, "resuming open clip");
        }
        Self {
            media_path: media_path.into(),
            duration_seconds: duration.as_seconds().max(0.0),
            geometry: TimelineGeometry::default(),
            zoom: ZoomController::new(),
            clips,
            drag: DragEditStateMachine::new(),
            capture,
            pointer_seconds: open.map_or(0.0, |(_, start)| start.as_seconds()),
            selected: None,
            candidate: None,
            hover: HitRegion::Outside,
            scrubbing: false,
            open_clip: open.map(|(id, _)| id),
        }
    }

    pub fn with_geometry(mut self, geometry: TimelineGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    // -- read access -------------------------------------------------------

    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    pub fn clips(&self) -> &ClipCollection {
        &self.clips
    }

    pub fn into_clips(mut self) -> ClipCollection {
        self.finish_drag();
        self.clips
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn geometry(&self) -> &TimelineGeometry {
        &self.geometry
    }

    pub fn pointer_seconds(&self) -> f64 {
        self.pointer_seconds
    }

    pub fn zoom_factor(&self) -> u32 {
        self.zoom.factor()
    }

    pub fn visible_width(&self) -> f64 {
        self.zoom.visible_width(self.geometry.base_width)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Index of the clip under an active drag.
    pub fn current_edit_index(&self) -> Option<usize> {
        self.drag.editing_index()
    }

    /// Index recorded by the most recent hit test.
    pub fn candidate_index(&self) -> Option<usize> {
        self.candidate
    }

    /// Region under the pointer while hovering, for cursor feedback.
    pub fn hover_region(&self) -> HitRegion {
        self.hover
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.clips.position_of(id))
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_index().and_then(|i| self.clips.get(i))
    }

    pub fn open_clip_index(&self) -> Option<usize> {
        self.open_clip.and_then(|id| self.clips.position_of(id))
    }

    /// While a clip is being marked, positions before its start are off
    /// limits and get clamped up to it.
    pub fn restricted_minimum(&self) -> Option<f64> {
        self.open_clip_index()
            .and_then(|i| self.clips.get(i))
            .map(|c| c.time_start().as_seconds())
    }

    /// Fresh mapper for the current zoom, width and duration.
    pub fn mapper(&self) -> TimeCoordinateMapper {
        TimeCoordinateMapper::new(self.duration_seconds, self.visible_width(), self.geometry.inset)
    }

    /// Rectangles to draw, with the clip under a drag shown at its
    /// in-progress range.
    pub fn clip_rects(&self) -> Vec<ClipRect> {
        let mapper = self.mapper();
        let mut rects = hit_test::clip_rects(self.clips.as_slice(), &mapper, &self.geometry);
        if let Some((index, start, end)) = self.drag.preview() {
            if let Some(rect) = rects.iter_mut().find(|r| r.index == index) {
                if let Some(moved) =
                    hit_test::rect_for(index, start, Some(end), rect.visibility, &mapper, &self.geometry)
                {
                    *rect = moved;
                }
            }
        }
        rects
    }

    // -- pointer and key input ----------------------------------------------

    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Vec<TimelineEvent> {
        if self.drag.state().is_editing() {
            return Vec::new();
        }
        if modifiers.jump {
            return self.jump_to_clip(x, y);
        }
        if modifiers.edit {
            let hit = self.hit_at(x, y);
            if let Some(events) = self.start_edit(&hit, x) {
                return events;
            }
        }
        self.scrubbing = true;
        self.scrub_to(x)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Vec<TimelineEvent> {
        if self.drag.state().is_editing() {
            if !modifiers.edit {
                return self.commit_edit();
            }
            let mapper = self.mapper();
            return if self.drag.drag(x, &mapper) {
                vec![TimelineEvent::Redraw]
            } else {
                Vec::new()
            };
        }
        if self.scrubbing {
            return self.scrub_to(x);
        }
        self.hit_at(x, y);
        Vec::new()
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64) -> Vec<TimelineEvent> {
        self.scrubbing = false;
        if self.drag.state().is_editing() {
            return self.commit_edit();
        }
        Vec::new()
    }

    pub fn key_pressed(&mut self, key: Key) -> Vec<TimelineEvent> {
        match key {
            Key::Home => self.set_pointer(0.0),
            Key::End => self.set_pointer(self.duration_seconds),
            Key::EditModifier | Key::JumpModifier => Vec::new(),
        }
    }

    pub fn key_released(&mut self, key: Key) -> Vec<TimelineEvent> {
        match key {
            Key::EditModifier if self.drag.state().is_editing() => self.commit_edit(),
            _ => Vec::new(),
        }
    }

    /// Position reported by playback. Returns true if it moved the pointer.
    pub fn on_position_changed(&mut self, seconds: f64) -> bool {
        let seconds = self.mapper().clamp_seconds(seconds);
        if (seconds - self.pointer_seconds).abs() < f64::EPSILON {
            return false;
        }
        self.pointer_seconds = seconds;
        true
    }

    /// Classify a pointer and remember the hit clip as the edit candidate.
    pub fn hit_at(&mut self, x: f64, y: f64) -> Hit {
        let hit = hit_test::hit_test(&self.clip_rects(), x, y);
        self.candidate = hit.index();
        self.hover = hit.region;
        hit
    }

    fn start_edit(&mut self, hit: &Hit, x: f64) -> Option<Vec<TimelineEvent>> {
        let index = hit.index()?;
        let clip = self.clips.get(index)?;
        let end = clip.time_end()?;
        let id = clip.id;
        if !self.drag.press(hit, clip.time_start(), end, x) {
            return None;
        }
        self.selected = Some(id);
        Some(vec![TimelineEvent::SelectionChanged(Some(index)), TimelineEvent::Redraw])
    }

    fn commit_edit(&mut self) -> Vec<TimelineEvent> {
        let Some(commit) = self.drag.release() else {
            return Vec::new();
        };
        if commit.index >= self.clips.len() {
            // the collection was emptied underneath the drag
            return vec![TimelineEvent::Redraw];
        }
        let index = match self.apply_commit(&commit) {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "failed to apply clip edit");
                return vec![TimelineEvent::Redraw];
            }
        };
        info!(
            index,
            start = %commit.start,
            end = %commit.end,
            moved = index != commit.index,
            "clip edit committed"
        );
        let selected = Some(index);
        vec![
            TimelineEvent::ClipsChanged { selected },
            TimelineEvent::SelectionChanged(selected),
            TimelineEvent::Redraw,
        ]
    }

    /// Capture the thumbnail first, then write the range, so the clip is
    /// never reordered before its frame is known.
    fn apply_commit(&mut self, commit: &EditCommit) -> Result<usize> {
        let thumbnail = self.capture_at(commit.start);
        let index = if commit.start_changed() {
            self.clips.update_range(commit.index, commit.start, Some(commit.end))?
        } else if commit.changed() {
            self.clips.set_end(commit.index, commit.end)?
        } else {
            commit.index
        };
        let clip = self.clips.get_mut(index)?;
        if let Some(thumbnail) = thumbnail {
            clip.thumbnail = thumbnail;
        }
        self.selected = Some(clip.id);
        Ok(index)
    }

    fn finish_drag(&mut self) {
        if self.drag.state().is_editing() {
            self.commit_edit();
        }
    }

    fn capture_at(&self, offset: TimeMs) -> Option<Thumbnail> {
        match self.capture.capture_thumbnail(&self.media_path, offset) {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                warn!(error = %e, offset = %offset, "thumbnail capture failed, keeping previous");
                None
            }
        }
    }

    fn scrub_to(&mut self, x: f64) -> Vec<TimelineEvent> {
        let seconds = self.mapper().seconds_at(x);
        self.set_pointer(seconds)
    }

    fn set_pointer(&mut self, seconds: f64) -> Vec<TimelineEvent> {
        let mut seconds = self.mapper().clamp_seconds(seconds);
        if let Some(min) = self.restricted_minimum() {
            seconds = seconds.max(min);
        }
        self.pointer_seconds = seconds;
        vec![TimelineEvent::PositionChanged(seconds)]
    }

    fn jump_to_clip(&mut self, x: f64, y: f64) -> Vec<TimelineEvent> {
        let Some(rect) = hit_test::clip_at(&self.clip_rects(), x, y) else {
            return Vec::new();
        };
        self.candidate = Some(rect.index);
        let Some(start) = self.clips.get(rect.index).map(|c| c.time_start()) else {
            return Vec::new();
        };
        let mut events = self.set_pointer(start.as_seconds());
        debug!(index = rect.index, seconds = self.pointer_seconds, "jump to clip");
        events.push(TimelineEvent::SeekRequested {
            seconds: self.pointer_seconds,
            play: true,
        });
        events
    }

    // -- clip marking ---------------------------------------------------------

    /// Open a new clip at the pointer. Its end is set by [`close_clip`].
    ///
    /// [`close_clip`]: TimelineEditor::close_clip
    pub fn begin_clip(&mut self) -> Result<usize> {
        if self.open_clip_index().is_some() {
            return Err(CoreError::OpenClipPending);
        }
        self.finish_drag();
        let clip = Clip::open(TimeMs::from_seconds(self.pointer_seconds));
        let id = clip.id;
        let index = self.clips.insert_sorted(clip);
        self.open_clip = Some(id);
        debug!(index, start = self.pointer_seconds, "clip opened");
        Ok(index)
    }

    /// Close the open clip at the pointer and classify it.
    pub fn close_clip(&mut self, action_class: i32) -> Result<usize> {
        self.finish_drag();
        let index = self.open_clip_index().ok_or(CoreError::NoOpenClip)?;
        let index = self.clips.set_end(index, TimeMs::from_seconds(self.pointer_seconds))?;
        let start = self.clips.get_mut(index)?.time_start();
        let thumbnail = self.capture_at(start);
        let clip = self.clips.get_mut(index)?;
        clip.action_class = action_class;
        if let Some(thumbnail) = thumbnail {
            clip.thumbnail = thumbnail;
        }
        self.selected = Some(clip.id);
        self.open_clip = None;
        info!(index, action_class, "clip closed");
        Ok(index)
    }

    /// Drop the open clip without closing it.
    pub fn cancel_clip(&mut self) -> Result<Clip> {
        let index = self.open_clip_index().ok_or(CoreError::NoOpenClip)?;
        self.open_clip = None;
        self.remove_clip(index)
    }

    // -- list operations ------------------------------------------------------

    /// Select a clip by index, or clear the selection with `None`.
    pub fn select_clip(&mut self, index: Option<usize>) -> Result<()> {
        self.selected = match index {
            Some(i) => Some(self.clips.get_mut(i)?.id),
            None => None,
        };
        Ok(())
    }

    pub fn toggle_visibility(&mut self, index: usize) -> Result<Visibility> {
        self.clips.toggle_visibility(index)
    }

    pub fn set_visibility_all(&mut self, visibility: Visibility) {
        self.clips.set_visibility_all(visibility);
    }

    pub fn set_action_class(&mut self, index: usize, action_class: i32) -> Result<()> {
        self.clips.set_action_class(index, action_class)
    }

    pub fn rename_clip(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.clips.get_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<Clip> {
        self.finish_drag();
        let removed = self.clips.remove_at(index)?;
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        if self.open_clip == Some(removed.id) {
            self.open_clip = None;
        }
        self.candidate = None;
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.drag.release();
        self.clips.clear();
        self.selected = None;
        self.open_clip = None;
        self.candidate = None;
        self.hover = HitRegion::Outside;
    }

    // -- zoom -----------------------------------------------------------------

    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }

    pub fn set_zoom(&mut self, factor: u32) -> bool {
        self.zoom.set_factor(factor)
    }

    /// The view was resized; `base_width` is the new width at zoom 1.
    pub fn resize(&mut self, base_width: f64) {
        self.geometry.base_width = base_width.max(0.0);
    }
}
