use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{index_out_of_range, Result};
use crate::types::{Clip, TimeMs, Visibility};

/// Clips of one video, kept sorted ascending by start time.
///
/// Clips with equal starts keep their insertion order. Overlapping clips are
/// allowed. Any change to a start time goes through a remove, binary search,
/// reinsert cycle so the sort order holds after every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<Clip>", into = "Vec<Clip>")]
pub struct ClipCollection {
    clips: Vec<Clip>,
}

impl ClipCollection {
    pub fn new() -> Self {
        Self { clips: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clip> {
        self.clips.iter()
    }

    pub fn as_slice(&self) -> &[Clip] {
        &self.clips
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    /// Insert `clip` at its sorted position and return that index.
    pub fn insert_sorted(&mut self, mut clip: Clip) -> usize {
        clip.normalize();
        let index = self.insertion_index(clip.time_start());
        self.clips.insert(index, clip);
        index
    }

    /// Move the clip at `index` to start at `new_start`, returning its new
    /// index. The end is kept, so a start past the end swaps the two.
    pub fn reposition_after_start_edit(&mut self, index: usize, new_start: TimeMs) -> Result<usize> {
        let end = self.checked(index)?.time_end();
        self.update_range(index, new_start, end)
    }

    /// Replace both ends of the clip at `index` in one step and re-sort it.
    /// Used when a drag moves the whole interval, where assigning start and
    /// end one after the other could swap them spuriously.
    pub fn update_range(&mut self, index: usize, start: TimeMs, end: Option<TimeMs>) -> Result<usize> {
        self.checked(index)?;
        let mut clip = self.clips.remove(index);
        clip.set_range(start, end);
        let new_index = self.insertion_index(clip.time_start());
        self.clips.insert(new_index, clip);
        if new_index != index {
            tracing::debug!(from = index, to = new_index, "clip repositioned");
        }
        Ok(new_index)
    }

    /// Assign the end of the clip at `index`. Returns the clip's index
    /// afterwards, which changes only if the swap moved its start.
    pub fn set_end(&mut self, index: usize, new_end: TimeMs) -> Result<usize> {
        let clip = self.checked_mut(index)?;
        let start = clip.time_start();
        clip.set_end(new_end);
        if clip.time_start() == start {
            return Ok(index);
        }
        let swapped_start = clip.time_start();
        let end = clip.time_end();
        self.update_range(index, swapped_start, end)
    }

    pub fn set_visibility(&mut self, index: usize, visibility: Visibility) -> Result<()> {
        self.checked_mut(index)?.visibility = visibility;
        Ok(())
    }

    pub fn toggle_visibility(&mut self, index: usize) -> Result<Visibility> {
        let clip = self.checked_mut(index)?;
        clip.visibility = clip.visibility.toggled();
        Ok(clip.visibility)
    }

    pub fn set_visibility_all(&mut self, visibility: Visibility) {
        for clip in &mut self.clips {
            clip.visibility = visibility;
        }
    }

    pub fn set_action_class(&mut self, index: usize, action_class: i32) -> Result<()> {
        self.checked_mut(index)?.action_class = action_class;
        Ok(())
    }

    /// Mutable access to the fields that are not part of the sort key.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Clip> {
        self.checked_mut(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Clip> {
        self.checked(index)?;
        Ok(self.clips.remove(index))
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// First index whose start is strictly greater than `start`, so equal
    /// starts land after the clips already present.
    fn insertion_index(&self, start: TimeMs) -> usize {
        self.clips.partition_point(|c| c.time_start() <= start)
    }

    fn checked(&self, index: usize) -> Result<&Clip> {
        let len = self.clips.len();
        self.clips.get(index).ok_or_else(|| index_out_of_range(index, len))
    }

    fn checked_mut(&mut self, index: usize) -> Result<&mut Clip> {
        let len = self.clips.len();
        self.clips.get_mut(index).ok_or_else(|| index_out_of_range(index, len))
    }
}

impl From<Vec<Clip>> for ClipCollection {
    fn from(mut clips: Vec<Clip>) -> Self {
        for clip in &mut clips {
            clip.normalize();
        }
        clips.sort_by_key(|c| c.time_start());
        Self { clips }
    }
}

impl From<ClipCollection> for Vec<Clip> {
    fn from(collection: ClipCollection) -> Self {
        collection.clips
    }
}

impl<'a> IntoIterator for &'a ClipCollection {
    type Item = &'a Clip;
    type IntoIter = std::slice::Iter<'a, Clip>;

    fn into_iter(self) -> Self::IntoIter {
        self.clips.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
