use crate::capture::FrameCapture;
use crate::editor::TimelineEditor;
use crate::error::{CoreError, Result};
use crate::types::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File extension for saved projects.
pub const PROJECT_EXTENSION: &str = "clipmark";

impl Project {
    /// Create a new empty project with the given name and labels.
    pub fn new(name: impl Into<String>, labels: LabelSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            labels,
            videos: vec![],
        }
    }

    /// Save project to a file as pretty-printed JSON.
    /// Automatically appends `.clipmark` extension if not present, and
    /// returns the path actually written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), videos = self.videos.len(), "project saved");
        Ok(path)
    }

    /// Load a project from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let project: Project = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.as_ref().display(), videos = project.videos.len(), "project loaded");
        Ok(project)
    }

    /// Append a video and return its index.
    pub fn add_video(&mut self, video: Video) -> usize {
        self.videos.push(video);
        self.videos.len() - 1
    }

    pub fn video(&self, index: usize) -> Result<&Video> {
        self.videos.get(index).ok_or(CoreError::VideoNotFound(index))
    }

    pub fn video_mut(&mut self, index: usize) -> Result<&mut Video> {
        self.videos.get_mut(index).ok_or(CoreError::VideoNotFound(index))
    }

    pub fn remove_video(&mut self, index: usize) -> Result<Video> {
        if index >= self.videos.len() {
            return Err(CoreError::VideoNotFound(index));
        }
        Ok(self.videos.remove(index))
    }

    /// Index of the video loaded from `path`, if any.
    pub fn find_video(&self, path: &Path) -> Option<usize> {
        self.videos.iter().position(|v| v.path == path)
    }

    /// Total number of clips across all videos.
    pub fn clip_count(&self) -> usize {
        self.videos.iter().map(|v| v.clips.len()).sum()
    }
}

impl Video {
    /// Start editing this video's clips. The editor works on a copy; hand
    /// it back with [`Video::store_clips`].
    pub fn editor(&self, capture: Box<dyn FrameCapture>) -> TimelineEditor {
        TimelineEditor::new(self.path.clone(), self.media.duration, self.clips.clone(), capture)
    }

    pub fn store_clips(&mut self, editor: TimelineEditor) {
        self.clips = editor.into_clips();
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        p.set_file_name(name);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PlaceholderCapture;
    use crate::drag::Modifiers;
    use tempfile::TempDir;

    fn labels() -> LabelSet {
        LabelSet::new(["walk", "run", "jump"])
    }

    fn sample_video() -> Video {
        let mut video = Video::new("/media/take_01.mp4", MediaInfo::with_duration(TimeMs(60_000)));
        video.clips.insert_sorted(Clip::new(TimeMs(1_000), TimeMs(4_000)).with_class(0));
        video.clips.insert_sorted(
            Clip::new(TimeMs(10_000), TimeMs(12_500))
                .with_class(2)
                .with_name("hop"),
        );
        let mut dimmed = Clip::new(TimeMs(20_000), TimeMs(21_000));
        dimmed.visibility = Visibility::Dimmed;
        dimmed.bounding_box = Some(BoundingBox::new(0.1, 0.2, 0.3, 0.4, 0.9));
        dimmed.thumbnail = Thumbnail::Frame {
            path: PathBuf::from("/cache/take_01/20000.jpg"),
        };
        video.clips.insert_sorted(dimmed);
        video
    }

    #[test]
    fn create_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_project.clipmark");

        let project = Project::new("Test Project", labels());
        let written = project.save_to_file(&path).unwrap();
        assert_eq!(written, path);

        let loaded = Project::load_from_file(&path).unwrap();
        assert_eq!(project, loaded);
    }

    #[test]
    fn save_load_with_videos_and_clips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("populated.clipmark");

        let mut project = Project::new("Populated", labels());
        project.add_video(sample_video());
        let mut open = Video::new("/media/take_02.mp4", MediaInfo::with_duration(TimeMs(5_000)));
        open.clips.insert_sorted(Clip::open(TimeMs(2_000)));
        project.add_video(open);

        project.save_to_file(&path).unwrap();
        let loaded = Project::load_from_file(&path).unwrap();
        assert_eq!(project, loaded);
        assert_eq!(loaded.clip_count(), 4);
        assert!(loaded.video(1).unwrap().clips.get(0).unwrap().is_open());
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let dir = TempDir::new().unwrap();
        let result = Project::load_from_file(dir.path().join("missing.clipmark"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn load_garbage_returns_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.clipmark");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Project::load_from_file(&path), Err(CoreError::Json(_))));
    }

    #[test]
    fn extension_appended_if_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_ext");

        let project = Project::new("ExtTest", LabelSet::default());
        let written = project.save_to_file(&path).unwrap();

        let expected_path = dir.path().join("no_ext.clipmark");
        assert_eq!(written, expected_path);
        assert!(expected_path.exists());

        let loaded = Project::load_from_file(&expected_path).unwrap();
        assert_eq!(project, loaded);
    }

    #[test]
    fn video_lookup() {
        let mut project = Project::new("Lookup", labels());
        assert_eq!(project.add_video(sample_video()), 0);
        assert!(matches!(project.video(3), Err(CoreError::VideoNotFound(3))));
        assert_eq!(project.find_video(Path::new("/media/take_01.mp4")), Some(0));
        assert_eq!(project.find_video(Path::new("/media/other.mp4")), None);
        project.video_mut(0).unwrap().clips.clear();
        assert_eq!(project.clip_count(), 0);
        assert!(project.remove_video(0).is_ok());
        assert!(project.remove_video(0).is_err());
    }

    #[test]
    fn editor_changes_are_stored_back() {
        let mut project = Project::new("Edit", labels());
        let index = project.add_video(sample_video());
        let video = project.video_mut(index).unwrap();

        let mut editor = video.editor(Box::new(PlaceholderCapture));
        let x = editor.mapper().pixel_from_seconds(50.0) as f64;
        editor.pointer_down(x, 0.0, Modifiers::NONE);
        editor.pointer_up(x, 0.0);
        editor.begin_clip().unwrap();
        editor.key_pressed(crate::editor::Key::End);
        editor.close_clip(1).unwrap();
        video.store_clips(editor);

        assert_eq!(video.clips.len(), 4);
        let last = video.clips.get(3).unwrap();
        assert_eq!(last.action_class, 1);
        assert_eq!(last.time_end(), Some(TimeMs(60_000)));
    }
}
