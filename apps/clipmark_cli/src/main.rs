//! clipmark: mark labeled action clips on videos from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clipmark_core::capture::{FrameCapture, PlaceholderCapture};
use clipmark_core::types::{LabelSet, Project, TimeMs, Visibility};
use clipmark_core::{export, TimelineEditor};
use clipmark_media::FfmpegFrameCapture;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "clipmark")]
#[command(about = "Mark and label action clips on video timelines")]
#[command(version)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Where extracted thumbnails are cached.
    #[arg(long, global = true, default_value = ".clipmark-cache")]
    cache_dir: PathBuf,

    /// Skip ffmpeg and keep placeholder thumbnails.
    #[arg(long, global = true)]
    no_thumbnails: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty project.
    New {
        project: PathBuf,
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated action class names.
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
    /// Probe a media file and add it to the project.
    AddVideo { project: PathBuf, media: PathBuf },
    /// Mark a clip between two times, in seconds.
    Mark {
        project: PathBuf,
        #[arg(long, default_value_t = 0)]
        video: usize,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        /// Action class index; omit for unclassified.
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        class: i32,
        #[arg(long)]
        name: Option<String>,
    },
    /// Flip a clip between hidden and shown.
    Toggle {
        project: PathBuf,
        #[arg(long, default_value_t = 0)]
        video: usize,
        #[arg(long)]
        clip: usize,
    },
    /// Set every clip of a video to one visibility.
    ShowAll {
        project: PathBuf,
        #[arg(long, default_value_t = 0)]
        video: usize,
        /// Dim instead of show.
        #[arg(long)]
        dim: bool,
    },
    /// Remove a clip.
    Remove {
        project: PathBuf,
        #[arg(long, default_value_t = 0)]
        video: usize,
        #[arg(long)]
        clip: usize,
    },
    /// Print every video and its clips.
    List { project: PathBuf },
    /// Write shown clips as JSON.
    Export { project: PathBuf, output: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_target(false)
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::New {
            project,
            name,
            labels,
        } => {
            let name = name.clone().unwrap_or_else(|| file_stem(project));
            let labels = LabelSet::new(labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()));
            let written = Project::new(name, labels)
                .save_to_file(project)
                .with_context(|| format!("failed to create {}", project.display()))?;
            println!("{}", written.display());
        }
        Command::AddVideo { project, media } => {
            let mut doc = load(project)?;
            if doc.find_video(media).is_some() {
                bail!("{} is already in the project", media.display());
            }
            let video = clipmark_media::import_video(media)
                .with_context(|| format!("failed to probe {}", media.display()))?;
            info!(video = %video.name(), duration = %video.media.duration, "video added");
            let index = doc.add_video(video);
            save(&doc, project)?;
            println!("{index}");
        }
        Command::Mark {
            project,
            video,
            start,
            end,
            class,
            name,
        } => {
            let mut doc = load(project)?;
            let frames = capture(args);
            let target = doc.video_mut(*video)?;
            let duration = target.media.duration;
            if *start < 0.0 || TimeMs::from_seconds(*end) > duration {
                bail!("clip {start}s..{end}s lies outside the video (0s..{}s)", duration.as_seconds());
            }
            let mut editor = target.editor(frames);
            let index = mark(&mut editor, *start, *end, *class)?;
            if let Some(name) = name {
                editor.rename_clip(index, name.as_str())?;
            }
            target.store_clips(editor);
            save(&doc, project)?;
            println!("{index}");
        }
        Command::Toggle {
            project,
            video,
            clip,
        } => {
            let mut doc = load(project)?;
            let target = doc.video_mut(*video)?;
            let mut editor = target.editor(Box::new(PlaceholderCapture));
            let visibility = editor.toggle_visibility(*clip)?;
            target.store_clips(editor);
            save(&doc, project)?;
            println!("{visibility:?}");
        }
        Command::ShowAll {
            project,
            video,
            dim,
        } => {
            let mut doc = load(project)?;
            let target = doc.video_mut(*video)?;
            let mut editor = target.editor(Box::new(PlaceholderCapture));
            editor.set_visibility_all(if *dim { Visibility::Dimmed } else { Visibility::Shown });
            target.store_clips(editor);
            save(&doc, project)?;
        }
        Command::Remove {
            project,
            video,
            clip,
        } => {
            let mut doc = load(project)?;
            let target = doc.video_mut(*video)?;
            let mut editor = target.editor(Box::new(PlaceholderCapture));
            let removed = editor.remove_clip(*clip)?;
            target.store_clips(editor);
            save(&doc, project)?;
            info!(start = %removed.time_start(), "clip removed");
        }
        Command::List { project } => {
            let doc = load(project)?;
            list(&doc);
        }
        Command::Export { project, output } => {
            let doc = load(project)?;
            let count = export::write_json(output, &doc)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("{count} clips written to {}", output.display());
        }
    }
    Ok(())
}

/// Drive the editor the way a user would: seek to the start, open a clip,
/// seek to the end, close it.
fn mark(editor: &mut TimelineEditor, start: f64, end: f64, class: i32) -> Result<usize> {
    editor.on_position_changed(start);
    editor.begin_clip()?;
    editor.on_position_changed(end);
    Ok(editor.close_clip(class)?)
}

fn capture(args: &Args) -> Box<dyn FrameCapture> {
    if args.no_thumbnails {
        Box::new(PlaceholderCapture)
    } else {
        Box::new(FfmpegFrameCapture::new(&args.cache_dir))
    }
}

fn list(project: &Project) {
    println!("{} ({} videos, {} clips)", project.name, project.videos.len(), project.clip_count());
    for (vi, video) in project.videos.iter().enumerate() {
        println!("[{vi}] {} {}", video.name(), video.media.duration);
        for (ci, clip) in video.clips.iter().enumerate() {
            let end = clip
                .time_end()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "open".to_string());
            println!(
                "  {ci:>3} {} - {} {:<12} {:?} {}",
                clip.time_start(),
                end,
                project.labels.label_for(clip.action_class),
                clip.visibility,
                clip.name
            );
        }
    }
}

fn load(path: &Path) -> Result<Project> {
    Project::load_from_file(path).with_context(|| format!("failed to open {}", path.display()))
}

fn save(project: &Project, path: &Path) -> Result<()> {
    project
        .save_to_file(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}
