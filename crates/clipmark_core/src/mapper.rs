/// Durations at or below this are treated as "not loaded yet".
const DURATION_EPSILON: f64 = 1e-6;

/// Horizontal layout of the timeline. Pixel positions are in timeline
/// content space, before any scrolling applied by the surrounding view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// Width at zoom factor 1.
    pub base_width: f64,
    /// Empty margin kept at both ends of the track.
    pub inset: f64,
    /// Vertical band the clip rectangles occupy.
    pub clip_top: f64,
    pub clip_height: f64,
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self {
            base_width: 800.0,
            inset: 8.0,
            clip_top: 20.0,
            clip_height: 40.0,
        }
    }
}

impl TimelineGeometry {
    pub fn clip_bottom(&self) -> f64 {
        self.clip_top + self.clip_height
    }
}

/// Converts between seconds of media and horizontal pixels.
///
/// Built on demand from the current width and duration; never keep one
/// across zoom, resize or media changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeCoordinateMapper {
    duration_seconds: f64,
    width: f64,
    inset: f64,
}

impl TimeCoordinateMapper {
    pub fn new(duration_seconds: f64, width: f64, inset: f64) -> Self {
        Self {
            duration_seconds,
            width,
            inset,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn inset(&self) -> f64 {
        self.inset
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Seconds per pixel. Falls back to 1.0 while the duration is unknown
    /// or the track has no drawable width.
    pub fn scale(&self) -> f64 {
        let track = self.width - 2.0 * self.inset;
        if self.duration_seconds <= DURATION_EPSILON || track <= 0.0 {
            1.0
        } else {
            self.duration_seconds / track
        }
    }

    pub fn pixel_from_seconds(&self, seconds: f64) -> i32 {
        (seconds / self.scale() + self.inset).round() as i32
    }

    pub fn seconds_from_pixel(&self, pixel: f64) -> f64 {
        (pixel - self.inset) * self.scale()
    }

    /// Clamp a pointer position into the drawable track.
    pub fn clamp_pixel(&self, pixel: f64) -> f64 {
        let max = (self.width - self.inset).max(self.inset);
        pixel.clamp(self.inset, max)
    }

    /// Seconds under a pointer, after clamping it onto the track.
    pub fn seconds_at(&self, pixel: f64) -> f64 {
        self.seconds_from_pixel(self.clamp_pixel(pixel))
    }

    /// Clamp into `[0, duration]`. With the duration still unknown only the
    /// lower bound applies.
    pub fn clamp_seconds(&self, seconds: f64) -> f64 {
        if self.duration_seconds <= DURATION_EPSILON {
            return seconds.max(0.0);
        }
        seconds.clamp(0.0, self.duration_seconds)
    }
}
