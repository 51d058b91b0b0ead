pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 16;

/// Integer zoom factor that stretches the timeline width.
///
/// Zooming in from 1 steps to 2; every other step moves by 2, so the
/// sequence is 1, 2, 4, 6, ... 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomController {
    factor: u32,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self { factor: MIN_ZOOM }
    }
}

impl ZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Returns true if the factor changed.
    pub fn zoom_in(&mut self) -> bool {
        let step = if self.factor == 1 { 1 } else { 2 };
        self.set_factor(self.factor.saturating_add(step))
    }

    pub fn zoom_out(&mut self) -> bool {
        let step = if self.factor == 1 { 1 } else { 2 };
        self.set_factor(self.factor.saturating_sub(step))
    }

    pub fn set_factor(&mut self, factor: u32) -> bool {
        let clamped = factor.clamp(MIN_ZOOM, MAX_ZOOM);
        if clamped == self.factor {
            return false;
        }
        tracing::debug!(from = self.factor, to = clamped, "zoom changed");
        self.factor = clamped;
        true
    }

    pub fn visible_width(&self, base_width: f64) -> f64 {
        self.factor as f64 * base_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_sequence() {
        let mut z = ZoomController::new();
        let mut seen = vec![z.factor()];
        while z.zoom_in() {
            seen.push(z.factor());
        }
        assert_eq!(seen, vec![1, 2, 4, 6, 8, 10, 12, 14, 16]);
    }

    #[test]
    fn factor_never_leaves_bounds() {
        let mut z = ZoomController::new();
        for _ in 0..50 {
            z.zoom_in();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&z.factor()));
        }
        assert_eq!(z.factor(), MAX_ZOOM);
        for _ in 0..50 {
            z.zoom_out();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&z.factor()));
        }
        assert_eq!(z.factor(), MIN_ZOOM);
        assert!(!z.zoom_out());
    }

    #[test]
    fn set_factor_clamps() {
        let mut z = ZoomController::new();
        assert!(z.set_factor(40));
        assert_eq!(z.factor(), 16);
        assert!(z.set_factor(0));
        assert_eq!(z.factor(), 1);
    }

    #[test]
    fn odd_factor_steps_down_by_two() {
        let mut z = ZoomController::new();
        z.set_factor(3);
        z.zoom_out();
        assert_eq!(z.factor(), 1);
    }

    #[test]
    fn visible_width_scales_base() {
        let mut z = ZoomController::new();
        assert_eq!(z.visible_width(800.0), 800.0);
        z.set_factor(4);
        assert_eq!(z.visible_width(800.0), 3200.0);
    }
}
