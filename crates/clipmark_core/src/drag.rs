use crate::hit_test::{Hit, HitRegion};
use crate::mapper::TimeCoordinateMapper;
use crate::types::TimeMs;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Switches a drag from scrubbing to resizing or moving a clip.
    pub edit: bool,
    /// Turns a click into jump-to-clip-and-play.
    pub jump: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        edit: false,
        jump: false,
    };
    pub const EDIT: Self = Self {
        edit: true,
        jump: false,
    };
    pub const JUMP: Self = Self {
        edit: false,
        jump: true,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    #[default]
    Free,
    EditBegin,
    EditEnd,
    Move,
}

impl DragState {
    pub fn is_editing(self) -> bool {
        self != DragState::Free
    }
}

/// The clip being edited and its in-progress range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    index: usize,
    original_start: TimeMs,
    original_end: TimeMs,
    start_seconds: f64,
    end_seconds: f64,
    /// Pointer x minus rectangle left at press time.
    anchor: f64,
    /// Rectangle left at press time.
    origin_left: f64,
}

/// Final range of a finished drag, handed back to the collection owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCommit {
    pub index: usize,
    pub original_start: TimeMs,
    pub original_end: TimeMs,
    pub start: TimeMs,
    pub end: TimeMs,
}

impl EditCommit {
    pub fn start_changed(&self) -> bool {
        self.start != self.original_start
    }

    pub fn changed(&self) -> bool {
        self.start_changed() || self.end != self.original_end
    }
}

/// Resize/move state machine for a single clip.
///
/// The in-progress range lives here, not in the collection, so the
/// collection stays sorted while the pointer is still moving. Releasing the
/// pointer or the edit modifier yields an [`EditCommit`] with whatever range
/// was reached; there is no rollback.
#[derive(Debug, Clone, Default)]
pub struct DragEditStateMachine {
    state: DragState,
    session: Option<DragSession>,
}

impl DragEditStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.session.map(|s| s.index)
    }

    /// Start editing from a modifier-held press. Returns false, leaving the
    /// machine untouched, when already editing or when nothing was hit.
    pub fn press(&mut self, hit: &Hit, start: TimeMs, end: TimeMs, x: f64) -> bool {
        if self.state.is_editing() {
            return false;
        }
        let Some(rect) = hit.target else {
            return false;
        };
        let state = match hit.region {
            HitRegion::OnBeginEdge => DragState::EditBegin,
            HitRegion::OnEndEdge => DragState::EditEnd,
            HitRegion::Inside => DragState::Move,
            HitRegion::Outside => return false,
        };
        let origin_left = rect.left as f64;
        self.session = Some(DragSession {
            index: rect.index,
            original_start: start,
            original_end: end,
            start_seconds: start.as_seconds(),
            end_seconds: end.as_seconds(),
            anchor: x - origin_left,
            origin_left,
        });
        self.state = state;
        tracing::debug!(index = rect.index, ?state, "drag started");
        true
    }

    /// Apply a pointer move. Returns true if the previewed range changed.
    pub fn drag(&mut self, x: f64, mapper: &TimeCoordinateMapper) -> bool {
        let state = self.state;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let before = (session.start_seconds, session.end_seconds);
        match state {
            DragState::Free => return false,
            DragState::EditBegin => session.start_seconds = mapper.seconds_at(x),
            DragState::EditEnd => session.end_seconds = mapper.seconds_at(x),
            DragState::Move => {
                let delta = (x - session.anchor - session.origin_left) * mapper.scale();
                session.start_seconds = mapper.clamp_seconds(session.original_start.as_seconds() + delta);
                session.end_seconds = mapper.clamp_seconds(session.original_end.as_seconds() + delta);
            }
        }
        before != (session.start_seconds, session.end_seconds)
    }

    /// In-progress range as `(index, start, end)`, already ordered.
    pub fn preview(&self) -> Option<(usize, TimeMs, TimeMs)> {
        self.session.map(|s| {
            let (start, end) = ordered(s.start_seconds, s.end_seconds);
            (s.index, start, end)
        })
    }

    /// Return to `Free`, yielding the edit reached so far.
    pub fn release(&mut self) -> Option<EditCommit> {
        self.state = DragState::Free;
        let session = self.session.take()?;
        let (start, end) = ordered(session.start_seconds, session.end_seconds);
        Some(EditCommit {
            index: session.index,
            original_start: session.original_start,
            original_end: session.original_end,
            start,
            end,
        })
    }
}

fn ordered(a: f64, b: f64) -> (TimeMs, TimeMs) {
    let (a, b) = (TimeMs::from_seconds(a), TimeMs::from_seconds(b));
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_test::ClipRect;
    use crate::types::Visibility;

    fn mapper() -> TimeCoordinateMapper {
        TimeCoordinateMapper::new(60.0, 800.0, 8.0)
    }

    fn hit(region: HitRegion, index: usize, start: f64, end: f64) -> Hit {
        let m = mapper();
        Hit {
            region,
            target: Some(ClipRect {
                index,
                left: m.pixel_from_seconds(start),
                right: m.pixel_from_seconds(end),
                top: 20.0,
                bottom: 60.0,
                visibility: Visibility::Shown,
            }),
        }
    }

    fn ms(s: f64) -> TimeMs {
        TimeMs::from_seconds(s)
    }

    #[test]
    fn starts_free() {
        let m = DragEditStateMachine::new();
        assert_eq!(m.state(), DragState::Free);
        assert_eq!(m.preview(), None);
    }

    #[test]
    fn press_selects_state_from_region() {
        let cases = [
            (HitRegion::OnBeginEdge, DragState::EditBegin),
            (HitRegion::OnEndEdge, DragState::EditEnd),
            (HitRegion::Inside, DragState::Move),
        ];
        for (region, expected) in cases {
            let mut m = DragEditStateMachine::new();
            assert!(m.press(&hit(region, 2, 10.0, 20.0), ms(10.0), ms(20.0), 200.0));
            assert_eq!(m.state(), expected);
            assert_eq!(m.editing_index(), Some(2));
        }
    }

    #[test]
    fn press_outside_stays_free() {
        let mut m = DragEditStateMachine::new();
        assert!(!m.press(&Hit::OUTSIDE, ms(0.0), ms(1.0), 10.0));
        assert_eq!(m.state(), DragState::Free);
        assert_eq!(m.release(), None);
    }

    #[test]
    fn second_press_while_editing_is_ignored() {
        let mut m = DragEditStateMachine::new();
        assert!(m.press(&hit(HitRegion::OnEndEdge, 0, 10.0, 20.0), ms(10.0), ms(20.0), 269.0));
        assert!(!m.press(&hit(HitRegion::Inside, 1, 30.0, 40.0), ms(30.0), ms(40.0), 400.0));
        assert_eq!(m.editing_index(), Some(0));
        assert_eq!(m.state(), DragState::EditEnd);
    }

    #[test]
    fn end_edge_drag_commits_new_end() {
        let map = mapper();
        let mut m = DragEditStateMachine::new();
        m.press(&hit(HitRegion::OnEndEdge, 0, 10.0, 20.0), ms(10.0), ms(20.0), 269.0);
        assert!(m.drag(300.0, &map));
        assert_eq!(m.state(), DragState::EditEnd);
        let commit = m.release().unwrap();
        assert_eq!(m.state(), DragState::Free);
        assert_eq!(commit.start, ms(10.0));
        assert_eq!(commit.end, TimeMs::from_seconds(map.seconds_from_pixel(300.0)));
        assert!(!commit.start_changed());
        assert!(commit.changed());
    }

    #[test]
    fn begin_edge_drag_is_clamped_to_track() {
        let map = mapper();
        let mut m = DragEditStateMachine::new();
        m.press(&hit(HitRegion::OnBeginEdge, 0, 10.0, 20.0), ms(10.0), ms(20.0), 139.0);
        m.drag(-50.0, &map);
        let commit = m.release().unwrap();
        assert_eq!(commit.start, TimeMs::ZERO);
        assert!(commit.start_changed());
    }

    #[test]
    fn dragging_begin_past_end_orders_range() {
        let map = mapper();
        let mut m = DragEditStateMachine::new();
        m.press(&hit(HitRegion::OnBeginEdge, 0, 10.0, 20.0), ms(10.0), ms(20.0), 139.0);
        let x = map.pixel_from_seconds(30.0) as f64;
        m.drag(x, &map);
        let (_, start, end) = m.preview().unwrap();
        assert_eq!(start, ms(20.0));
        assert!(end > start);
        let commit = m.release().unwrap();
        assert_eq!(commit.start, ms(20.0));
        assert_eq!(commit.end, end);
    }

    #[test]
    fn move_shifts_both_ends() {
        let map = mapper();
        let mut m = DragEditStateMachine::new();
        let press_x = 200.0;
        m.press(&hit(HitRegion::Inside, 0, 10.0, 20.0), ms(10.0), ms(20.0), press_x);
        m.drag(press_x + 50.0, &map);
        let commit = m.release().unwrap();
        let delta = 50.0 * map.scale();
        assert_eq!(commit.start, TimeMs::from_seconds(10.0 + delta));
        assert_eq!(commit.end, TimeMs::from_seconds(20.0 + delta));
        assert!(((commit.end - commit.start).0 - 10_000).abs() <= 1);
    }

    #[test]
    fn move_clamps_each_end_independently() {
        let map = mapper();
        let mut m = DragEditStateMachine::new();
        m.press(&hit(HitRegion::Inside, 0, 50.0, 58.0), ms(50.0), ms(58.0), 700.0);
        m.drag(780.0, &map);
        let commit = m.release().unwrap();
        assert_eq!(commit.end, ms(60.0));
        assert!(commit.start > ms(50.0));
        assert!(commit.end - commit.start < ms(8.0));
    }

    #[test]
    fn move_with_unknown_duration_keeps_clip_times() {
        let map = TimeCoordinateMapper::new(0.0, 800.0, 8.0);
        let rect = ClipRect {
            index: 0,
            left: map.pixel_from_seconds(100.0),
            right: map.pixel_from_seconds(200.0),
            top: 20.0,
            bottom: 60.0,
            visibility: Visibility::Shown,
        };
        let hit = Hit {
            region: HitRegion::Inside,
            target: Some(rect),
        };
        let mut m = DragEditStateMachine::new();
        assert!(m.press(&hit, ms(100.0), ms(200.0), 200.0));
        m.drag(201.0, &map);
        let commit = m.release().unwrap();
        assert_eq!(commit.start, ms(101.0));
        assert_eq!(commit.end, ms(201.0));
    }

    #[test]
    fn release_without_drag_reports_no_change() {
        let mut m = DragEditStateMachine::new();
        m.press(&hit(HitRegion::Inside, 3, 10.0, 20.0), ms(10.0), ms(20.0), 200.0);
        let commit = m.release().unwrap();
        assert_eq!(commit.index, 3);
        assert!(!commit.changed());
    }

    #[test]
    fn drag_when_free_does_nothing() {
        let mut m = DragEditStateMachine::new();
        assert!(!m.drag(100.0, &mapper()));
    }
}
