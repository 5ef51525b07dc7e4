use crate::engine::sections::{EntryDirection, SectionId, TOTAL_SECTIONS};

pub const SETTLE_MS: f64 = 800.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Idle { at: usize },
    Transitioning { from: usize, to: usize, direction: EntryDirection },
}

/// Off-screen starting point of a sliding section, as a CSS transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideOffset {
    Below,
    Above,
    RightOf,
    LeftOf,
}

impl SlideOffset {
    pub fn css(self) -> &'static str {
        match self {
            SlideOffset::Below => "translateY(100vh)",
            SlideOffset::Above => "translateY(-100vh)",
            SlideOffset::RightOf => "translateX(100vw)",
            SlideOffset::LeftOf => "translateX(-100vw)",
        }
    }
}

impl EntryDirection {
    /// Where the incoming section starts and where the outgoing one goes.
    pub fn offsets(self) -> (SlideOffset, SlideOffset) {
        match self {
            EntryDirection::Bottom => (SlideOffset::Below, SlideOffset::Above),
            EntryDirection::Right => (SlideOffset::RightOf, SlideOffset::LeftOf),
            EntryDirection::Left => (SlideOffset::LeftOf, SlideOffset::RightOf),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: EntryDirection,
    pub incoming_from: SlideOffset,
    pub outgoing_to: SlideOffset,
}

/// Owns the current-section state. Single writer: only `go_to` and
/// `settle` change it.
#[derive(Debug)]
pub struct Navigator {
    state: NavState,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            state: NavState::Idle { at: 0 },
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, NavState::Transitioning { .. })
    }

    /// Settled index; during a transition this is still the section being left.
    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        match self.state {
            NavState::Idle { at } => at,
            NavState::Transitioning { from, .. } => from,
        }
    }

    /// What readers should treat as current: the target once a transition began.
    pub fn current_section(&self) -> usize {
        match self.state {
            NavState::Idle { at } => at,
            NavState::Transitioning { to, .. } => to,
        }
    }

    /// Starts a transition to `target`, or returns `None` when the request is
    /// dropped (same section, out of range, or a transition already running).
    pub fn go_to(&mut self, target: usize) -> Option<Transition> {
        let NavState::Idle { at } = self.state else {
            return None;
        };
        if target == at || target >= TOTAL_SECTIONS {
            return None;
        }

        let direction = if target > at {
            SectionId::from_index(at)?.entry_direction()
        } else {
            EntryDirection::Left
        };
        let (incoming_from, outgoing_to) = direction.offsets();

        self.state = NavState::Transitioning { from: at, to: target, direction };

        Some(Transition {
            from: at,
            to: target,
            direction,
            incoming_from,
            outgoing_to,
        })
    }

    pub fn next(&mut self) -> Option<Transition> {
        match self.state {
            NavState::Idle { at } if at + 1 < TOTAL_SECTIONS => self.go_to(at + 1),
            _ => None,
        }
    }

    pub fn prev(&mut self) -> Option<Transition> {
        match self.state {
            NavState::Idle { at } if at > 0 => self.go_to(at - 1),
            _ => None,
        }
    }

    /// Finishes the running transition. Returns the `(from, to)` pair that
    /// settled, or `None` if nothing was in flight.
    pub fn settle(&mut self) -> Option<(usize, usize)> {
        match self.state {
            NavState::Transitioning { from, to, .. } => {
                self.state = NavState::Idle { at: to };
                Some((from, to))
            }
            NavState::Idle { .. } => None,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_at(index: usize) -> Navigator {
        let mut nav = Navigator::new();
        if index != 0 {
            nav.go_to(index).unwrap();
            nav.settle();
        }
        nav
    }

    #[test]
    fn starts_idle_at_first_section() {
        let nav = Navigator::new();
        assert_eq!(nav.state(), NavState::Idle { at: 0 });
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn go_to_enters_transition_and_settles_on_target() {
        let mut nav = Navigator::new();
        let transition = nav.go_to(3).unwrap();
        assert_eq!(transition.from, 0);
        assert_eq!(transition.to, 3);
        assert!(nav.is_transitioning());
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.current_section(), 3);

        assert_eq!(nav.settle(), Some((0, 3)));
        assert_eq!(nav.state(), NavState::Idle { at: 3 });
        assert_eq!(nav.settle(), None);
    }

    #[test]
    fn repeated_requests_while_in_flight_are_dropped() {
        let mut nav = Navigator::new();
        nav.go_to(2).unwrap();
        let state = nav.state();
        assert_eq!(nav.go_to(2), None);
        assert_eq!(nav.go_to(5), None);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.state(), state);
    }

    #[test]
    fn invalid_targets_are_ignored() {
        let mut nav = settled_at(4);
        assert_eq!(nav.go_to(4), None);
        assert_eq!(nav.go_to(TOTAL_SECTIONS), None);
        assert_eq!(nav.go_to(usize::MAX), None);
        assert_eq!(nav.state(), NavState::Idle { at: 4 });
    }

    #[test]
    fn boundaries_have_no_next_or_prev() {
        let mut first = Navigator::new();
        assert_eq!(first.prev(), None);
        assert_eq!(first.state(), NavState::Idle { at: 0 });

        let mut last = settled_at(TOTAL_SECTIONS - 1);
        assert_eq!(last.next(), None);
        assert_eq!(last.state(), NavState::Idle { at: TOTAL_SECTIONS - 1 });
    }

    #[test]
    fn forward_direction_follows_the_leaving_section() {
        let expected = [
            EntryDirection::Bottom,
            EntryDirection::Right,
            EntryDirection::Left,
            EntryDirection::Bottom,
            EntryDirection::Right,
            EntryDirection::Left,
        ];
        for (from, direction) in expected.iter().enumerate() {
            let mut nav = settled_at(from);
            let transition = nav.next().unwrap();
            assert_eq!(transition.direction, *direction, "leaving section {}", from);
        }
    }

    #[test]
    fn backward_always_enters_left_and_exits_right() {
        for from in 1..TOTAL_SECTIONS {
            let mut nav = settled_at(from);
            let transition = nav.prev().unwrap();
            assert_eq!(transition.direction, EntryDirection::Left);
            assert_eq!(transition.incoming_from, SlideOffset::LeftOf);
            assert_eq!(transition.outgoing_to, SlideOffset::RightOf);
        }
    }

    #[test]
    fn offsets_are_opposite() {
        assert_eq!(EntryDirection::Bottom.offsets(), (SlideOffset::Below, SlideOffset::Above));
        assert_eq!(SlideOffset::Below.css(), "translateY(100vh)");
        assert_eq!(SlideOffset::LeftOf.css(), "translateX(-100vw)");
    }
}
