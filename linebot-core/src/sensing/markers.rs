// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Course marker detection.
//!
//! Two side sensors look for tape outside the line. Their combined hit pattern forms a 2-bit
//! geometry code; the order in which codes change identifies the marker that was crossed:
//!
//! | Transition (to none)                  | Event                 |
//! | ------------------------------------- | --------------------- |
//! | right-only, preceded by none          | [`MarkerEvents::finish_line`] |
//! | left-only, preceded by none           | [`MarkerEvents::precision_toggle`] |
//! | a double hit within the last two steps | [`MarkerEvents::intersection`] |
//!
//! Intersection is checked independently of the other two and can fire alongside them.

/// How a raw marker reading maps to a hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkerPolarity {
    /// Reading at or below the threshold is a hit (reflective tape pulls the output low).
    ActiveLow,
    /// Reading at or above the threshold is a hit.
    ActiveHigh,
}

impl MarkerPolarity {
    #[inline]
    pub fn is_hit(self, reading: i32, threshold: i32) -> bool {
        match self {
            MarkerPolarity::ActiveLow => reading <= threshold,
            MarkerPolarity::ActiveHigh => reading >= threshold,
        }
    }
}

/// Which marker sensors currently see tape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MarkerState {
    #[default]
    None = 0,
    LeftOnly = 1,
    RightOnly = 2,
    Both = 3,
}

impl MarkerState {
    pub fn from_hits(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => MarkerState::None,
            (true, false) => MarkerState::LeftOnly,
            (false, true) => MarkerState::RightOnly,
            (true, true) => MarkerState::Both,
        }
    }

    /// 2-bit geometry code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Current hits plus the last two recorded transitions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerHistory {
    pub left_hit: bool,
    pub right_hit: bool,
    pub current: MarkerState,
    pub last: MarkerState,
    /// State before `last`.
    pub history0: MarkerState,
    /// State before `history0`.
    pub history1: MarkerState,
}

/// Result of one marker update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerEvents {
    pub state: MarkerState,
    pub finish_line: bool,
    pub precision_toggle: bool,
    pub intersection: bool,
}

impl MarkerEvents {
    /// At least one marker sensor sees tape this cycle.
    #[inline]
    pub fn any_hit(&self) -> bool {
        self.state != MarkerState::None
    }

    #[inline]
    pub fn any_event(&self) -> bool {
        self.finish_line || self.precision_toggle || self.intersection
    }
}

/// Geometry classifier with a two-deep transition history.
#[derive(Clone, Debug)]
pub struct MarkerStateMachine {
    threshold: i32,
    polarity: MarkerPolarity,
    history: MarkerHistory,
}

impl MarkerStateMachine {
    pub fn new(threshold: i32, polarity: MarkerPolarity) -> Self {
        Self {
            threshold,
            polarity,
            history: MarkerHistory::default(),
        }
    }

    #[inline]
    pub fn history(&self) -> MarkerHistory {
        self.history
    }

    /// Classify raw readings and advance the history.
    pub fn update(&mut self, left: u16, right: u16) -> MarkerEvents {
        let left_hit = self.polarity.is_hit(i32::from(left), self.threshold);
        let right_hit = self.polarity.is_hit(i32::from(right), self.threshold);
        self.update_hits(left_hit, right_hit)
    }

    /// Advance the history from already classified hits.
    pub fn update_hits(&mut self, left_hit: bool, right_hit: bool) -> MarkerEvents {
        use MarkerState as S;

        let h = &mut self.history;
        h.left_hit = left_hit;
        h.right_hit = right_hit;
        h.current = S::from_hits(left_hit, right_hit);

        let mut events = MarkerEvents {
            state: h.current,
            ..MarkerEvents::default()
        };

        if h.current != h.last {
            let to_none = h.current == S::None;
            if to_none && h.last == S::RightOnly && h.history0 == S::None {
                events.finish_line = true;
            } else if to_none && h.last == S::LeftOnly && h.history0 == S::None {
                events.precision_toggle = true;
            }

            events.intersection =
                to_none && (h.last == S::Both || h.history0 == S::Both || h.history1 == S::Both);

            h.history1 = h.history0;
            h.history0 = h.last;
            h.last = h.current;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: (bool, bool) = (false, false);
    const LEFT: (bool, bool) = (true, false);
    const RIGHT: (bool, bool) = (false, true);
    const BOTH: (bool, bool) = (true, true);

    /// Feed a script of hits, returning `(finish, toggle, intersection)` counts.
    fn run(script: &[(bool, bool)]) -> (u32, u32, u32) {
        let mut sm = MarkerStateMachine::new(180, MarkerPolarity::ActiveLow);
        let mut counts = (0, 0, 0);
        for &(l, r) in script {
            let ev = sm.update_hits(l, r);
            counts.0 += ev.finish_line as u32;
            counts.1 += ev.precision_toggle as u32;
            counts.2 += ev.intersection as u32;
        }
        counts
    }

    #[test]
    fn polarity_decides_hits() {
        assert!(MarkerPolarity::ActiveLow.is_hit(180, 180));
        assert!(MarkerPolarity::ActiveLow.is_hit(40, 180));
        assert!(!MarkerPolarity::ActiveLow.is_hit(181, 180));

        assert!(MarkerPolarity::ActiveHigh.is_hit(180, 180));
        assert!(!MarkerPolarity::ActiveHigh.is_hit(179, 180));
    }

    #[test]
    fn state_encoding() {
        assert_eq!(MarkerState::from_hits(false, false).code(), 0);
        assert_eq!(MarkerState::from_hits(true, false).code(), 1);
        assert_eq!(MarkerState::from_hits(false, true).code(), 2);
        assert_eq!(MarkerState::from_hits(true, true).code(), 3);
    }

    #[test]
    fn raw_readings_are_classified() {
        let mut sm = MarkerStateMachine::new(180, MarkerPolarity::ActiveLow);
        let ev = sm.update(50, 900);
        assert_eq!(ev.state, MarkerState::LeftOnly);
        assert!(ev.any_hit());

        let h = sm.history();
        assert!(h.left_hit);
        assert!(!h.right_hit);
    }

    #[test]
    fn right_pulse_is_finish_line_only() {
        assert_eq!(run(&[NONE, RIGHT, RIGHT, NONE]), (1, 0, 0));
    }

    #[test]
    fn left_pulse_toggles_precision_only() {
        assert_eq!(run(&[NONE, LEFT, NONE, NONE]), (0, 1, 0));
    }

    #[test]
    fn events_fire_on_transition_not_while_held() {
        let mut sm = MarkerStateMachine::new(180, MarkerPolarity::ActiveLow);
        sm.update_hits(false, true);
        assert!(sm.update_hits(false, false).finish_line);
        assert!(!sm.update_hits(false, false).any_event());
        assert!(!sm.update_hits(false, false).any_event());
    }

    #[test]
    fn straight_double_hit_is_intersection() {
        assert_eq!(run(&[NONE, BOTH, NONE]), (0, 0, 1));
    }

    #[test]
    fn staggered_crossing_is_intersection_not_finish() {
        // Right sensor reaches the cross line first, then both, then the right leaves last.
        assert_eq!(run(&[RIGHT, BOTH, RIGHT, NONE]), (0, 0, 1));
        assert_eq!(run(&[LEFT, BOTH, LEFT, NONE]), (0, 0, 1));
    }

    #[test]
    fn double_hit_two_transitions_back_still_counts() {
        // history1 == Both when returning to none.
        assert_eq!(run(&[BOTH, LEFT, RIGHT, NONE]), (0, 0, 1));
    }

    #[test]
    fn double_hit_three_transitions_back_is_forgotten() {
        assert_eq!(run(&[BOTH, LEFT, RIGHT, LEFT, NONE]), (0, 0, 0));
    }

    #[test]
    fn finish_and_intersection_can_co_fire() {
        // Both -> None -> Right -> None: last=Right, history0=None, history1=Both.
        let mut sm = MarkerStateMachine::new(180, MarkerPolarity::ActiveLow);
        sm.update_hits(true, true);
        let first = sm.update_hits(false, false);
        assert!(first.intersection);

        sm.update_hits(false, true);
        let ev = sm.update_hits(false, false);
        assert!(ev.finish_line);
        assert!(ev.intersection);
        assert!(!ev.precision_toggle);
    }

    #[test]
    fn toggle_and_intersection_can_co_fire() {
        // Both -> None -> Left -> None: the toggle fires with the double hit still in history1.
        assert_eq!(run(&[BOTH, NONE, LEFT, NONE]), (0, 1, 2));
    }

    #[test]
    fn history_shifts_only_on_change() {
        let mut sm = MarkerStateMachine::new(180, MarkerPolarity::ActiveLow);
        sm.update_hits(true, false);
        sm.update_hits(true, false);
        sm.update_hits(true, true);

        let h = sm.history();
        assert_eq!(h.last, MarkerState::Both);
        assert_eq!(h.history0, MarkerState::LeftOnly);
        assert_eq!(h.history1, MarkerState::None);
    }
}
