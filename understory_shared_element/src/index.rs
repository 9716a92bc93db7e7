// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen index state of one container.

use crate::ScreenIndex;
use crate::animated::AnimatedValue;

/// Tracks which screen is settled, which one is requested, and the animated
/// index that moves between them.
///
/// `current` only advances through [`commit`](Self::commit), which the
/// orchestrator calls once a batch completes. `next` follows the externally
/// driven active index immediately.
///
/// ```rust
/// use understory_shared_element::{AnimatedValue, ScreenIndexController};
///
/// let mut index = ScreenIndexController::new(0, AnimatedValue::new(0.0));
/// assert!(!index.transitioning());
///
/// index.set_active_index(1);
/// assert_eq!(index.current_index(), 0);
/// assert_eq!(index.next_index(), 1);
/// assert!(index.transitioning());
/// ```
#[derive(Clone, Debug)]
pub struct ScreenIndexController {
    active: ScreenIndex,
    previous_active: ScreenIndex,
    current: ScreenIndex,
    next: ScreenIndex,
    animated: AnimatedValue,
}

impl ScreenIndexController {
    /// Start settled on `active`.
    ///
    /// `animated` is snapped to `active` so the first transition starts from
    /// the settled screen.
    pub fn new(active: ScreenIndex, animated: AnimatedValue) -> Self {
        animated.set(f64::from(active));
        Self {
            active,
            previous_active: active,
            current: active,
            next: active,
            animated,
        }
    }

    /// Record a new externally requested index.
    pub fn set_active_index(&mut self, index: ScreenIndex) {
        self.previous_active = self.active;
        self.active = index;
        self.next = index;
    }

    /// End of an evaluation pass; the intent change has been observed.
    pub fn settle(&mut self) {
        self.previous_active = self.active;
    }

    /// Returns `true` while the requested index differs from the settled one,
    /// or during the pass in which the request changed.
    pub fn transitioning(&self) -> bool {
        self.next != self.current || self.previous_active != self.active
    }

    /// Latest externally requested index.
    pub fn active_index(&self) -> ScreenIndex {
        self.active
    }

    /// Settled index.
    pub fn current_index(&self) -> ScreenIndex {
        self.current
    }

    /// Index being transitioned to.
    pub fn next_index(&self) -> ScreenIndex {
        self.next
    }

    /// Observable animated index.
    pub fn animated_index(&self) -> &AnimatedValue {
        &self.animated
    }

    pub(crate) fn commit(&mut self, index: ScreenIndex) {
        self.current = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snaps_animated_value_to_active() {
        let animated = AnimatedValue::new(5.0);
        let index = ScreenIndexController::new(3, animated.clone());
        assert_eq!(animated.get(), 3.0);
        assert!(index.animated_index().ptr_eq(&animated));
        assert_eq!(index.current_index(), 3);
    }

    #[test]
    fn intent_change_is_transitioning_until_settled() {
        let mut index = ScreenIndexController::new(0, AnimatedValue::new(0.0));
        // Re-requesting the settled index is not a change.
        index.set_active_index(0);
        assert!(!index.transitioning());

        index.set_active_index(2);
        index.set_active_index(2);
        assert_eq!(index.next_index(), 2);
        index.commit(2);
        assert!(!index.transitioning());

        index.set_active_index(1);
        index.commit(1);
        assert!(index.transitioning());
        index.settle();
        assert!(!index.transitioning());
    }

    #[test]
    fn negative_indices_are_accepted() {
        let mut index = ScreenIndexController::new(0, AnimatedValue::new(0.0));
        index.set_active_index(-1);
        assert_eq!(index.next_index(), -1);
        assert_eq!(index.active_index(), -1);
    }
}
