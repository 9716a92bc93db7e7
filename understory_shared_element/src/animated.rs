// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable animated scalar.

use alloc::rc::Rc;
use core::cell::Cell;

/// A shared, single-threaded numeric value that drives write and observers read.
///
/// Cloning an `AnimatedValue` yields another handle to the same cell, so a
/// host can keep one clone (for example to drive parallax from the animated
/// screen index) while the container drives another.
///
/// ```rust
/// use understory_shared_element::AnimatedValue;
///
/// let value = AnimatedValue::new(0.0);
/// let observer = value.clone();
/// value.set(0.5);
/// assert_eq!(observer.get(), 0.5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AnimatedValue(Rc<Cell<f64>>);

impl AnimatedValue {
    /// Create a value with an initial reading.
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Current reading.
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    /// Overwrite the current reading.
    pub fn set(&self, value: f64) {
        self.0.set(value);
    }

    /// Returns `true` if both handles observe the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
