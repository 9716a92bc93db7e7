// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-stepped drives and the atomic batch that runs them.
//!
//! A [`Drive`] moves one [`AnimatedValue`] from its reading at start time to a
//! target, either over a fixed duration or along a damped spring. A [`Batch`]
//! steps several drives with the same clock and only reports completion once
//! all of them have settled, so values driven together stay in lock-step.
//!
//! Time is measured in milliseconds.

use smallvec::SmallVec;

use crate::animated::AnimatedValue;
use crate::config::{SpringConfig, TimingConfig, TransitionConfig};
use crate::util::{abs, exp, lerp, sin_cos, sqrt};

/// Drives one value towards a target.
#[derive(Clone, Debug)]
pub struct Drive {
    value: AnimatedValue,
    from: f64,
    to: f64,
    elapsed: f64,
    mode: Mode,
    settled: bool,
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Timing(TimingConfig),
    Spring(SpringConfig),
}

impl Drive {
    /// Start driving `value` from its current reading to `to`.
    pub fn new(value: AnimatedValue, to: f64, config: &TransitionConfig) -> Self {
        let from = value.get();
        let mode = match *config {
            TransitionConfig::Timing(t) => Mode::Timing(t),
            TransitionConfig::Spring(s) => Mode::Spring(s),
        };
        Self {
            value,
            from,
            to,
            elapsed: 0.0,
            mode,
            settled: false,
        }
    }

    /// Returns `true` once the value has been written at its target.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advance by `dt` milliseconds and write the new reading.
    ///
    /// Returns `true` once settled. Negative steps are treated as zero.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled {
            return true;
        }
        self.elapsed += dt.max(0.0);
        let (position, done) = match self.mode {
            Mode::Timing(t) => timing_position(&t, self.from, self.to, self.elapsed),
            Mode::Spring(s) => spring_position(&s, self.from, self.to, self.elapsed),
        };
        if done {
            self.value.set(self.to);
            self.settled = true;
        } else {
            self.value.set(position);
        }
        self.settled
    }
}

fn timing_position(t: &TimingConfig, from: f64, to: f64, elapsed: f64) -> (f64, bool) {
    let active = elapsed - t.delay;
    if active < 0.0 {
        return (from, false);
    }
    if t.duration <= 0.0 || active >= t.duration {
        return (to, true);
    }
    (lerp(from, to, t.easing.evaluate(active / t.duration)), false)
}

/// Closed-form damped oscillator; `elapsed` is in milliseconds.
fn spring_position(s: &SpringConfig, from: f64, to: f64, elapsed: f64) -> (f64, bool) {
    if from == to {
        return (to, true);
    }
    let t = elapsed / 1000.0;
    let zeta = s.damping / (2.0 * sqrt(s.stiffness * s.mass));
    let omega0 = sqrt(s.stiffness / s.mass);
    let x0 = to - from;

    let (position, velocity) = if zeta < 1.0 {
        let omega1 = omega0 * sqrt(1.0 - zeta * zeta);
        let envelope = exp(-zeta * omega0 * t);
        let (sin, cos) = sin_cos(omega1 * t);
        let a = zeta * omega0 * x0 / omega1;
        let position = to - envelope * (a * sin + x0 * cos);
        let velocity = zeta * omega0 * envelope * (a * sin + x0 * cos)
            - envelope * (a * omega1 * cos - omega1 * x0 * sin);
        (position, velocity)
    } else {
        let envelope = exp(-omega0 * t);
        let position = to - envelope * (x0 + omega0 * x0 * t);
        let velocity = envelope * (t * x0 * omega0 * omega0);
        (position, velocity)
    };

    let overshooting = if from < to {
        position > to
    } else {
        position < to
    };
    if s.overshoot_clamping && overshooting {
        return (to, true);
    }
    let resting = abs(velocity) <= s.rest_speed_threshold
        && abs(to - position) <= s.rest_displacement_threshold;
    (position, resting)
}

/// Drives started and completed together.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    drives: SmallVec<[Drive; 2]>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drive; it starts with the next [`Batch::tick`].
    pub fn push(&mut self, drive: Drive) {
        self.drives.push(drive);
    }

    /// Step every drive by `dt` milliseconds.
    ///
    /// Returns `true` once every drive has settled. Settled drives hold their
    /// target while the others finish.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut settled = true;
        for drive in &mut self.drives {
            settled &= drive.step(dt);
        }
        settled
    }

    /// Returns `true` if every drive has settled.
    pub fn is_settled(&self) -> bool {
        self.drives.iter().all(Drive::is_settled)
    }
}
