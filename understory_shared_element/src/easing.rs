// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for fixed-duration drives.

use crate::util::abs;

/// Easing curve applied to the linear time fraction of a timing drive.
///
/// The named curves match their CSS counterparts. All curves map `0.0` to
/// `0.0` and `1.0` to `1.0`; inputs are clamped to `[0, 1]` first.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Easing {
    /// No easing.
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    #[default]
    EaseInOut,
    /// Custom curve through `(x1, y1)` and `(x2, y2)`.
    ///
    /// `x1` and `x2` are clamped to `[0, 1]` so the curve stays a function of time.
    CubicBezier {
        /// First control point, x.
        x1: f64,
        /// First control point, y.
        y1: f64,
        /// Second control point, x.
        x2: f64,
        /// Second control point, y.
        y2: f64,
    },
}

impl Easing {
    /// Map a linear time fraction to an eased fraction.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                cubic_bezier(x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2, t)
            }
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_x(x1, x2, progress);
    bezier(y1, y2, t)
}

/// Newton-Raphson with a bisection fallback for flat derivatives.
fn solve_x(x1: f64, x2: f64, target: f64) -> f64 {
    let mut t = target;
    for _ in 0..8 {
        let err = bezier(x1, x2, t) - target;
        if abs(err) < 1e-7 {
            return t;
        }
        let d = bezier_derivative(x1, x2, t);
        if abs(d) < 1e-6 {
            break;
        }
        t = (t - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    t = target;
    for _ in 0..32 {
        let x = bezier(x1, x2, t);
        if abs(x - target) < 1e-7 {
            break;
        }
        if x < target {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

/// One coordinate of a cubic bezier with endpoints fixed at 0 and 1.
#[inline]
fn bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 6] = [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicBezier {
            x1: 0.4,
            y1: 0.0,
            x2: 0.2,
            y2: 1.0,
        },
    ];

    #[test]
    fn endpoints_are_fixed() {
        for curve in CURVES {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?} at 0");
            assert_eq!(curve.evaluate(1.0), 1.0, "{curve:?} at 1");
            assert_eq!(curve.evaluate(-3.0), 0.0, "{curve:?} below range");
            assert_eq!(curve.evaluate(7.0), 1.0, "{curve:?} above range");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_and_monotonic() {
        let e = Easing::EaseInOut;
        assert!((e.evaluate(0.5) - 0.5).abs() < 1e-4);
        assert!((e.evaluate(0.25) + e.evaluate(0.75) - 1.0).abs() < 1e-4);

        let mut last = 0.0;
        for i in 1..=100_u32 {
            let v = e.evaluate(f64::from(i) / 100.0);
            assert!(v > last, "not increasing at step {i}");
            last = v;
        }
    }

    #[test]
    fn ease_in_starts_slow_and_ease_out_starts_fast() {
        assert!(Easing::EaseIn.evaluate(0.2) < 0.2);
        assert!(Easing::EaseOut.evaluate(0.2) > 0.2);
        assert_eq!(Easing::Linear.evaluate(0.3), 0.3);
    }
}
