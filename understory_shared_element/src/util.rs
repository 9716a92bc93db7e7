// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

#[cfg(feature = "std")]
pub(crate) fn exp(x: f64) -> f64 {
    x.exp()
}

#[cfg(not(feature = "std"))]
pub(crate) fn exp(x: f64) -> f64 {
    libm::exp(x)
}

#[cfg(feature = "std")]
pub(crate) fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(feature = "std")]
pub(crate) fn sin_cos(x: f64) -> (f64, f64) {
    x.sin_cos()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sin_cos(x: f64) -> (f64, f64) {
    libm::sincos(x)
}

#[cfg(feature = "std")]
pub(crate) fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(not(feature = "std"))]
pub(crate) fn abs(x: f64) -> f64 {
    libm::fabs(x)
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate each edge of two rectangles independently.
pub(crate) fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}
