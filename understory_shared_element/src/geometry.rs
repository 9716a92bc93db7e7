// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement boundary and per-frame interpolation of a matched pair.

use alloc::string::String;

use kurbo::{Point, Rect, Size};

use crate::ScreenIndex;
use crate::config::{AnimationStyle, ElementConfig, Resize};
use crate::util::lerp_rect;

/// Reports an element's frame in the coordinate space of an ancestor.
///
/// Measurement belongs to the host toolkit. Returning `None` (element not laid
/// out yet, detached, and so on) means no transition is drawn for that pair.
/// Closures with the right signature implement the trait.
pub trait Measure<E, A> {
    /// Frame of `element` relative to `ancestor`.
    fn measure(&self, element: &E, ancestor: &A) -> Option<Rect>;
}

impl<E, A, F> Measure<E, A> for F
where
    F: Fn(&E, &A) -> Option<Rect>,
{
    fn measure(&self, element: &E, ancestor: &A) -> Option<Rect> {
        self(element, ancestor)
    }
}

/// One side of a matched pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint<E, A> {
    /// Screen the element lives on.
    pub screen: ScreenIndex,
    /// Element handle.
    pub element: E,
    /// Coordinate-space anchor of `screen`.
    pub ancestor: A,
}

/// A matched element pair that will be animated in the next batch.
///
/// Descriptors are rebuilt on every diff and never stored past the batch that
/// uses them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionDescriptor<E, A> {
    /// Logical id shared by both elements.
    pub id: String,
    /// Outgoing side.
    pub start: Endpoint<E, A>,
    /// Incoming side.
    pub end: Endpoint<E, A>,
    /// Config resolved for the outgoing element.
    pub config: ElementConfig,
}

impl<E, A> TransitionDescriptor<E, A> {
    /// Measure both endpoints; `None` if either cannot be measured.
    pub fn resolve<M: Measure<E, A> + ?Sized>(&self, measure: &M) -> Option<ResolvedTransition> {
        Some(ResolvedTransition {
            start: measure.measure(&self.start.element, &self.start.ancestor)?,
            end: measure.measure(&self.end.element, &self.end.ancestor)?,
            config: self.config,
        })
    }
}

/// A matched pair with both endpoints measured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedTransition {
    /// Frame of the outgoing element.
    pub start: Rect,
    /// Frame of the incoming element.
    pub end: Rect,
    /// Config of the outgoing element.
    pub config: ElementConfig,
}

/// Everything needed to draw one pair at one progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionFrame {
    /// Interpolated outer bounds.
    pub bounds: Rect,
    /// Where the outgoing element's content is drawn.
    pub start_content: Rect,
    /// Where the incoming element's content is drawn.
    pub end_content: Rect,
    /// Opacity of the outgoing content.
    pub start_opacity: f64,
    /// Opacity of the incoming content.
    pub end_opacity: f64,
    /// Content must be clipped to `bounds`.
    pub clip: bool,
    /// Diagnostics were requested for this pair.
    pub debug: bool,
}

impl ResolvedTransition {
    /// Frame at `progress` (0 = start, 1 = end).
    ///
    /// Progress outside `[0, 1]` (for example from a spring that overshoots)
    /// extrapolates the bounds; opacities are clamped.
    ///
    /// ```rust
    /// use kurbo::Rect;
    /// use understory_shared_element::{ElementConfig, ResolvedTransition};
    ///
    /// let pair = ResolvedTransition {
    ///     start: Rect::new(0.0, 0.0, 100.0, 50.0),
    ///     end: Rect::new(0.0, 100.0, 400.0, 700.0),
    ///     config: ElementConfig::default(),
    /// };
    /// let mid = pair.frame_at(0.5);
    /// assert_eq!(mid.bounds, Rect::new(0.0, 50.0, 250.0, 375.0));
    /// assert_eq!(mid.start_content, mid.bounds);
    /// ```
    pub fn frame_at(&self, progress: f64) -> TransitionFrame {
        let bounds = lerp_rect(self.start, self.end, progress);
        let (start_content, end_content) = match self.config.resize {
            Resize::Auto | Resize::Stretch => (bounds, bounds),
            Resize::Clip | Resize::None => {
                let anchor = self.config.align.anchor();
                (
                    place(bounds, self.start.size(), anchor),
                    place(bounds, self.end.size(), anchor),
                )
            }
        };
        let t = progress.clamp(0.0, 1.0);
        let (start_opacity, end_opacity) = match self.config.animation {
            AnimationStyle::Move => (1.0, 0.0),
            AnimationStyle::Fade => (1.0 - t, t),
            AnimationStyle::FadeIn => (0.0, t),
            AnimationStyle::FadeOut => (1.0 - t, 0.0),
        };
        TransitionFrame {
            bounds,
            start_content,
            end_content,
            start_opacity,
            end_opacity,
            clip: self.config.resize == Resize::Clip,
            debug: self.config.debug,
        }
    }
}

fn place(bounds: Rect, size: Size, (ax, ay): (f64, f64)) -> Rect {
    let origin = Point::new(
        bounds.x0 + (bounds.width() - size.width) * ax,
        bounds.y0 + (bounds.height() - size.height) * ay,
    );
    Rect::from_origin_size(origin, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Align;

    fn pair(config: ElementConfig) -> ResolvedTransition {
        ResolvedTransition {
            start: Rect::new(0.0, 0.0, 40.0, 20.0),
            end: Rect::new(100.0, 100.0, 200.0, 300.0),
            config,
        }
    }

    #[test]
    fn endpoints_match_measured_frames() {
        let p = pair(ElementConfig::default());
        assert_eq!(p.frame_at(0.0).bounds, p.start);
        assert_eq!(p.frame_at(1.0).bounds, p.end);
    }

    #[test]
    fn clip_keeps_content_size_and_aligns_it() {
        let p = pair(ElementConfig {
            resize: Resize::Clip,
            align: Align::LeftTop,
            ..ElementConfig::default()
        });
        let f = p.frame_at(0.5);
        assert!(f.clip);
        assert_eq!(f.bounds, Rect::new(50.0, 50.0, 120.0, 160.0));
        assert_eq!(f.start_content, Rect::new(50.0, 50.0, 90.0, 70.0));
        assert_eq!(f.end_content, Rect::new(50.0, 50.0, 150.0, 250.0));
    }

    #[test]
    fn none_resize_centers_without_clipping() {
        let p = pair(ElementConfig {
            resize: Resize::None,
            ..ElementConfig::default()
        });
        let f = p.frame_at(1.0);
        assert!(!f.clip);
        assert_eq!(f.end_content, p.end);
        // 40x20 centered inside 100x200 at (100, 100).
        assert_eq!(f.start_content, Rect::new(130.0, 190.0, 170.0, 210.0));
    }

    #[test]
    fn opacity_follows_animation_style() {
        let cases = [
            (AnimationStyle::Move, (1.0, 0.0)),
            (AnimationStyle::Fade, (0.75, 0.25)),
            (AnimationStyle::FadeIn, (0.0, 0.25)),
            (AnimationStyle::FadeOut, (0.75, 0.0)),
        ];
        for (animation, expected) in cases {
            let f = pair(ElementConfig {
                animation,
                ..ElementConfig::default()
            })
            .frame_at(0.25);
            assert_eq!((f.start_opacity, f.end_opacity), expected, "{animation:?}");
        }
    }

    #[test]
    fn overshoot_extrapolates_bounds_but_clamps_opacity() {
        let p = pair(ElementConfig {
            animation: AnimationStyle::Fade,
            debug: true,
            ..ElementConfig::default()
        });
        let f = p.frame_at(1.1);
        assert!(f.bounds.x0 > p.end.x0);
        assert_eq!(f.end_opacity, 1.0);
        assert_eq!(f.start_opacity, 0.0);
        assert!(f.debug);
    }

    #[test]
    fn descriptor_resolves_only_when_both_sides_measure() {
        let descriptor = TransitionDescriptor {
            id: "image".into(),
            start: Endpoint {
                screen: 0,
                element: 1_u32,
                ancestor: 10_u32,
            },
            end: Endpoint {
                screen: 1,
                element: 2_u32,
                ancestor: 20_u32,
            },
            config: ElementConfig::default(),
        };
        let table = |e: &u32, a: &u32| match (*e, *a) {
            (1, 10) => Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, 20) => Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
            _ => None,
        };
        let resolved = descriptor.resolve(&table).unwrap();
        assert_eq!(resolved.start.width(), 10.0);
        assert_eq!(resolved.end.width(), 20.0);

        let only_start = |e: &u32, _: &u32| (*e == 1).then(|| Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(descriptor.resolve(&only_start), None);
    }

    #[test]
    fn closures_measure() {
        let measure = |e: &u32, a: &u32| (*e == 1).then(|| Rect::new(0.0, f64::from(*a), 1.0, 1.0));
        assert_eq!(
            Measure::measure(&measure, &1, &0),
            Some(Rect::new(0.0, 0.0, 1.0, 1.0))
        );
        assert_eq!(Measure::measure(&measure, &2, &0), None);
    }
}
