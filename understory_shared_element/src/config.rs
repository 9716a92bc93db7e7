// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element and per-container configuration.
//!
//! Element configuration is supplied as partial [`ElementOptions`] at
//! registration time and resolved against defaults into an [`ElementConfig`].
//! Transition configuration selects how the batch is driven: a fixed-duration
//! [`TimingConfig`] or a physically modelled [`SpringConfig`].

use crate::easing::Easing;

/// Where content sits inside the interpolated bounds when it is not stretched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Align {
    /// Resolved as [`Align::CenterCenter`].
    #[default]
    Auto,
    /// Left edge, top edge.
    LeftTop,
    /// Left edge, vertically centered.
    LeftCenter,
    /// Left edge, bottom edge.
    LeftBottom,
    /// Right edge, top edge.
    RightTop,
    /// Right edge, vertically centered.
    RightCenter,
    /// Right edge, bottom edge.
    RightBottom,
    /// Horizontally centered, top edge.
    CenterTop,
    /// Centered on both axes.
    CenterCenter,
    /// Horizontally centered, bottom edge.
    CenterBottom,
}

impl Align {
    /// Horizontal and vertical anchor fractions: `0.0` is left/top, `1.0` is right/bottom.
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Self::LeftTop => (0.0, 0.0),
            Self::LeftCenter => (0.0, 0.5),
            Self::LeftBottom => (0.0, 1.0),
            Self::RightTop => (1.0, 0.0),
            Self::RightCenter => (1.0, 0.5),
            Self::RightBottom => (1.0, 1.0),
            Self::CenterTop => (0.5, 0.0),
            Self::Auto | Self::CenterCenter => (0.5, 0.5),
            Self::CenterBottom => (0.5, 1.0),
        }
    }
}

/// How size differences between the start and end element are reconciled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Resize {
    /// Resolved as [`Resize::Stretch`].
    #[default]
    Auto,
    /// Content is scaled to fill the interpolated bounds.
    Stretch,
    /// Content keeps its own size and is clipped to the interpolated bounds.
    Clip,
    /// Content keeps its own size and is not clipped.
    None,
}

/// Which element is shown, and how, while the pair is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum AnimationStyle {
    /// The start element moves to the end position.
    #[default]
    Move,
    /// Cross-fade from the start element to the end element.
    Fade,
    /// The end element fades in; the start element is hidden.
    FadeIn,
    /// The start element fades out; the end element is hidden.
    FadeOut,
}

/// Fully resolved configuration for one (id, screen) registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementConfig {
    /// Content alignment inside the interpolated bounds.
    pub align: Align,
    /// Resize policy.
    pub resize: Resize,
    /// Visibility policy for start and end content.
    pub animation: AnimationStyle,
    /// Request diagnostic output for transitions involving this element.
    pub debug: bool,
}

impl ElementConfig {
    /// Overlay caller-supplied options on the defaults.
    pub fn merged(options: Option<&ElementOptions>) -> Self {
        let defaults = Self::default();
        let Some(options) = options else {
            return defaults;
        };
        Self {
            align: options.align.unwrap_or(defaults.align),
            resize: options.resize.unwrap_or(defaults.resize),
            animation: options.animation.unwrap_or(defaults.animation),
            debug: options.debug.unwrap_or(defaults.debug),
        }
    }
}

/// Partial element configuration; unset fields fall back to [`ElementConfig::default`].
///
/// ```rust
/// use understory_shared_element::{AnimationStyle, ElementConfig, ElementOptions, Resize};
///
/// let options = ElementOptions {
///     animation: Some(AnimationStyle::Fade),
///     debug: Some(true),
///     ..ElementOptions::default()
/// };
/// let config = ElementConfig::merged(Some(&options));
/// assert_eq!(config.animation, AnimationStyle::Fade);
/// assert_eq!(config.resize, Resize::Auto);
/// assert!(config.debug);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ElementOptions {
    /// Alignment override.
    pub align: Option<Align>,
    /// Resize override.
    pub resize: Option<Resize>,
    /// Animation style override.
    pub animation: Option<AnimationStyle>,
    /// Diagnostics override.
    pub debug: Option<bool>,
}

/// Fixed-duration interpolation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Duration in milliseconds.
    pub duration: f64,
    /// Easing applied to the time fraction.
    pub easing: Easing,
    /// Delay before the drive starts moving, in milliseconds.
    pub delay: f64,
}

impl TimingConfig {
    /// A timing config with the default easing and no delay.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            easing: Easing::default(),
            delay: 0.0,
        }
    }
}

/// Damped-spring parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    /// Spring constant.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
    /// Mass of the simulated body.
    pub mass: f64,
    /// Settle as soon as the value passes the target.
    pub overshoot_clamping: bool,
    /// Distance from the target under which the spring may rest.
    pub rest_displacement_threshold: f64,
    /// Speed (units per second) under which the spring may rest.
    pub rest_speed_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 1000.0,
            damping: 500.0,
            mass: 3.0,
            overshoot_clamping: false,
            rest_displacement_threshold: 0.01,
            rest_speed_threshold: 0.01,
        }
    }
}

/// How a transition batch is driven.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TransitionConfig {
    /// Fixed-duration interpolation.
    Timing(TimingConfig),
    /// Physically modelled interpolation.
    Spring(SpringConfig),
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::Spring(SpringConfig::default())
    }
}

impl TransitionConfig {
    /// Fixed-duration transition with default easing.
    pub fn timing(duration: f64) -> Self {
        Self::Timing(TimingConfig::new(duration))
    }

    /// Check that every parameter can drive a batch.
    ///
    /// This rejects values that are not finite, negative durations, delays,
    /// damping and thresholds, and non-positive stiffness or mass. A spring
    /// that passes validation can still fail to settle (for example with zero
    /// damping and zero rest thresholds); such a batch never completes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Timing(t) => {
                non_negative("duration", t.duration)?;
                non_negative("delay", t.delay)
            }
            Self::Spring(s) => {
                positive("stiffness", s.stiffness)?;
                positive("mass", s.mass)?;
                non_negative("damping", s.damping)?;
                non_negative("rest_displacement_threshold", s.rest_displacement_threshold)?;
                non_negative("rest_speed_threshold", s.rest_speed_threshold)
            }
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Partial transition configuration in the shape hosts usually write it.
///
/// The presence of `duration` selects a [`TimingConfig`]; otherwise the
/// spring fields are used, with unset fields taken from
/// [`SpringConfig::default`].
///
/// ```rust
/// use understory_shared_element::{TransitionConfig, TransitionOptions};
///
/// let timed = TransitionOptions { duration: Some(2000.0), ..TransitionOptions::default() };
/// assert_eq!(timed.resolve(), TransitionConfig::timing(2000.0));
///
/// let sprung = TransitionOptions { stiffness: Some(200.0), ..TransitionOptions::default() };
/// let TransitionConfig::Spring(spring) = sprung.resolve() else { unreachable!() };
/// assert_eq!(spring.stiffness, 200.0);
/// assert_eq!(spring.mass, 3.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TransitionOptions {
    /// Timing duration in milliseconds.
    pub duration: Option<f64>,
    /// Timing easing.
    pub easing: Option<Easing>,
    /// Timing delay in milliseconds.
    pub delay: Option<f64>,
    /// Spring constant.
    pub stiffness: Option<f64>,
    /// Spring damping.
    pub damping: Option<f64>,
    /// Spring mass.
    pub mass: Option<f64>,
    /// Spring overshoot clamping.
    pub overshoot_clamping: Option<bool>,
    /// Spring rest displacement threshold.
    pub rest_displacement_threshold: Option<f64>,
    /// Spring rest speed threshold.
    pub rest_speed_threshold: Option<f64>,
}

impl TransitionOptions {
    /// Select the drive mode and fill unset fields.
    pub fn resolve(&self) -> TransitionConfig {
        if let Some(duration) = self.duration {
            return TransitionConfig::Timing(TimingConfig {
                duration,
                easing: self.easing.unwrap_or_default(),
                delay: self.delay.unwrap_or(0.0),
            });
        }
        let d = SpringConfig::default();
        TransitionConfig::Spring(SpringConfig {
            stiffness: self.stiffness.unwrap_or(d.stiffness),
            damping: self.damping.unwrap_or(d.damping),
            mass: self.mass.unwrap_or(d.mass),
            overshoot_clamping: self.overshoot_clamping.unwrap_or(d.overshoot_clamping),
            rest_displacement_threshold: self
                .rest_displacement_threshold
                .unwrap_or(d.rest_displacement_threshold),
            rest_speed_threshold: self.rest_speed_threshold.unwrap_or(d.rest_speed_threshold),
        })
    }
}

impl From<TransitionOptions> for TransitionConfig {
    fn from(options: TransitionOptions) -> Self {
        options.resolve()
    }
}

/// A transition parameter that cannot drive a batch.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The value must be finite and strictly positive.
    #[error("`{field}` must be finite and greater than zero, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The value must be finite and not negative.
    #[error("`{field}` must be finite and not negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults_are_auto_auto_move() {
        let config = ElementConfig::merged(None);
        assert_eq!(config.align, Align::Auto);
        assert_eq!(config.resize, Resize::Auto);
        assert_eq!(config.animation, AnimationStyle::Move);
        assert!(!config.debug);
    }

    #[test]
    fn element_options_override_only_set_fields() {
        let options = ElementOptions {
            align: Some(Align::LeftBottom),
            resize: Some(Resize::Clip),
            ..ElementOptions::default()
        };
        let config = ElementConfig::merged(Some(&options));
        assert_eq!(config.align, Align::LeftBottom);
        assert_eq!(config.resize, Resize::Clip);
        assert_eq!(config.animation, AnimationStyle::Move);
        assert!(!config.debug);
    }

    #[test]
    fn auto_align_anchors_at_center() {
        assert_eq!(Align::Auto.anchor(), Align::CenterCenter.anchor());
        assert_eq!(Align::RightBottom.anchor(), (1.0, 1.0));
    }

    #[test]
    fn duration_selects_timing() {
        let options = TransitionOptions {
            duration: Some(250.0),
            stiffness: Some(5.0),
            ..TransitionOptions::default()
        };
        let TransitionConfig::Timing(timing) = TransitionConfig::from(options) else {
            panic!("duration should select a timing drive");
        };
        assert_eq!(timing.duration, 250.0);
        assert_eq!(timing.easing, Easing::EaseInOut);
        assert_eq!(timing.delay, 0.0);
    }

    #[test]
    fn missing_duration_selects_default_spring() {
        assert_eq!(
            TransitionOptions::default().resolve(),
            TransitionConfig::default()
        );
    }

    #[test]
    fn validation_rejects_unusable_parameters() {
        assert!(TransitionConfig::default().validate().is_ok());
        assert!(TransitionConfig::timing(0.0).validate().is_ok());

        assert_eq!(
            TransitionConfig::timing(-1.0).validate(),
            Err(ConfigError::Negative {
                field: "duration",
                value: -1.0
            })
        );
        assert!(TransitionConfig::timing(f64::NAN).validate().is_err());

        let massless = TransitionConfig::Spring(SpringConfig {
            mass: 0.0,
            ..SpringConfig::default()
        });
        assert_eq!(
            massless.validate(),
            Err(ConfigError::NotPositive {
                field: "mass",
                value: 0.0
            })
        );

        let undamped = TransitionConfig::Spring(SpringConfig {
            damping: 0.0,
            ..SpringConfig::default()
        });
        assert!(undamped.validate().is_ok());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn spring_options_use_camel_case_keys() {
        let json = r#"{
            "stiffness": 200,
            "damping": 20,
            "mass": 1,
            "overshootClamping": true,
            "restSpeedThreshold": 0.5
        }"#;
        let options: TransitionOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.overshoot_clamping, Some(true));
        assert_eq!(options.rest_speed_threshold, Some(0.5));
        assert_eq!(options.duration, None);

        let TransitionConfig::Spring(spring) = options.resolve() else {
            panic!("spring options must resolve to a spring");
        };
        assert_eq!(spring.stiffness, 200.0);
        assert!(spring.overshoot_clamping);
        assert_eq!(
            spring.rest_displacement_threshold,
            SpringConfig::default().rest_displacement_threshold
        );

        let text = serde_json::to_string(&options).unwrap();
        assert!(text.contains("\"overshootClamping\":true"), "{text}");
        let back: TransitionOptions = serde_json::from_str(&text).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn timing_options_parse_kebab_case_easing() {
        let options: TransitionOptions =
            serde_json::from_str(r#"{"duration": 2000, "easing": "ease-in", "delay": 50}"#)
                .unwrap();
        assert_eq!(
            options.resolve(),
            TransitionConfig::Timing(TimingConfig {
                duration: 2000.0,
                easing: Easing::EaseIn,
                delay: 50.0,
            })
        );
    }

    #[test]
    fn element_options_parse_partially() {
        let options: ElementOptions =
            serde_json::from_str(r#"{"animation": "fade-out", "align": "left-top"}"#).unwrap();
        let config = ElementConfig::merged(Some(&options));
        assert_eq!(config.animation, AnimationStyle::FadeOut);
        assert_eq!(config.align, Align::LeftTop);
        assert_eq!(config.resize, Resize::Auto);
    }
}
