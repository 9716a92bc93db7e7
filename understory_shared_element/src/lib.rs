// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Shared Element: transitions between matching elements on indexed screens.
//!
//! A multi-screen UI marks visual elements with a logical id. When the same id
//! is rendered on two screens and the active screen index moves between them,
//! the element is animated from where it sits on the outgoing screen to where
//! it sits on the incoming one.
//!
//! The crate is organised around a few pieces:
//! - **Registration** ([`TransitionContext`], [`ScreenScope`]): each screen records its
//!   coordinate-space root (the *ancestor*) and its shared elements as it renders.
//!   Registrations are upserts; a `None` handle never erases an earlier one.
//! - **Index state** ([`ScreenIndexController`]): the externally requested index, the settled
//!   index, and an observable animated index ([`AnimatedValue`]).
//! - **Orchestration** ([`Orchestrator`], [`diff`]): when the requested index moves, pairs are
//!   matched, one [`Batch`] drives `progress` 0→1 together with the animated index, and the
//!   target is committed once both settle.
//! - **Geometry** ([`Measure`], [`ResolvedTransition`], [`TransitionFrame`]): the host measures
//!   elements; the crate interpolates bounds, content placement and opacity.
//! - **Container** ([`SharedElements`]): owns all of the above for one set of screens and
//!   decides which screens are mounted.
//!
//! Element and ancestor handles are opaque to the crate. Use whatever identifies
//! a node in the host toolkit, for example a box-tree node id.
//!
//! ## Minimal example
//!
//! Two screens sharing an `"image"` element, moving from screen 0 to screen 1
//! over 200 ms:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_shared_element::{
//!     AnimatedValue, MountPolicy, SharedElements, Step, TransitionConfig,
//! };
//!
//! let animated = AnimatedValue::new(0.0);
//! let mut screens: SharedElements<u32, u32> = SharedElements::new(2, 0, animated.clone())
//!     .with_transition_config(TransitionConfig::timing(200.0))
//!     .unwrap()
//!     .with_mount_policy(MountPolicy::ActiveOnly);
//!
//! let render = |screens: &mut SharedElements<u32, u32>| {
//!     for index in screens.mounted_screens() {
//!         let mut screen = screens.screen(index);
//!         screen.mount(100 + index as u32);
//!         screen.element(Some(index as u32), "image", None);
//!     }
//! };
//!
//! render(&mut screens);
//! screens.evaluate();
//!
//! screens.set_active_index(1);
//! render(&mut screens);
//! assert!(matches!(screens.evaluate(), Step::Started(_)));
//!
//! let measure = |element: &u32, _root: &u32| {
//!     Some(if *element == 0 {
//!         Rect::new(0.0, 0.0, 100.0, 100.0)
//!     } else {
//!         Rect::new(0.0, 0.0, 300.0, 300.0)
//!     })
//! };
//! screens.tick(100.0);
//! let (id, frame) = screens.frames(&measure).next().unwrap();
//! assert_eq!(id, "image");
//! assert!(frame.bounds.width() > 100.0 && frame.bounds.width() < 300.0);
//!
//! assert_eq!(screens.tick(100.0), Step::Committed(1));
//! assert_eq!(animated.get(), 1.0);
//! assert_eq!(screens.mounted_screens(), [1]);
//! ```
//!
//! ## Rapid index changes
//!
//! Only one batch runs at a time. A batch always commits the index it was
//! started for; if the requested index moved meanwhile, the next batch starts
//! in the same tick and is reported as [`Step::Chained`].
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for the configuration types, so transition
//!   and element options can be loaded from files.
//!
//! Diagnostics are emitted through `tracing`; the crate never installs a subscriber.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_shared_element requires either the `std` or `libm` feature");

mod animated;
mod config;
mod container;
mod context;
mod easing;
mod geometry;
mod index;
mod motion;
mod orchestrator;
mod registry;
mod util;

pub use animated::AnimatedValue;
pub use config::{
    Align, AnimationStyle, ConfigError, ElementConfig, ElementOptions, Resize, SpringConfig,
    TimingConfig, TransitionConfig, TransitionOptions,
};
pub use container::{MountPolicy, SharedElements};
pub use context::{ScreenScope, TransitionContext};
pub use easing::Easing;
pub use geometry::{Endpoint, Measure, ResolvedTransition, TransitionDescriptor, TransitionFrame};
pub use index::ScreenIndexController;
pub use motion::{Batch, Drive};
pub use orchestrator::{BatchInfo, Orchestrator, Step, diff};
pub use registry::{AncestorRegistry, ElementEntry, ElementRegistry};

/// Index of a screen within a container.
///
/// Valid screens are `0..screen_count`; other values are accepted everywhere
/// and simply match nothing.
pub type ScreenIndex = i32;
