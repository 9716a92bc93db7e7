// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-container owner of registration, index and transition state.

use alloc::vec::Vec;

use crate::ScreenIndex;
use crate::animated::AnimatedValue;
use crate::config::{ConfigError, ElementOptions, TransitionConfig};
use crate::context::{ScreenScope, TransitionContext};
use crate::geometry::{Measure, TransitionDescriptor, TransitionFrame};
use crate::index::ScreenIndexController;
use crate::orchestrator::{Orchestrator, Step};

/// Which screens stay mounted once no transition is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MountPolicy {
    /// Every screen up to and including the current one, like a navigation stack.
    #[default]
    Stack,
    /// Only the current screen.
    ActiveOnly,
}

/// A fixed set of screens with shared-element transitions between them.
///
/// A host drives it once per pass:
///
/// 1. [`set_active_index`](Self::set_active_index) when the requested screen changes.
/// 2. Render every screen for which [`is_mounted`](Self::is_mounted) holds,
///    registering ancestors and elements through [`screen`](Self::screen).
/// 3. [`evaluate`](Self::evaluate) to start a batch or commit directly.
/// 4. [`tick`](Self::tick) every frame while a batch is in flight, drawing
///    [`frames`](Self::frames) on top of the screens.
#[derive(Clone, Debug)]
pub struct SharedElements<E, A> {
    screen_count: usize,
    context: TransitionContext<E, A>,
    index: ScreenIndexController,
    orchestrator: Orchestrator<E, A>,
    mount_policy: MountPolicy,
}

impl<E, A> SharedElements<E, A> {
    /// Create a container of `screen_count` screens settled on `active_index`.
    ///
    /// `animated_index` is set to `active_index`.
    pub fn new(
        screen_count: usize,
        active_index: ScreenIndex,
        animated_index: AnimatedValue,
    ) -> Self {
        Self {
            screen_count,
            context: TransitionContext::new(),
            index: ScreenIndexController::new(active_index, animated_index),
            orchestrator: Orchestrator::default(),
            mount_policy: MountPolicy::default(),
        }
    }

    /// Use `config` for batches started from now on.
    pub fn with_transition_config(
        mut self,
        config: TransitionConfig,
    ) -> Result<Self, ConfigError> {
        self.orchestrator.set_config(config)?;
        Ok(self)
    }

    /// Choose which screens stay mounted at rest.
    pub fn with_mount_policy(mut self, policy: MountPolicy) -> Self {
        self.mount_policy = policy;
        self
    }

    /// Number of screens.
    pub fn screen_count(&self) -> usize {
        self.screen_count
    }

    /// Registration state.
    pub fn context(&self) -> &TransitionContext<E, A> {
        &self.context
    }

    /// Mutable registration state.
    pub fn context_mut(&mut self) -> &mut TransitionContext<E, A> {
        &mut self.context
    }

    /// Registration hooks for one screen.
    pub fn screen(&mut self, index: ScreenIndex) -> ScreenScope<'_, E, A> {
        self.context.screen(index)
    }

    /// See [`TransitionContext::register_element`].
    pub fn register_element(
        &mut self,
        handle: Option<E>,
        screen: ScreenIndex,
        id: &str,
        options: Option<&ElementOptions>,
    ) {
        self.context.register_element(handle, screen, id, options);
    }

    /// See [`TransitionContext::register_ancestor`].
    pub fn register_ancestor(&mut self, handle: Option<A>, screen: ScreenIndex) {
        self.context.register_ancestor(handle, screen);
    }

    /// Request a new active screen.
    pub fn set_active_index(&mut self, index: ScreenIndex) {
        self.index.set_active_index(index);
    }

    /// Index state.
    pub fn index(&self) -> &ScreenIndexController {
        &self.index
    }

    /// Latest requested index.
    pub fn active_index(&self) -> ScreenIndex {
        self.index.active_index()
    }

    /// Settled index.
    pub fn current_index(&self) -> ScreenIndex {
        self.index.current_index()
    }

    /// Index being transitioned to.
    pub fn next_index(&self) -> ScreenIndex {
        self.index.next_index()
    }

    /// Observable animated index.
    pub fn animated_index(&self) -> &AnimatedValue {
        self.index.animated_index()
    }

    /// Progress of the in-flight batch, from 0 to 1.
    pub fn progress(&self) -> &AnimatedValue {
        self.orchestrator.progress()
    }

    /// Transition config for new batches.
    pub fn transition_config(&self) -> &TransitionConfig {
        self.orchestrator.config()
    }

    /// Returns `true` while screens must all stay mounted.
    pub fn transitioning(&self) -> bool {
        self.index.transitioning() || self.orchestrator.is_in_flight()
    }

    /// Returns `true` if screen `index` should be rendered this pass.
    ///
    /// Indices outside `0..screen_count` are never mounted.
    pub fn is_mounted(&self, index: ScreenIndex) -> bool {
        if !usize::try_from(index).is_ok_and(|i| i < self.screen_count) {
            return false;
        }
        if self.transitioning() {
            return true;
        }
        let current = self.index.current_index();
        match self.mount_policy {
            MountPolicy::Stack => index <= current,
            MountPolicy::ActiveOnly => index == current,
        }
    }

    /// Screens to render this pass, in index order.
    pub fn mounted_screens(&self) -> Vec<ScreenIndex> {
        (0..self.screen_count)
            .filter_map(|i| ScreenIndex::try_from(i).ok())
            .filter(|&i| self.is_mounted(i))
            .collect()
    }

    /// Pairs animated by the in-flight batch.
    pub fn descriptors(&self) -> &[TransitionDescriptor<E, A>] {
        self.orchestrator.descriptors()
    }

    /// Measure every in-flight pair and interpolate it at the current progress.
    ///
    /// Pairs that fail to measure are left out.
    pub fn frames<'a, M: Measure<E, A> + ?Sized>(
        &'a self,
        measure: &'a M,
    ) -> impl Iterator<Item = (&'a str, TransitionFrame)> + 'a {
        let progress = self.progress().get();
        self.descriptors().iter().filter_map(move |d| {
            d.resolve(measure)
                .map(|resolved| (d.id.as_str(), resolved.frame_at(progress)))
        })
    }
}

impl<E: Clone, A: Clone> SharedElements<E, A> {
    /// Start a batch or commit directly if the requested index moved, then
    /// close the pass.
    pub fn evaluate(&mut self) -> Step {
        let step = self.orchestrator.evaluate(&self.context, &mut self.index);
        self.index.settle();
        step
    }

    /// Advance the in-flight batch by `dt` milliseconds.
    pub fn tick(&mut self, dt: f64) -> Step {
        self.orchestrator.tick(dt, &self.context, &mut self.index)
    }
}
