// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diffing, batch start, and commit.
//!
//! The orchestrator runs whenever the settled index and the requested index
//! differ and no batch is in flight. It diffs the element registry between the
//! two screens, starts a single batch that drives `progress` from 0 to 1 and
//! the animated index from its present reading to the target, and commits the
//! target once both drives settle.
//!
//! A batch always commits the target it was started for. If the request moved
//! on while it ran, the next batch is started in the same tick.

use alloc::vec::Vec;

use tracing::{debug, trace, warn};

use crate::ScreenIndex;
use crate::animated::AnimatedValue;
use crate::config::{ConfigError, TransitionConfig};
use crate::context::TransitionContext;
use crate::geometry::{Endpoint, TransitionDescriptor};
use crate::index::ScreenIndexController;
use crate::motion::{Batch, Drive};

/// Summary of a batch that was just started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchInfo {
    /// Settled index the batch starts from.
    pub from: ScreenIndex,
    /// Index the batch will commit.
    pub to: ScreenIndex,
    /// Number of matched pairs being animated.
    pub pairs: usize,
}

/// Outcome of an [`Orchestrator::evaluate`] or [`Orchestrator::tick`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do.
    Idle,
    /// A batch is in flight.
    Running,
    /// A batch was started.
    Started(BatchInfo),
    /// The index was committed and nothing else is pending.
    Committed(ScreenIndex),
    /// A batch committed and the next one was started right away.
    Chained {
        /// Index that was committed.
        committed: ScreenIndex,
        /// Batch started toward the newer request.
        next: BatchInfo,
    },
}

#[derive(Clone, Debug)]
struct InFlight<E, A> {
    target: ScreenIndex,
    descriptors: Vec<TransitionDescriptor<E, A>>,
    batch: Batch,
}

/// Build the descriptors for a transition from `from` to `to`.
///
/// Ids are visited in registry order. An id produces a descriptor only if both
/// screens hold a handle for it and both screens have an ancestor. The
/// descriptor takes the config of the outgoing element.
pub fn diff<E: Clone, A: Clone>(
    context: &TransitionContext<E, A>,
    from: ScreenIndex,
    to: ScreenIndex,
) -> Vec<TransitionDescriptor<E, A>> {
    let mut descriptors = Vec::new();
    for entry in context.elements().entries() {
        let id = entry.id();
        let (Some(start), Some(end)) = (entry.handle(from), entry.handle(to)) else {
            trace!(id, from, to, "shared element has no match");
            continue;
        };
        let ancestors = context.ancestors();
        let (Some(start_ancestor), Some(end_ancestor)) = (ancestors.get(from), ancestors.get(to))
        else {
            trace!(id, from, to, "shared element screen has no ancestor");
            continue;
        };
        let config = entry.config(from).copied().unwrap_or_default();
        if config.debug {
            debug!(id, from, to, ?config, "shared element paired");
        }
        descriptors.push(TransitionDescriptor {
            id: id.into(),
            start: Endpoint {
                screen: from,
                element: start.clone(),
                ancestor: start_ancestor.clone(),
            },
            end: Endpoint {
                screen: to,
                element: end.clone(),
                ancestor: end_ancestor.clone(),
            },
            config,
        });
    }
    descriptors
}

/// Drives transitions for one container.
#[derive(Clone, Debug)]
pub struct Orchestrator<E, A> {
    config: TransitionConfig,
    progress: AnimatedValue,
    in_flight: Option<InFlight<E, A>>,
}

impl<E, A> Default for Orchestrator<E, A> {
    fn default() -> Self {
        Self {
            config: TransitionConfig::default(),
            progress: AnimatedValue::new(0.0),
            in_flight: None,
        }
    }
}

impl<E: Clone, A: Clone> Orchestrator<E, A> {
    /// Start work if the requested index moved.
    ///
    /// While a batch is in flight this only reports [`Step::Running`]; the
    /// newer request is picked up when that batch commits.
    pub fn evaluate(
        &mut self,
        context: &TransitionContext<E, A>,
        index: &mut ScreenIndexController,
    ) -> Step {
        if self.in_flight.is_some() {
            return Step::Running;
        }
        if index.current_index() == index.next_index() {
            return Step::Idle;
        }
        self.begin(context, index)
    }

    /// Advance the in-flight batch by `dt` milliseconds.
    pub fn tick(
        &mut self,
        dt: f64,
        context: &TransitionContext<E, A>,
        index: &mut ScreenIndexController,
    ) -> Step {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return Step::Idle;
        };
        if !in_flight.batch.tick(dt) {
            return Step::Running;
        }
        let target = in_flight.target;
        self.in_flight = None;
        index.commit(target);
        debug!(index = target, "shared element transition committed");

        if index.next_index() == target {
            return Step::Committed(target);
        }
        debug!(
            committed = target,
            next = index.next_index(),
            "request moved during transition, chaining"
        );
        match self.begin(context, index) {
            Step::Started(next) => Step::Chained {
                committed: target,
                next,
            },
            step => step,
        }
    }

    fn begin(
        &mut self,
        context: &TransitionContext<E, A>,
        index: &mut ScreenIndexController,
    ) -> Step {
        let from = index.current_index();
        let to = index.next_index();
        self.progress.set(0.0);
        let descriptors = diff(context, from, to);

        if descriptors.is_empty() {
            index.commit(to);
            index.animated_index().set(f64::from(to));
            debug!(from, to, "no shared elements matched, committing directly");
            return Step::Committed(to);
        }

        let mut batch = Batch::new();
        batch.push(Drive::new(self.progress.clone(), 1.0, &self.config));
        batch.push(Drive::new(
            index.animated_index().clone(),
            f64::from(to),
            &self.config,
        ));
        let info = BatchInfo {
            from,
            to,
            pairs: descriptors.len(),
        };
        debug!(from, to, pairs = info.pairs, "shared element transition started");
        self.in_flight = Some(InFlight {
            target: to,
            descriptors,
            batch,
        });
        Step::Started(info)
    }
}

impl<E, A> Orchestrator<E, A> {
    /// Create an idle orchestrator driving batches with `config`.
    pub fn new(config: TransitionConfig) -> Result<Self, ConfigError> {
        let mut orchestrator = Self::default();
        orchestrator.set_config(config)?;
        Ok(orchestrator)
    }

    /// Config used for batches started from now on.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replace the config; a batch already in flight keeps its own.
    ///
    /// A config that fails [`TransitionConfig::validate`] is rejected and the
    /// previous one stays in place.
    pub fn set_config(&mut self, config: TransitionConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected shared element transition config");
            return Err(err);
        }
        self.config = config;
        Ok(())
    }

    /// Progress of the in-flight batch, from 0 to 1.
    pub fn progress(&self) -> &AnimatedValue {
        &self.progress
    }

    /// Returns `true` while a batch is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Target of the in-flight batch.
    pub fn target(&self) -> Option<ScreenIndex> {
        self.in_flight.as_ref().map(|f| f.target)
    }

    /// Pairs animated by the in-flight batch; empty when idle.
    pub fn descriptors(&self) -> &[TransitionDescriptor<E, A>] {
        match &self.in_flight {
            Some(in_flight) => &in_flight.descriptors,
            None => &[],
        }
    }
}
