// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size observer: binds a range configuration to a probe service, the
//! resolver, the storm guard, and the scoped context.
//!
//! ## Data flow
//!
//! 1) [`SizeObserver::new`] expands the ranges into probes and registers one
//!    handle per probe with the [`ProbeService`].
//! 2) The host forwards each containment batch to [`SizeObserver::observe`].
//!    The whole batch is applied to the state vector before resolving once,
//!    so a half-applied batch can never flicker the output.
//! 3) Each recomputation passes through the [`UpdateStormGuard`].
//! 4) [`SizeObserver::publish`] derives the [`ContextValue`] for descendants.
//!
//! ## Teardown
//!
//! [`SizeObserver::teardown`] unregisters every probe, cancels the guard's
//! timer, and returns the parent context with this observer's entries
//! retracted.
//!
//! ## Example
//!
//! ```
//! use kurbo::Size;
//! use understory_breakpoints::config::RangeConfig;
//! use understory_breakpoints::context::{active_size, ContextValue};
//! use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
//! use understory_breakpoints::service::GeometryProbes;
//!
//! let ranges = RangeConfig::from_notation(&["small < 600", "600 <= medium < 768", "768 <= large"]).unwrap();
//! let mut probes = GeometryProbes::new(Size::new(700.0, 400.0));
//! let mut observer = SizeObserver::new(ranges, ObserverOptions::named("main"), &mut probes);
//!
//! let batch = probes.flush();
//! assert_eq!(observer.observe(0, &batch).unwrap(), Some(Some(1)));
//!
//! let ctx = observer.publish(&ContextValue::root()).unwrap();
//! let (active, ranges) = active_size(&ctx, Some("main")).unwrap();
//! assert_eq!(active.and_then(|i| ranges.name_of(i)), Some("medium"));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::config::RangeConfig;
use crate::context::{ContextEntry, ContextValue, PublisherId};
use crate::error::{NameCollisionError, ObserverError};
use crate::guard::{GuardConfig, GuardVerdict, UpdateStormGuard};
use crate::probe::{Probe, ProbeStates, expand_probes};
use crate::resolve::resolve;
use crate::service::{ProbeHandle, ProbeService};
use crate::types::{ActiveIndex, Millis};

/// Options for a [`SizeObserver`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Name under which descendants can look this observer up.
    pub name: Option<String>,
    /// Storm guard configuration.
    pub guard: GuardConfig,
    /// Render descendants even while no range matches.
    pub render_without_active_size: bool,
}

impl ObserverOptions {
    /// Default options with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Resolves and publishes the active range of one observed element.
#[derive(Debug)]
pub struct SizeObserver {
    publisher: PublisherId,
    options: ObserverOptions,
    ranges: Arc<RangeConfig>,
    probes: Vec<Probe>,
    handles: Vec<ProbeHandle>,
    slots: BTreeMap<ProbeHandle, usize>,
    states: ProbeStates,
    guard: UpdateStormGuard,
    active: ActiveIndex,
    halted: bool,
}

impl SizeObserver {
    /// Create an observer and register its probes with `service`.
    pub fn new(
        ranges: impl Into<Arc<RangeConfig>>,
        options: ObserverOptions,
        service: &mut impl ProbeService,
    ) -> Self {
        let mut observer = Self {
            publisher: PublisherId::next(),
            guard: UpdateStormGuard::new(options.guard),
            options,
            ranges: Arc::new(RangeConfig::default()),
            probes: Vec::new(),
            handles: Vec::new(),
            slots: BTreeMap::new(),
            states: ProbeStates::default(),
            active: None,
            halted: false,
        };
        observer.install(ranges.into(), service);
        observer
    }

    /// Replace the range configuration.
    ///
    /// Old probes are unregistered and new ones registered; every probe
    /// state starts unknown again and the storm guard starts fresh. A
    /// configuration that needs no probes (only a fallback) is active at once.
    pub fn set_ranges(&mut self, ranges: impl Into<Arc<RangeConfig>>, service: &mut impl ProbeService) {
        self.unregister_all(service);
        self.install(ranges.into(), service);
    }

    fn install(&mut self, ranges: Arc<RangeConfig>, service: &mut impl ProbeService) {
        if !self.options.render_without_active_size && !ranges.has_fallback() {
            warn!(
                observer = self.options.name.as_deref(),
                "no fallback range and render_without_active_size is off; descendants will not render while no range matches"
            );
        }
        self.probes = expand_probes(&ranges);
        self.handles = self
            .probes
            .iter()
            .map(|p| service.register(p.target_size()))
            .collect();
        self.slots = self
            .handles
            .iter()
            .enumerate()
            .map(|(i, h)| (*h, i))
            .collect();
        self.states.reset(self.probes.len());
        self.guard = UpdateStormGuard::new(self.options.guard);
        self.ranges = ranges;
        // Ranges without probes are decided up front; no batch will ever arrive.
        self.active = resolve(&self.ranges, &self.probes, self.states.as_slice());
        self.halted = false;
        debug!(
            observer = self.options.name.as_deref(),
            ranges = self.ranges.len(),
            probes = self.probes.len(),
            "registered size probes"
        );
    }

    fn unregister_all(&mut self, service: &mut impl ProbeService) {
        for handle in self.handles.drain(..) {
            service.unregister(handle);
        }
        self.slots.clear();
    }

    /// Apply one batch of `(handle, fully_contained)` observations.
    ///
    /// Returns `Some(index)` when the published active index changed, and
    /// `None` when it did not (including when the guard held the value back).
    /// Handles this observer does not own are logged and skipped.
    ///
    /// A [`FeedbackLoopError`](crate::error::FeedbackLoopError) halts the
    /// observer: every later call fails with [`ObserverError::Halted`] until
    /// the ranges are replaced.
    pub fn observe(
        &mut self,
        now: Millis,
        batch: &[(ProbeHandle, bool)],
    ) -> Result<Option<ActiveIndex>, ObserverError> {
        if self.halted {
            return Err(ObserverError::Halted);
        }

        let mut changed = false;
        for &(handle, contained) in batch {
            match self.slots.get(&handle) {
                Some(&slot) => changed |= self.states.set(slot, contained),
                None => warn!(
                    probe = handle.raw(),
                    "ignoring containment change for a probe this observer does not own"
                ),
            }
        }
        if !changed {
            return Ok(None);
        }

        let next = resolve(&self.ranges, &self.probes, self.states.as_slice());
        match self.guard.record(now, next) {
            Ok(GuardVerdict::Pass(value)) => Ok(self.apply(value)),
            Ok(GuardVerdict::Suppressed) => Ok(None),
            Err(err) => {
                self.halted = true;
                self.guard.cancel();
                Err(err.into())
            }
        }
    }

    /// Fire the storm guard's window timer if `now` has reached it.
    ///
    /// Returns `Some(index)` when a held-back value was released and changed
    /// the published index.
    pub fn poll(&mut self, now: Millis) -> Result<Option<ActiveIndex>, ObserverError> {
        if self.halted {
            return Err(ObserverError::Halted);
        }
        Ok(self.guard.poll(now).and_then(|value| self.apply(value)))
    }

    fn apply(&mut self, value: ActiveIndex) -> Option<ActiveIndex> {
        if value == self.active {
            return None;
        }
        self.active = value;
        Some(value)
    }

    /// Derive the context for this observer's descendants from `parent`.
    pub fn publish(&self, parent: &ContextValue) -> Result<ContextValue, NameCollisionError> {
        parent.merge(self.publisher, self.entry(), self.name())
    }

    /// Unregister all probes, cancel the guard timer, and return `context`
    /// without this observer's entries.
    pub fn teardown(mut self, service: &mut impl ProbeService, context: &ContextValue) -> ContextValue {
        self.unregister_all(service);
        self.guard.cancel();
        context.retract(self.publisher)
    }

    /// The entry this observer publishes.
    pub fn entry(&self) -> ContextEntry {
        ContextEntry::new(self.ranges.clone(), self.active)
    }

    /// True if descendants should render: a range matches, or rendering
    /// without one was requested.
    pub fn should_render(&self) -> bool {
        self.options.render_without_active_size || self.active.is_some()
    }

    /// Currently published active index.
    pub fn active(&self) -> ActiveIndex {
        self.active
    }

    /// Name of the currently active range.
    pub fn active_name(&self) -> Option<&str> {
        self.active.and_then(|i| self.ranges.name_of(i))
    }

    /// Range configuration in use.
    pub fn ranges(&self) -> &Arc<RangeConfig> {
        &self.ranges
    }

    /// Probes in registration order.
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Handles, parallel to [`probes`](Self::probes).
    pub fn handles(&self) -> &[ProbeHandle] {
        &self.handles
    }

    /// Observed probe states, parallel to [`probes`](Self::probes).
    pub fn states(&self) -> &ProbeStates {
        &self.states
    }

    /// The storm guard.
    pub fn guard(&self) -> &UpdateStormGuard {
        &self.guard
    }

    /// Identity used when publishing.
    pub fn publisher(&self) -> PublisherId {
        self.publisher
    }

    /// Name used when publishing.
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// True after a feedback-loop breach.
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
