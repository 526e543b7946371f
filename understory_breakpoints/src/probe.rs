// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Probe expansion: one independent containment probe per boundary constraint.
//!
//! ## Overview
//!
//! A range with several boundaries cannot be sensed with a single containment
//! test, so each boundary gets its own probe. [`expand_probes`] walks the
//! ranges in position order and, within a range, the boundary kinds in
//! [canonical order](crate::types::BoundaryKind::CANONICAL).
//! The resulting order is stable for a given [`RangeConfig`]: the probe state
//! vector and the probe service registry are both addressed by it.
//!
//! ## Probe geometry
//!
//! A probe is a box anchored at the element's origin whose size is derived
//! from its boundary (see [`Probe::target_size`]):
//! - `minWidth`/`minHeight` probes are exactly as large as the boundary.
//!   Being fully contained means the element is at least that large.
//! - `maxWidth`/`maxHeight` probes are one pixel larger than the boundary.
//!   Not being fully contained means the element is at most the boundary.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Size;

use crate::config::RangeConfig;
use crate::types::{BoundaryKind, ProbeState};

/// A single boundary probe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Probe {
    /// Which boundary this probe senses.
    pub kind: BoundaryKind,
    /// Boundary value in pixels.
    pub value: f64,
    /// Position of the range that owns the boundary.
    pub owner: usize,
}

impl Probe {
    /// Size of the probe box for the probe service to observe.
    ///
    /// The axis the probe does not sense is one pixel.
    pub fn target_size(&self) -> Size {
        let extent = if self.kind.is_lower_bound() {
            self.value
        } else {
            self.value + 1.0
        };
        if self.kind.is_horizontal() {
            Size::new(extent, 1.0)
        } else {
            Size::new(1.0, extent)
        }
    }

    /// True if `state` is consistent with the owning range being active.
    ///
    /// Lower bounds need the probe contained, upper bounds need it not
    /// contained. An unknown state is never compatible.
    pub fn is_compatible(&self, state: ProbeState) -> bool {
        match state {
            ProbeState::Unknown => false,
            ProbeState::Contained => self.kind.is_lower_bound(),
            ProbeState::NotContained => !self.kind.is_lower_bound(),
        }
    }
}

/// Derive the ordered probe list for `ranges`.
///
/// ```
/// use understory_breakpoints::config::RangeConfig;
/// use understory_breakpoints::probe::expand_probes;
/// use understory_breakpoints::types::{BoundaryKind, Constraints};
///
/// let ranges = RangeConfig::new([
///     ("narrow", Constraints::new().max_width(400.0)),
///     ("wide", Constraints::new()),
/// ])
/// .unwrap();
/// let probes = expand_probes(&ranges);
/// assert_eq!(probes.len(), 1);
/// assert_eq!(probes[0].kind, BoundaryKind::MaxWidth);
/// assert_eq!(probes[0].owner, 0);
/// ```
pub fn expand_probes(ranges: &RangeConfig) -> Vec<Probe> {
    ranges
        .iter()
        .enumerate()
        .flat_map(|(owner, range)| {
            range
                .constraints()
                .iter()
                .map(move |(kind, value)| Probe { kind, value, owner })
        })
        .collect()
}

/// Tri-state observation vector, parallel to a probe list.
///
/// Starts with every probe [`Unknown`](ProbeState::Unknown). Entries are only
/// changed by observations; the whole vector is reset together when the
/// owning configuration changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeStates {
    states: Vec<ProbeState>,
}

impl ProbeStates {
    /// `len` unknown states.
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![ProbeState::Unknown; len],
        }
    }

    /// Number of probes tracked.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if no probes are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Reset every state to unknown, resizing to `len` probes.
    pub fn reset(&mut self, len: usize) {
        self.states.clear();
        self.states.resize(len, ProbeState::Unknown);
    }

    /// State of probe `index`.
    pub fn get(&self, index: usize) -> Option<ProbeState> {
        self.states.get(index).copied()
    }

    /// Record an observation for probe `index`; returns true if the state changed.
    ///
    /// Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, fully_contained: bool) -> bool {
        let Some(slot) = self.states.get_mut(index) else {
            return false;
        };
        let next = ProbeState::from_contained(fully_contained);
        if *slot == next {
            return false;
        }
        *slot = next;
        true
    }

    /// True if any probe has not been observed yet.
    pub fn any_unknown(&self) -> bool {
        self.states.iter().any(|s| s.is_unknown())
    }

    /// States in probe order.
    pub fn as_slice(&self) -> &[ProbeState] {
        &self.states
    }
}
