// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Match resolution: probe states → active range index.
//!
//! ## Algorithm
//!
//! 1. If any probe is still unknown, nothing is decided yet and the result is `None`.
//!    Deciding early would flash a wrong range before the first observation.
//! 2. Every range starts eligible.
//! 3. Each probe whose state is not [compatible](crate::probe::Probe::is_compatible)
//!    disqualifies its owning range.
//! 4. The lowest eligible position wins.
//!
//! Ranges are authored smallest first, so the first fully satisfied range is
//! the most specific one. A trailing fallback owns no probes and therefore
//! wins exactly when no earlier range does.
//!
//! [`resolve`] is pure: no I/O, no hidden state, same inputs give the same output.

use alloc::vec;

use crate::config::RangeConfig;
use crate::probe::Probe;
use crate::types::{ActiveIndex, ProbeState};

/// Resolve the active range index from a probe state vector.
///
/// `probes` and `states` are parallel slices, normally produced by
/// [`expand_probes`](crate::probe::expand_probes) and
/// [`ProbeStates`](crate::probe::ProbeStates). A probe without a
/// corresponding state counts as unknown.
///
/// ```
/// use understory_breakpoints::config::RangeConfig;
/// use understory_breakpoints::probe::expand_probes;
/// use understory_breakpoints::resolve::resolve;
/// use understory_breakpoints::types::{Constraints, ProbeState::*};
///
/// let ranges = RangeConfig::new([
///     ("small", Constraints::new().max_width(599.0)),
///     ("medium", Constraints::new().min_width(600.0).max_width(767.0)),
///     ("large", Constraints::new().min_width(768.0)),
/// ])
/// .unwrap();
/// let probes = expand_probes(&ranges);
///
/// // Width 700: past `small`'s max probe, inside `medium`'s.
/// let states = [Contained, Contained, NotContained, NotContained];
/// assert_eq!(resolve(&ranges, &probes, &states), Some(1));
/// assert_eq!(resolve(&ranges, &probes, &[Unknown; 4]), None);
/// ```
pub fn resolve(ranges: &RangeConfig, probes: &[Probe], states: &[ProbeState]) -> ActiveIndex {
    if states.len() < probes.len() || states.iter().any(|s| s.is_unknown()) {
        return None;
    }

    let mut eligible = vec![true; ranges.len()];
    for (probe, state) in probes.iter().zip(states) {
        if !probe.is_compatible(*state)
            && let Some(slot) = eligible.get_mut(probe.owner)
        {
            *slot = false;
        }
    }

    eligible.iter().position(|&e| e)
}
