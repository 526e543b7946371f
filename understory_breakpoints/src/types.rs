// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: boundary kinds, per-range constraints, probe states, and the active index.
//!
//! ## Overview
//!
//! These types are shared by [`config`](crate::config), [`probe`](crate::probe),
//! [`resolve`](crate::resolve) and the [`observer`](crate::observer).

/// Milliseconds on the host's monotonic clock.
///
/// The crate never reads a clock itself; callers pass `now` into every
/// operation that depends on time.
pub type Millis = u64;

/// Position of the range that currently applies, or `None` if no range matches.
///
/// Always derived from the probe state vector; never authoritative state.
pub type ActiveIndex = Option<usize>;

/// One of the four boundary constraints a range may carry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum BoundaryKind {
    /// Element width must be at least the value.
    MinWidth,
    /// Element width must be at most the value.
    MaxWidth,
    /// Element height must be at least the value.
    MinHeight,
    /// Element height must be at most the value.
    MaxHeight,
}

impl BoundaryKind {
    /// Canonical probe order within a single range.
    pub const CANONICAL: [Self; 4] = [
        Self::MinWidth,
        Self::MaxWidth,
        Self::MinHeight,
        Self::MaxHeight,
    ];

    /// True for `MinWidth` and `MinHeight`.
    pub const fn is_lower_bound(self) -> bool {
        matches!(self, Self::MinWidth | Self::MinHeight)
    }

    /// True for `MinWidth` and `MaxWidth`.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::MinWidth | Self::MaxWidth)
    }

    /// The flag corresponding to this kind in a [`BoundaryKinds`] set.
    pub const fn flag(self) -> BoundaryKinds {
        match self {
            Self::MinWidth => BoundaryKinds::MIN_WIDTH,
            Self::MaxWidth => BoundaryKinds::MAX_WIDTH,
            Self::MinHeight => BoundaryKinds::MIN_HEIGHT,
            Self::MaxHeight => BoundaryKinds::MAX_HEIGHT,
        }
    }

    /// Name as written in configuration (`minWidth`, ...).
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::MinWidth => "minWidth",
            Self::MaxWidth => "maxWidth",
            Self::MinHeight => "minHeight",
            Self::MaxHeight => "maxHeight",
        }
    }
}

bitflags::bitflags! {
    /// Set of boundary kinds present on a range definition.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BoundaryKinds: u8 {
        /// Range carries a `minWidth` boundary.
        const MIN_WIDTH  = 0b0000_0001;
        /// Range carries a `maxWidth` boundary.
        const MAX_WIDTH  = 0b0000_0010;
        /// Range carries a `minHeight` boundary.
        const MIN_HEIGHT = 0b0000_0100;
        /// Range carries a `maxHeight` boundary.
        const MAX_HEIGHT = 0b0000_1000;
    }
}

/// Boundary constraints of one range, in pixels.
///
/// A value of `None` means the boundary is absent. Constraints with no
/// boundaries at all describe a fallback range, which always matches.
///
/// ```
/// use understory_breakpoints::types::{BoundaryKind, BoundaryKinds, Constraints};
///
/// let c = Constraints::new().min_width(600.0).max_width(767.0);
/// assert_eq!(c.get(BoundaryKind::MinWidth), Some(600.0));
/// assert_eq!(c.kinds(), BoundaryKinds::MIN_WIDTH | BoundaryKinds::MAX_WIDTH);
/// assert!(Constraints::new().is_empty());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    /// Lower width boundary.
    pub min_width: Option<f64>,
    /// Upper width boundary (inclusive).
    pub max_width: Option<f64>,
    /// Lower height boundary.
    pub min_height: Option<f64>,
    /// Upper height boundary (inclusive).
    pub max_height: Option<f64>,
}

impl Constraints {
    /// Constraints with no boundaries (a fallback).
    pub const fn new() -> Self {
        Self {
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
        }
    }

    /// Set the `minWidth` boundary.
    #[must_use]
    pub const fn min_width(mut self, value: f64) -> Self {
        self.min_width = Some(value);
        self
    }

    /// Set the `maxWidth` boundary.
    #[must_use]
    pub const fn max_width(mut self, value: f64) -> Self {
        self.max_width = Some(value);
        self
    }

    /// Set the `minHeight` boundary.
    #[must_use]
    pub const fn min_height(mut self, value: f64) -> Self {
        self.min_height = Some(value);
        self
    }

    /// Set the `maxHeight` boundary.
    #[must_use]
    pub const fn max_height(mut self, value: f64) -> Self {
        self.max_height = Some(value);
        self
    }

    /// Value of the given boundary, if present.
    pub const fn get(&self, kind: BoundaryKind) -> Option<f64> {
        match kind {
            BoundaryKind::MinWidth => self.min_width,
            BoundaryKind::MaxWidth => self.max_width,
            BoundaryKind::MinHeight => self.min_height,
            BoundaryKind::MaxHeight => self.max_height,
        }
    }

    /// Set of boundaries present.
    pub fn kinds(&self) -> BoundaryKinds {
        BoundaryKind::CANONICAL
            .into_iter()
            .filter(|k| self.get(*k).is_some())
            .fold(BoundaryKinds::empty(), |acc, k| acc | k.flag())
    }

    /// Present boundaries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BoundaryKind, f64)> + '_ {
        BoundaryKind::CANONICAL
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
    }

    /// True if no boundary is present.
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

/// Observed containment state of one probe.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ProbeState {
    /// No observation received yet.
    #[default]
    Unknown,
    /// The probe is fully contained in the reference region.
    Contained,
    /// The probe is not fully contained in the reference region.
    NotContained,
}

impl ProbeState {
    /// State for a `fully_contained` flag reported by a probe service.
    pub const fn from_contained(fully_contained: bool) -> Self {
        if fully_contained {
            Self::Contained
        } else {
            Self::NotContained
        }
    }

    /// True if no observation was received yet.
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn canonical_order_is_min_max_width_then_height() {
        assert_eq!(
            BoundaryKind::CANONICAL,
            [
                BoundaryKind::MinWidth,
                BoundaryKind::MaxWidth,
                BoundaryKind::MinHeight,
                BoundaryKind::MaxHeight
            ]
        );
    }

    #[test]
    fn lower_bounds_are_min_kinds() {
        assert!(BoundaryKind::MinWidth.is_lower_bound());
        assert!(BoundaryKind::MinHeight.is_lower_bound());
        assert!(!BoundaryKind::MaxWidth.is_lower_bound());
        assert!(!BoundaryKind::MaxHeight.is_lower_bound());
    }

    // Iteration follows canonical order regardless of how the builder was called.
    #[test]
    fn constraints_iterate_in_canonical_order() {
        let c = Constraints::new().max_height(10.0).min_width(1.0);
        let got: Vec<_> = c.iter().collect();
        assert_eq!(
            got,
            [(BoundaryKind::MinWidth, 1.0), (BoundaryKind::MaxHeight, 10.0)]
        );
        assert_eq!(c.kinds(), BoundaryKinds::MIN_WIDTH | BoundaryKinds::MAX_HEIGHT);
    }

    #[test]
    fn probe_state_defaults_to_unknown() {
        assert!(ProbeState::default().is_unknown());
        assert_eq!(ProbeState::from_contained(true), ProbeState::Contained);
        assert_eq!(ProbeState::from_contained(false), ProbeState::NotContained);
    }
}
