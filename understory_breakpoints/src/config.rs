// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, named range configuration.
//!
//! ## Overview
//!
//! A [`RangeConfig`] is an immutable list of [`RangeDefinition`]s, authored
//! smallest first, with a companion name → position lookup.
//! It is validated once at construction and never mutated afterwards;
//! observers share it behind an [`Arc`](alloc::sync::Arc).
//!
//! ## Validation
//!
//! - Names are unique.
//! - A range without constraints (a fallback) always matches, so it may only
//!   appear last. Any range after it would be unreachable.
//! - Boundary values are finite and non-negative.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;

use crate::error::ConfigError;
use crate::types::{BoundaryKinds, Constraints};

/// A named size range.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeDefinition {
    name: String,
    constraints: Constraints,
}

impl RangeDefinition {
    /// Name of the range.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary constraints of the range.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Boundary kinds present on the range.
    pub fn kinds(&self) -> BoundaryKinds {
        self.constraints.kinds()
    }

    /// True if the range has no constraints and therefore always matches.
    pub fn is_fallback(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Immutable, ordered, named list of size ranges.
///
/// Indexable by position and by name. Iteration yields definitions in
/// position order and supports the usual iterator adapters.
///
/// ```
/// use understory_breakpoints::config::RangeConfig;
/// use understory_breakpoints::types::Constraints;
///
/// let ranges = RangeConfig::new([
///     ("small", Constraints::new().max_width(599.0)),
///     ("medium", Constraints::new().min_width(600.0).max_width(767.0)),
///     ("large", Constraints::new().min_width(768.0)),
/// ])
/// .unwrap();
///
/// assert_eq!(ranges.len(), 3);
/// assert_eq!(ranges.index_of("medium"), Some(1));
/// assert_eq!(ranges[2].name(), "large");
/// assert!(!ranges.has_fallback());
/// let names: Vec<_> = ranges.iter().map(|r| r.name()).collect();
/// assert_eq!(names, ["small", "medium", "large"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeConfig {
    ranges: Vec<RangeDefinition>,
    by_name: BTreeMap<String, usize>,
}

impl RangeConfig {
    /// Build and validate a configuration from `(name, constraints)` pairs in position order.
    pub fn new<N, I>(ranges: I) -> Result<Self, ConfigError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Constraints)>,
    {
        let ranges: Vec<RangeDefinition> = ranges
            .into_iter()
            .map(|(name, constraints)| RangeDefinition {
                name: name.into(),
                constraints,
            })
            .collect();

        let mut by_name = BTreeMap::new();
        let last = ranges.len().saturating_sub(1);
        for (index, range) in ranges.iter().enumerate() {
            if let Some(&first) = by_name.get(range.name()) {
                return Err(ConfigError::DuplicateName {
                    name: range.name.clone(),
                    first,
                    second: index,
                });
            }
            if range.is_fallback() && index != last {
                return Err(ConfigError::UnreachableFallback {
                    name: range.name.clone(),
                    index,
                });
            }
            if let Some((kind, value)) = range
                .constraints
                .iter()
                .find(|(_, v)| !v.is_finite() || *v < 0.0)
            {
                return Err(ConfigError::InvalidBoundary {
                    name: range.name.clone(),
                    kind,
                    value,
                });
            }
            by_name.insert(range.name.clone(), index);
        }

        debug!(ranges = ranges.len(), "built range configuration");
        Ok(Self { ranges, by_name })
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if there are no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True if the last range is a fallback, so some range always matches
    /// once every probe has been observed.
    pub fn has_fallback(&self) -> bool {
        self.ranges.last().is_some_and(RangeDefinition::is_fallback)
    }

    /// Range at `index`.
    pub fn get(&self, index: usize) -> Option<&RangeDefinition> {
        self.ranges.get(index)
    }

    /// Position of the range called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Range called `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&RangeDefinition> {
        self.index_of(name).and_then(|i| self.get(i))
    }

    /// Name of the range at `index`.
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.get(index).map(RangeDefinition::name)
    }

    /// Definitions in position order.
    pub fn iter(&self) -> core::slice::Iter<'_, RangeDefinition> {
        self.ranges.iter()
    }

    /// Definitions as a slice.
    pub fn as_slice(&self) -> &[RangeDefinition] {
        &self.ranges
    }
}

impl core::ops::Index<usize> for RangeConfig {
    type Output = RangeDefinition;

    fn index(&self, index: usize) -> &Self::Output {
        &self.ranges[index]
    }
}

impl<'a> IntoIterator for &'a RangeConfig {
    type Item = &'a RangeDefinition;
    type IntoIter = core::slice::Iter<'a, RangeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
