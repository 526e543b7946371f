// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Every error here is local and synchronous: it reports malformed
//! configuration or malformed usage, and none of them is retried.

use alloc::string::String;

use crate::types::{BoundaryKind, Millis};

/// A range configuration that cannot be built.
///
/// Returned by [`RangeConfig::new`](crate::config::RangeConfig::new) and
/// [`RangeConfig::from_notation`](crate::config::RangeConfig::from_notation).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Two ranges share a name.
    #[error("duplicate range name \"{name}\" at positions {first} and {second}")]
    DuplicateName {
        /// The repeated name.
        name: String,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },
    /// A range without constraints is not last, so every later range is unreachable.
    #[error("range \"{name}\" at position {index} has no constraints but is not the last range")]
    UnreachableFallback {
        /// Name of the fallback range.
        name: String,
        /// Its position.
        index: usize,
    },
    /// A boundary value is negative or not finite.
    #[error("range \"{name}\" has invalid {} boundary {value}", .kind.config_key())]
    InvalidBoundary {
        /// Name of the offending range.
        name: String,
        /// Which boundary.
        kind: BoundaryKind,
        /// The rejected value.
        value: f64,
    },
    /// A range notation entry could not be parsed.
    #[error("cannot parse range notation \"{entry}\": {reason}")]
    Notation {
        /// The entry as written.
        entry: String,
        /// What went wrong.
        reason: &'static str,
    },
}

/// Two publishers claimed the same observer name in one context branch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("multiple size observers in the same context branch are named \"{name}\"")]
pub struct NameCollisionError {
    /// The contested name.
    pub name: String,
}

/// A consumer asked for an entry that is not published.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No ancestor observer has published anything.
    #[error("expected an ancestor size observer, but none has published")]
    NoPublisher,
    /// No ancestor observer has published under this name.
    #[error("expected an ancestor size observer named \"{0}\", but none has published")]
    UnknownObserver(String),
    /// A size name does not exist in the published range configuration.
    #[error("range configuration has no size named \"{0}\"")]
    UnknownSize(String),
}

/// The active index was recomputed more often than the storm guard allows.
///
/// This indicates a feedback loop: rendering a different range changes the
/// element's size, which changes the range again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "size observer recomputed {count} times within {window_ms}ms (limit {limit}); \
     the rendered content likely changes the observed size"
)]
pub struct FeedbackLoopError {
    /// Configured limit per window.
    pub limit: u32,
    /// Configured window.
    pub window_ms: Millis,
    /// Recomputations counted when the breach was detected.
    pub count: u32,
}

/// Failure of a [`SizeObserver`](crate::observer::SizeObserver) operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ObserverError {
    /// The storm guard detected a feedback loop.
    #[error(transparent)]
    FeedbackLoop(#[from] FeedbackLoopError),
    /// The observer already breached its storm guard and no longer updates.
    #[error("size observer halted after a feedback loop")]
    Halted,
    /// Publishing under the observer's name collided with another observer.
    #[error(transparent)]
    NameCollision(#[from] NameCollisionError),
}
