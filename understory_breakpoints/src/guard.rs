// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update-storm guard: detect feedback loops in active-index recomputation.
//!
//! ## Why
//!
//! Rendering a different range can itself change the observed element's
//! size, which flips the range back, and so on. Left alone this loops
//! forever without any visible error. The guard counts recomputations per
//! window and reacts when the count exceeds a limit.
//!
//! ## Policies
//!
//! - [`StormPolicy::Fail`] (default): the recomputation that exceeds the limit
//!   yields a [`FeedbackLoopError`] exactly once and the counter resets. The
//!   window is a trailing-edge timer: it elapses `window_ms` after the *last*
//!   recomputation, so a sustained storm keeps the window open.
//! - [`StormPolicy::Suppress`]: once the limit is exceeded, further values are
//!   held back instead of propagated. The window opens at the first
//!   recomputation and closes `window_ms` later regardless of traffic; at that
//!   point [`UpdateStormGuard::poll`] releases the most recent held value.
//!
//! Both policies log when they trigger.
//!
//! ## Timers
//!
//! The guard owns no clock. Callers pass `now` in, may inspect
//! [`UpdateStormGuard::deadline`] to schedule a wake-up, and call
//! [`UpdateStormGuard::poll`] when it is reached. [`UpdateStormGuard::cancel`]
//! tears the pending timer down.
//!
//! ```
//! use understory_breakpoints::guard::{GuardConfig, GuardVerdict, UpdateStormGuard};
//!
//! let mut guard = UpdateStormGuard::new(GuardConfig { limit: 2, window_ms: 1000, ..Default::default() });
//! assert_eq!(guard.record(0, Some(0)), Ok(GuardVerdict::Pass(Some(0))));
//! assert_eq!(guard.record(1, Some(1)), Ok(GuardVerdict::Pass(Some(1))));
//! assert!(guard.record(2, Some(0)).is_err());
//! // The counter was reset by the breach.
//! assert!(guard.record(3, Some(1)).is_ok());
//! ```

use tracing::{error, warn};

use crate::error::FeedbackLoopError;
use crate::types::{ActiveIndex, Millis};

/// What to do when recomputations exceed the limit.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum StormPolicy {
    /// Report a [`FeedbackLoopError`]; the owner is expected to stop updating.
    #[default]
    Fail,
    /// Hold back values until the window elapses, then release the latest.
    Suppress,
}

/// Rate-limit configuration for an [`UpdateStormGuard`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GuardConfig {
    /// Maximum recomputations per window.
    pub limit: u32,
    /// Window length in milliseconds.
    pub window_ms: Millis,
    /// Reaction to a breach.
    pub policy: StormPolicy,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            limit: 50,
            window_ms: 5000,
            policy: StormPolicy::Fail,
        }
    }
}

/// Outcome of [`UpdateStormGuard::record`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GuardVerdict {
    /// Propagate this value.
    Pass(ActiveIndex),
    /// The value was held back; a later [`UpdateStormGuard::poll`] may release it.
    Suppressed,
}

/// Observable guard state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GuardState {
    /// No recomputation in the current window.
    Idle,
    /// Recomputations counted; the window timer is pending.
    Counting,
    /// A breach just fired and the counter was reset.
    Breached,
    /// Values are being held back until the window elapses.
    Suppressing,
}

/// Counts recomputations per window and reacts to storms.
///
/// Re-create the guard whenever the set of probes changes; no state carries
/// over between configurations.
#[derive(Clone, Debug)]
pub struct UpdateStormGuard {
    config: GuardConfig,
    count: u32,
    deadline: Option<Millis>,
    breached: bool,
    suppressing: bool,
    held: Option<ActiveIndex>,
}

impl UpdateStormGuard {
    /// Create an idle guard.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            count: 0,
            deadline: None,
            breached: false,
            suppressing: false,
            held: None,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Recomputations counted in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// When the pending window timer fires, if one is pending.
    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// Current state.
    pub fn state(&self) -> GuardState {
        if self.suppressing {
            GuardState::Suppressing
        } else if self.breached && self.count == 0 {
            GuardState::Breached
        } else if self.count == 0 {
            GuardState::Idle
        } else {
            GuardState::Counting
        }
    }

    /// Count one recomputation that produced `value` at time `now`.
    ///
    /// Every recomputation counts, including ones whose value ends up held back.
    pub fn record(&mut self, now: Millis, value: ActiveIndex) -> Result<GuardVerdict, FeedbackLoopError> {
        // A window that elapsed before this recomputation closes first. A held
        // value it releases is stale: `value` supersedes it and is what passes
        // or gets held below.
        let _superseded = self.poll(now);

        self.count = self.count.saturating_add(1);
        self.breached = false;
        match self.config.policy {
            StormPolicy::Fail => self.deadline = Some(now.saturating_add(self.config.window_ms)),
            StormPolicy::Suppress => {
                if self.deadline.is_none() {
                    self.deadline = Some(now.saturating_add(self.config.window_ms));
                }
            }
        }

        if self.count <= self.config.limit {
            return Ok(GuardVerdict::Pass(value));
        }

        match self.config.policy {
            StormPolicy::Fail => {
                let err = FeedbackLoopError {
                    limit: self.config.limit,
                    window_ms: self.config.window_ms,
                    count: self.count,
                };
                error!(
                    limit = err.limit,
                    window_ms = err.window_ms,
                    "size observer exceeded its update limit; rendered content likely changes the observed size"
                );
                self.count = 0;
                self.breached = true;
                Err(err)
            }
            StormPolicy::Suppress => {
                if !self.suppressing {
                    self.suppressing = true;
                    warn!(
                        limit = self.config.limit,
                        window_ms = self.config.window_ms,
                        "size observer updated too often; holding back updates to prevent recursion"
                    );
                }
                self.held = Some(value);
                Ok(GuardVerdict::Suppressed)
            }
        }
    }

    /// Fire the window timer if `now` has reached it.
    ///
    /// Resets the counter. Under [`StormPolicy::Suppress`] this returns the most
    /// recent held value, which the caller should now propagate.
    pub fn poll(&mut self, now: Millis) -> Option<ActiveIndex> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.count = 0;
                self.breached = false;
                self.suppressing = false;
                self.held.take()
            }
            _ => None,
        }
    }

    /// Drop the pending timer and any held value.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.count = 0;
        self.breached = false;
        self.suppressing = false;
        self.held = None;
    }
}
