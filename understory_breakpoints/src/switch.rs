// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size switch: pick one of several cases by the active range.
//!
//! Cases are checked in order and the first match wins, so list the most
//! specific cases first and an [`Always`](SizeCondition::Always) case last.
//!
//! ```
//! use std::sync::Arc;
//! use understory_breakpoints::config::RangeConfig;
//! use understory_breakpoints::context::ContextEntry;
//! use understory_breakpoints::switch::{select_case, SizeCondition};
//!
//! let ranges = Arc::new(
//!     RangeConfig::from_notation(&["small < 600", "600 <= medium < 1024", "1024 <= large"]).unwrap(),
//! );
//! let cases = [SizeCondition::at_least("large"), SizeCondition::is("medium"), SizeCondition::Always];
//!
//! let entry = ContextEntry::new(ranges.clone(), Some(1));
//! assert_eq!(select_case(&entry, &cases).unwrap(), Some(1));
//! let entry = ContextEntry::new(ranges, Some(0));
//! assert_eq!(select_case(&entry, &cases).unwrap(), Some(2));
//! ```

use alloc::string::{String, ToString};

use tracing::warn;

use crate::context::ContextEntry;
use crate::error::LookupError;

/// Condition of one switch case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeCondition {
    /// The named range is active.
    Is(String),
    /// The named range or a later (larger) one is active.
    AtLeast(String),
    /// A range before the named one is active.
    Below(String),
    /// Always matches, even with no active range.
    Always,
}

impl SizeCondition {
    /// [`SizeCondition::Is`].
    pub fn is(name: impl Into<String>) -> Self {
        Self::Is(name.into())
    }

    /// [`SizeCondition::AtLeast`].
    pub fn at_least(name: impl Into<String>) -> Self {
        Self::AtLeast(name.into())
    }

    /// [`SizeCondition::Below`].
    pub fn below(name: impl Into<String>) -> Self {
        Self::Below(name.into())
    }

    fn target(&self, entry: &ContextEntry) -> Result<Option<usize>, LookupError> {
        match self {
            Self::Is(name) | Self::AtLeast(name) | Self::Below(name) => entry
                .ranges
                .index_of(name)
                .map(Some)
                .ok_or_else(|| LookupError::UnknownSize(name.to_string())),
            Self::Always => Ok(None),
        }
    }

    /// True if the condition holds for `entry`.
    pub fn matches(&self, entry: &ContextEntry) -> Result<bool, LookupError> {
        let target = self.target(entry)?;
        Ok(match (self, target, entry.active) {
            (Self::Always, _, _) => true,
            (_, _, None) | (_, None, _) => false,
            (Self::Is(_), Some(t), Some(a)) => a == t,
            (Self::AtLeast(_), Some(t), Some(a)) => a >= t,
            (Self::Below(_), Some(t), Some(a)) => a < t,
        })
    }
}

/// Index of the first case whose condition holds, or `None` if none does.
///
/// Every case is checked against the range names up front, so a misspelled
/// name fails regardless of which range is active.
pub fn select_case(
    entry: &ContextEntry,
    cases: &[SizeCondition],
) -> Result<Option<usize>, LookupError> {
    for case in cases {
        case.target(entry)?;
    }
    for (i, case) in cases.iter().enumerate() {
        if case.matches(entry)? {
            return Ok(Some(i));
        }
    }
    warn!(
        active = ?entry.active,
        cases = cases.len(),
        "size switch matched none of its cases"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangeConfig;
    use alloc::sync::Arc;

    fn entry(active: Option<usize>) -> ContextEntry {
        let ranges = RangeConfig::from_notation(&["s < 600", "600 <= m < 1024", "1024 <= l"]).unwrap();
        ContextEntry::new(Arc::new(ranges), active)
    }

    #[test]
    fn conditions() {
        let e = entry(Some(1));
        assert!(SizeCondition::is("m").matches(&e).unwrap());
        assert!(!SizeCondition::is("s").matches(&e).unwrap());
        assert!(SizeCondition::at_least("s").matches(&e).unwrap());
        assert!(SizeCondition::at_least("m").matches(&e).unwrap());
        assert!(!SizeCondition::at_least("l").matches(&e).unwrap());
        assert!(SizeCondition::below("l").matches(&e).unwrap());
        assert!(!SizeCondition::below("m").matches(&e).unwrap());
    }

    // Without an active range only `Always` can match.
    #[test]
    fn no_active_range() {
        let e = entry(None);
        let cases = [SizeCondition::below("l"), SizeCondition::Always];
        assert_eq!(select_case(&e, &cases).unwrap(), Some(1));
        assert_eq!(select_case(&e, &cases[..1]).unwrap(), None);
    }

    #[test]
    fn first_match_wins() {
        let e = entry(Some(2));
        let cases = [
            SizeCondition::at_least("m"),
            SizeCondition::at_least("l"),
            SizeCondition::Always,
        ];
        assert_eq!(select_case(&e, &cases).unwrap(), Some(0));
    }

    #[test]
    fn unknown_size_name_fails_even_after_a_match() {
        let e = entry(Some(0));
        let cases = [SizeCondition::Always, SizeCondition::is("xl")];
        assert_eq!(
            select_case(&e, &cases).unwrap_err(),
            LookupError::UnknownSize("xl".into())
        );
    }
}
