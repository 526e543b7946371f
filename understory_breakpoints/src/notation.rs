// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact width-range notation.
//!
//! Each entry reads like an inequality on the element width, with the range
//! name standing in for the width:
//!
//! | Entry                  | Constraints                              |
//! |------------------------|------------------------------------------|
//! | `small < 600`          | `maxWidth = 599`                         |
//! | `600 <= medium <= 768` | `minWidth = 600`, `maxWidth = 768`       |
//! | `768 < large`          | `minWidth = 769`                         |
//! | `rest`                 | none (fallback)                          |
//!
//! Strict bounds are shifted by one pixel, matching the inclusive semantics
//! of `minWidth`/`maxWidth`.
//!
//! ```
//! use understory_breakpoints::config::RangeConfig;
//!
//! let ranges = RangeConfig::from_notation(&[
//!     "x-small < 600",
//!     "600 <= small < 768",
//!     "768 <= medium < 1024",
//!     "1024 <= large",
//! ])
//! .unwrap();
//! assert_eq!(ranges.len(), 4);
//! assert_eq!(ranges[1].constraints().max_width, Some(767.0));
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::config::RangeConfig;
use crate::error::ConfigError;
use crate::types::Constraints;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Op {
    Lt,
    Le,
}

impl Op {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }
}

fn parse_value(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parse one notation entry into a name and its constraints.
pub fn parse_entry(entry: &str) -> Result<(String, Constraints), ConfigError> {
    let fail = |reason| ConfigError::Notation {
        entry: entry.to_string(),
        reason,
    };
    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let mut constraints = Constraints::new();

    // Optional `<value> <op>` prefix.
    let rest = match tokens.as_slice() {
        [] => return Err(fail("empty entry")),
        [first, op, rest @ ..] if Op::parse(op).is_some() && parse_value(first).is_some() => {
            let value = parse_value(first).ok_or_else(|| fail("invalid lower bound"))?;
            constraints.min_width = Some(match Op::parse(op) {
                Some(Op::Lt) => value + 1.0,
                _ => value,
            });
            rest
        }
        all => all,
    };

    let (name, rest) = match rest {
        [name, rest @ ..] if Op::parse(name).is_none() && parse_value(name).is_none() => {
            (*name, rest)
        }
        _ => return Err(fail("expected a range name")),
    };

    match rest {
        [] => {}
        [op, value] => {
            let op = Op::parse(op).ok_or_else(|| fail("expected `<` or `<=` after the name"))?;
            let value = parse_value(value).ok_or_else(|| fail("invalid upper bound"))?;
            constraints.max_width = Some(match op {
                Op::Lt if value < 1.0 => return Err(fail("strict upper bound must be at least 1")),
                Op::Lt => value - 1.0,
                Op::Le => value,
            });
        }
        _ => return Err(fail("unexpected tokens after the name")),
    }

    if let (Some(min), Some(max)) = (constraints.min_width, constraints.max_width)
        && min > max
    {
        return Err(fail("lower bound exceeds upper bound"));
    }

    Ok((name.to_string(), constraints))
}

impl RangeConfig {
    /// Build a configuration from width-range notation entries in position order.
    ///
    /// See the [`notation`](crate::notation) module for the grammar. The parsed
    /// ranges go through the same validation as [`RangeConfig::new`].
    pub fn from_notation(entries: &[&str]) -> Result<Self, ConfigError> {
        let ranges = entries
            .iter()
            .map(|e| parse_entry(e))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(ranges)
    }
}
