// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped context: expose active indices to descendants, optionally by name.
//!
//! ## Overview
//!
//! A [`ContextValue`] is what a descendant sees from its nearest publishing
//! ancestor: an unnamed default entry (the nearest observer) plus every named
//! entry published along the branch. It is passed down explicitly; there is
//! no ambient lookup.
//!
//! - Start from [`ContextValue::root`] where no observer exists yet.
//! - An observer derives the value for its descendants with
//!   [`ContextValue::merge`]. The parent value is left untouched, so sibling
//!   branches stay independent.
//! - Consumers read with [`ContextValue::lookup`] or [`active_size`].
//!
//! ## Names
//!
//! Names are single-writer: only the publisher that registered a name may
//! update it within a branch. A second publisher claiming the same name gets a
//! [`NameCollisionError`]. Identity is a [`PublisherId`], not value equality.
//!
//! ```
//! use std::sync::Arc;
//! use understory_breakpoints::config::RangeConfig;
//! use understory_breakpoints::context::{active_size, ContextEntry, ContextValue, PublisherId};
//! use understory_breakpoints::types::Constraints;
//!
//! let ranges = Arc::new(RangeConfig::new([("any", Constraints::new())]).unwrap());
//! let nav = PublisherId::next();
//! let root = ContextValue::root();
//! let scoped = root
//!     .merge(nav, ContextEntry::new(ranges.clone(), Some(0)), Some("nav"))
//!     .unwrap();
//!
//! assert_eq!(active_size(&scoped, None).unwrap().0, Some(0));
//! assert_eq!(active_size(&scoped, Some("nav")).unwrap().0, Some(0));
//! assert!(active_size(&scoped, Some("footer")).is_err());
//! assert!(active_size(&root, None).is_err());
//! ```

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::config::RangeConfig;
use crate::error::{LookupError, NameCollisionError};
use crate::types::ActiveIndex;

/// Identity of a publishing observer.
///
/// Two observers never share an id, even if they publish equal values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PublisherId(usize);

impl PublisherId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A published range configuration and its active index.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextEntry {
    /// Range configuration of the publishing observer.
    pub ranges: Arc<RangeConfig>,
    /// Active index of the publishing observer.
    pub active: ActiveIndex,
}

impl ContextEntry {
    /// Create an entry.
    pub fn new(ranges: Arc<RangeConfig>, active: ActiveIndex) -> Self {
        Self { ranges, active }
    }

    /// Name of the active range, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.and_then(|i| self.ranges.name_of(i))
    }
}

/// An entry together with the publisher that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct Published {
    /// Owner of the entry.
    pub publisher: PublisherId,
    /// The entry.
    pub entry: ContextEntry,
}

/// Context visible to descendants of the nearest publishing observer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextValue {
    /// Unnamed entries along the branch, nearest publisher last.
    defaults: Vec<Published>,
    named: BTreeMap<String, Published>,
}

impl ContextValue {
    /// The value seen where no observer has published: no default, no names.
    pub fn root() -> Self {
        Self::default()
    }

    /// The unnamed entry of the nearest publisher, if any.
    pub fn default_entry(&self) -> Option<&ContextEntry> {
        self.defaults.last().map(|p| &p.entry)
    }

    /// The entry published under `name`, if any.
    pub fn named_entry(&self, name: &str) -> Option<&ContextEntry> {
        self.named.get(name).map(|p| &p.entry)
    }

    /// Names published along this branch, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.named.keys().map(String::as_str)
    }

    /// Derive the value for `publisher`'s descendants.
    ///
    /// The entry becomes the default, shadowing (not discarding) the
    /// enclosing publisher's. With a `name`, also sets the named
    /// entry unless a different publisher already owns that name. All other
    /// named entries are preserved.
    pub fn merge(
        &self,
        publisher: PublisherId,
        entry: ContextEntry,
        name: Option<&str>,
    ) -> Result<Self, NameCollisionError> {
        let mut named = self.named.clone();
        if let Some(name) = name {
            match named.get(name) {
                Some(existing) if existing.publisher != publisher => {
                    return Err(NameCollisionError {
                        name: name.to_string(),
                    });
                }
                _ => {
                    named.insert(
                        name.to_string(),
                        Published {
                            publisher,
                            entry: entry.clone(),
                        },
                    );
                }
            }
        }
        let mut defaults = self.defaults.clone();
        if defaults.last().is_some_and(|p| p.publisher == publisher) {
            defaults.pop();
        }
        defaults.push(Published { publisher, entry });
        Ok(Self { defaults, named })
    }

    /// Remove everything `publisher` owns.
    ///
    /// Its named entries disappear, and the default entry falls back to the
    /// nearest remaining ancestor.
    pub fn retract(&self, publisher: PublisherId) -> Self {
        Self {
            defaults: self
                .defaults
                .iter()
                .filter(|p| p.publisher != publisher)
                .cloned()
                .collect(),
            named: self
                .named
                .iter()
                .filter(|(_, p)| p.publisher != publisher)
                .map(|(k, p)| (k.clone(), p.clone()))
                .collect(),
        }
    }

    /// Entry for `name`, or the default entry when no name is given.
    ///
    /// A named request never falls back to the default entry.
    pub fn lookup(&self, name: Option<&str>) -> Result<&ContextEntry, LookupError> {
        match name {
            Some(name) => self
                .named_entry(name)
                .ok_or_else(|| LookupError::UnknownObserver(name.to_string())),
            None => self.default_entry().ok_or(LookupError::NoPublisher),
        }
    }
}

/// Consumer query: the active index and ranges of the requested observer.
///
/// Pass `None` for the nearest observer or `Some(name)` for a named one.
pub fn active_size(
    context: &ContextValue,
    name: Option<&str>,
) -> Result<(ActiveIndex, Arc<RangeConfig>), LookupError> {
    let entry = context.lookup(name)?;
    Ok((entry.active, entry.ranges.clone()))
}
