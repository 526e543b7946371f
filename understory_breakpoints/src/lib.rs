// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_breakpoints --heading-base-level=0

//! Understory Breakpoints: deterministic, `no_std` breakpoint resolution for UI elements.
//!
//! ## Overview
//!
//! Given an element whose rendered size changes over time, this crate decides which one of an
//! ordered set of named size ranges currently applies.
//! It does not measure layout. Instead it derives one containment probe per range boundary, lets a
//! host-supplied [`ProbeService`](crate::service::ProbeService) report whether each probe is fully
//! contained in the element, and resolves those observations into a single active index.
//!
//! ## Pieces
//!
//! - [`RangeConfig`](crate::config::RangeConfig): immutable, validated, ordered and named ranges.
//!   Build it from [`Constraints`](crate::types::Constraints) or from
//!   [width notation](crate::notation).
//! - [`expand_probes`](crate::probe::expand_probes): one [`Probe`](crate::probe::Probe) per boundary,
//!   in a stable order.
//! - [`resolve`](crate::resolve::resolve): probe states → active index. Pure.
//! - [`UpdateStormGuard`](crate::guard::UpdateStormGuard): detects feedback loops where rendering a
//!   different range changes the measured size.
//! - [`ContextValue`](crate::context::ContextValue): exposes active indices to descendants, by
//!   nearest ancestor or by name.
//! - [`SizeObserver`](crate::observer::SizeObserver): binds all of the above to a probe service.
//! - [`select_case`](crate::switch::select_case): pick one of several cases by the active range.
//!
//! ## Resolution rules
//!
//! - Until every probe has been observed, the active index is `None`.
//! - A `minWidth`/`minHeight` probe is sized at the boundary; being fully contained means the
//!   element is at least that large.
//! - A `maxWidth`/`maxHeight` probe is one pixel past the boundary; not being fully contained means
//!   the element is at most that large.
//! - The lowest-positioned range whose probes all agree wins. A trailing range without constraints
//!   is a fallback and wins when nothing earlier does.
//!
//! ## Workflow
//!
//! 1) Build a [`RangeConfig`](crate::config::RangeConfig) once.
//! 2) Create a [`SizeObserver`](crate::observer::SizeObserver) with your probe service.
//! 3) Forward each containment batch to [`SizeObserver::observe`](crate::observer::SizeObserver::observe),
//!    and call [`SizeObserver::poll`](crate::observer::SizeObserver::poll) when the guard's deadline passes.
//! 4) Publish with [`SizeObserver::publish`](crate::observer::SizeObserver::publish) and hand the
//!    resulting [`ContextValue`](crate::context::ContextValue) to descendants, which query it with
//!    [`active_size`](crate::context::active_size).
//!
//! ```
//! use kurbo::Size;
//! use understory_breakpoints::config::RangeConfig;
//! use understory_breakpoints::context::{active_size, ContextValue};
//! use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
//! use understory_breakpoints::service::GeometryProbes;
//! use understory_breakpoints::types::Constraints;
//!
//! let ranges = RangeConfig::new([
//!     ("narrow", Constraints::new().max_width(400.0)),
//!     ("wide", Constraints::new()),
//! ])
//! .unwrap();
//!
//! let mut probes = GeometryProbes::new(Size::new(320.0, 480.0));
//! let mut observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut probes);
//! observer.observe(0, &probes.flush()).unwrap();
//! assert_eq!(observer.active_name(), Some("narrow"));
//!
//! observer.observe(16, &probes.resize(Size::new(1024.0, 480.0))).unwrap();
//! let ctx = observer.publish(&ContextValue::root()).unwrap();
//! let (active, _ranges) = active_size(&ctx, None).unwrap();
//! assert_eq!(active, Some(1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod notation;
pub mod observer;
pub mod probe;
pub mod resolve;
pub mod service;
pub mod switch;
pub mod types;

pub use config::{RangeConfig, RangeDefinition};
pub use context::{ContextEntry, ContextValue, PublisherId, active_size};
pub use error::{ConfigError, FeedbackLoopError, LookupError, NameCollisionError, ObserverError};
pub use guard::{GuardConfig, StormPolicy, UpdateStormGuard};
pub use observer::{ObserverOptions, SizeObserver};
pub use probe::{Probe, ProbeStates, expand_probes};
pub use resolve::resolve;
pub use service::{GeometryProbes, ProbeHandle, ProbeService};
pub use types::{ActiveIndex, BoundaryKind, Constraints, ProbeState};
