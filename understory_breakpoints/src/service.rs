// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Probe service capability and an in-memory geometric implementation.
//!
//! ## Overview
//!
//! The observer does not sense containment itself. A host supplies a
//! [`ProbeService`] that places probe boxes inside the observed element and
//! reports, in batches, whether each probe is fully contained in it.
//! In a browser that is an intersection observer with threshold 1; in a
//! native toolkit it can be a check after layout.
//!
//! [`GeometryProbes`] implements the capability with plain rectangles: the
//! element is a [`Rect`] at the origin, each probe is a box anchored at the
//! same origin, and containment is an intersection ratio of 1 (a zero-area
//! probe inside the element counts as ratio 1). It is
//! deterministic and needs no rendering surface, which makes it the
//! reference for tests and demos.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

/// Opaque handle for a registered probe, issued by a [`ProbeService`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProbeHandle(u64);

impl ProbeHandle {
    /// Wrap a service-specific raw handle.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Capability for registering containment probes.
///
/// Observations flow back separately, as batches of
/// `(handle, fully_contained)` pairs passed to
/// [`SizeObserver::observe`](crate::observer::SizeObserver::observe).
pub trait ProbeService {
    /// Start observing a probe box of `target` size; returns its handle.
    fn register(&mut self, target: Size) -> ProbeHandle;
    /// Stop observing a probe. Unknown handles are ignored.
    fn unregister(&mut self, handle: ProbeHandle);
}

#[derive(Clone, Debug)]
struct Registered {
    target: Size,
    reported: Option<bool>,
}

/// In-memory probe service over plain rectangles.
///
/// ```
/// use kurbo::Size;
/// use understory_breakpoints::service::{GeometryProbes, ProbeService};
///
/// let mut probes = GeometryProbes::new(Size::new(500.0, 300.0));
/// let h = probes.register(Size::new(600.0, 1.0));
/// assert_eq!(probes.flush(), vec![(h, false)]);
/// assert_eq!(probes.resize(Size::new(800.0, 300.0)), vec![(h, true)]);
/// // Nothing changed, nothing reported.
/// assert!(probes.resize(Size::new(900.0, 300.0)).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct GeometryProbes {
    region: Rect,
    probes: BTreeMap<ProbeHandle, Registered>,
    next: u64,
}

impl GeometryProbes {
    /// Create a service observing an element of the given size.
    pub fn new(element: Size) -> Self {
        Self {
            region: Rect::from_origin_size(Point::ORIGIN, element),
            probes: BTreeMap::new(),
            next: 1,
        }
    }

    /// The reference region probes are tested against.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Number of registered probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// True if no probes are registered.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// True if `handle` is currently registered.
    pub fn is_registered(&self, handle: ProbeHandle) -> bool {
        self.probes.contains_key(&handle)
    }

    /// Change the element size and return the batch of probes whose
    /// containment changed.
    pub fn resize(&mut self, element: Size) -> Vec<(ProbeHandle, bool)> {
        self.region = Rect::from_origin_size(Point::ORIGIN, element);
        self.flush()
    }

    /// Report every probe whose containment differs from what was last
    /// reported, including probes never reported before.
    pub fn flush(&mut self) -> Vec<(ProbeHandle, bool)> {
        let region = self.region;
        let mut batch = Vec::new();
        for (handle, probe) in &mut self.probes {
            let contained = is_fully_contained(probe.target, region);
            if probe.reported != Some(contained) {
                probe.reported = Some(contained);
                batch.push((*handle, contained));
            }
        }
        batch
    }
}

impl ProbeService for GeometryProbes {
    fn register(&mut self, target: Size) -> ProbeHandle {
        let handle = ProbeHandle(self.next);
        self.next += 1;
        self.probes.insert(
            handle,
            Registered {
                target,
                reported: None,
            },
        );
        handle
    }

    fn unregister(&mut self, handle: ProbeHandle) {
        self.probes.remove(&handle);
    }
}

/// Intersection ratio of a probe anchored at the origin with `region` is 1.
///
/// A zero-area probe has ratio 1 when it lies within `region`, edges included.
fn is_fully_contained(target: Size, region: Rect) -> bool {
    let probe = Rect::from_origin_size(Point::ORIGIN, target);
    let area = probe.area();
    if area <= 0.0 {
        return region.x0 <= probe.x0
            && probe.x1 <= region.x1
            && region.y0 <= probe.y0
            && probe.y1 <= region.y1;
    }
    probe.intersect(region).area() / area >= 1.0
}
