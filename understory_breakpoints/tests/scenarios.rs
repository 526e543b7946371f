// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios: configuration, probes, resolution, the storm guard,
//! and scoped context, driven through `GeometryProbes`.

use std::sync::Arc;

use kurbo::Size;
use understory_breakpoints::config::RangeConfig;
use understory_breakpoints::context::{ContextValue, active_size};
use understory_breakpoints::error::{LookupError, NameCollisionError, ObserverError};
use understory_breakpoints::guard::{GuardConfig, GuardVerdict, UpdateStormGuard};
use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
use understory_breakpoints::probe::expand_probes;
use understory_breakpoints::resolve::resolve;
use understory_breakpoints::service::GeometryProbes;
use understory_breakpoints::switch::{SizeCondition, select_case};
use understory_breakpoints::types::{Constraints, ProbeState};

fn three_widths() -> RangeConfig {
    RangeConfig::new([
        ("small", Constraints::new().max_width(599.0)),
        ("medium", Constraints::new().min_width(600.0).max_width(767.0)),
        ("large", Constraints::new().min_width(768.0)),
    ])
    .unwrap()
}

fn narrow_wide() -> RangeConfig {
    RangeConfig::new([
        ("narrow", Constraints::new().max_width(400.0)),
        ("wide", Constraints::new()),
    ])
    .unwrap()
}

#[test]
fn medium_width_resolves_to_medium() {
    let ranges = three_widths();
    let probes = expand_probes(&ranges);
    // maxWidth 599, minWidth 600, maxWidth 767, minWidth 768 at a width of 700.
    let states = [
        ProbeState::Contained,
        ProbeState::Contained,
        ProbeState::NotContained,
        ProbeState::NotContained,
    ];
    assert_eq!(resolve(&ranges, &probes, &states), ranges.index_of("medium"));

    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let mut observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut svc);
    observer.observe(0, &svc.flush()).unwrap();
    assert_eq!(observer.active_name(), Some("medium"));
    assert_eq!(observer.states().as_slice(), &states);
}

#[test]
fn unobserved_probes_resolve_to_none() {
    let ranges = three_widths();
    let probes = expand_probes(&ranges);
    assert_eq!(resolve(&ranges, &probes, &[ProbeState::Unknown; 4]), None);

    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut svc);
    assert_eq!(observer.active(), None);
    assert!(!observer.should_render());
}

#[test]
fn trailing_fallback_wins_past_the_last_boundary() {
    let ranges = narrow_wide();
    let probes = expand_probes(&ranges);
    // The 401px probe fits, so the element is wider than 400.
    assert_eq!(
        resolve(&ranges, &probes, &[ProbeState::Contained]),
        ranges.index_of("wide")
    );

    let mut svc = GeometryProbes::new(Size::new(400.0, 300.0));
    let mut observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut svc);
    observer.observe(0, &svc.flush()).unwrap();
    assert_eq!(observer.active_name(), Some("narrow"));
    observer.observe(1, &svc.resize(Size::new(401.0, 300.0))).unwrap();
    assert_eq!(observer.active_name(), Some("wide"));
}

#[test]
fn fallback_before_the_end_is_rejected() {
    let err = RangeConfig::new([
        ("a", Constraints::new()),
        ("b", Constraints::new().min_width(10.0)),
    ]);
    assert!(err.is_err());
}

// 51 recomputations in 100ms against 50 per 5s: one breach, then a fresh count.
#[test]
fn update_storm_breaches_exactly_once() {
    let mut guard = UpdateStormGuard::new(GuardConfig::default());
    let mut breaches = 0;
    for i in 0..51_u64 {
        match guard.record(i * 2, Some((i % 2) as usize)) {
            Ok(GuardVerdict::Pass(_)) => {}
            Ok(GuardVerdict::Suppressed) => panic!("fail policy never suppresses"),
            Err(err) => {
                breaches += 1;
                assert_eq!(err.limit, 50);
                assert_eq!(err.count, 51);
            }
        }
    }
    assert_eq!(breaches, 1);
    assert_eq!(guard.count(), 0);

    // The 52nd event in the same window starts a new count.
    assert!(guard.record(100, Some(0)).is_ok());
    assert_eq!(guard.count(), 1);
}

// Content that changes the observed size flips the range on every layout.
#[test]
fn oscillating_layout_halts_the_observer() {
    let mut svc = GeometryProbes::new(Size::new(500.0, 300.0));
    let mut observer = SizeObserver::new(three_widths(), ObserverOptions::default(), &mut svc);
    let mut outcome = Ok(None);
    let mut now = 0;
    while outcome.is_ok() && now < 1000 {
        let width = if now % 2 == 0 { 500.0 } else { 800.0 };
        outcome = observer.observe(now, &svc.resize(Size::new(width, 300.0)));
        now += 1;
    }
    assert!(matches!(outcome, Err(ObserverError::FeedbackLoop(_))));
    assert_eq!(now, 51);
    assert!(observer.is_halted());
}

#[test]
fn duplicate_name_in_one_branch_collides() {
    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let outer = SizeObserver::new(three_widths(), ObserverOptions::named("nav"), &mut svc);
    let inner = SizeObserver::new(narrow_wide(), ObserverOptions::named("nav"), &mut svc);

    let ctx = outer.publish(&ContextValue::root()).unwrap();
    assert_eq!(
        inner.publish(&ctx),
        Err(NameCollisionError {
            name: "nav".into()
        })
    );
}

#[test]
fn distinct_names_are_independently_queryable() {
    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let mut nav = SizeObserver::new(three_widths(), ObserverOptions::named("nav"), &mut svc);
    let mut footer = SizeObserver::new(narrow_wide(), ObserverOptions::named("footer"), &mut svc);
    let batch = svc.flush();
    nav.observe(0, &batch).unwrap();
    footer.observe(0, &batch).unwrap();

    let ctx = nav.publish(&ContextValue::root()).unwrap();
    let ctx = footer.publish(&ctx).unwrap();

    let (active, ranges) = active_size(&ctx, Some("nav")).unwrap();
    assert_eq!(active.and_then(|i| ranges.name_of(i)), Some("medium"));
    let (active, ranges) = active_size(&ctx, Some("footer")).unwrap();
    assert_eq!(active.and_then(|i| ranges.name_of(i)), Some("wide"));
    // The nearest publisher is the default.
    let (_, nearest) = active_size(&ctx, None).unwrap();
    assert!(Arc::ptr_eq(&nearest, footer.ranges()));

    assert_eq!(
        active_size(&ctx, Some("header")).unwrap_err(),
        LookupError::UnknownObserver("header".into())
    );
}

#[test]
fn switch_follows_resizes() {
    let mut svc = GeometryProbes::new(Size::new(320.0, 300.0));
    let ranges = RangeConfig::from_notation(&["small < 600", "600 <= medium < 768", "768 <= large"]).unwrap();
    let mut observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut svc);
    let cases = [
        SizeCondition::at_least("large"),
        SizeCondition::below("medium"),
        SizeCondition::Always,
    ];

    let mut picks = Vec::new();
    for (now, width) in [(0, 320.0), (10, 650.0), (20, 1024.0)] {
        observer.observe(now, &svc.resize(Size::new(width, 300.0))).unwrap();
        picks.push(select_case(&observer.entry(), &cases).unwrap());
    }
    assert_eq!(picks, [Some(1), Some(2), Some(0)]);
}

#[test]
fn teardown_unregisters_and_retracts() {
    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let outer = SizeObserver::new(three_widths(), ObserverOptions::named("page"), &mut svc);
    let inner = SizeObserver::new(narrow_wide(), ObserverOptions::named("card"), &mut svc);
    let root = ContextValue::root();
    let page_ctx = outer.publish(&root).unwrap();
    let card_ctx = inner.publish(&page_ctx).unwrap();
    assert_eq!(svc.len(), 5);

    let after = inner.teardown(&mut svc, &card_ctx);
    assert_eq!(svc.len(), 4);
    assert!(after.named_entry("card").is_none());
    assert!(after.named_entry("page").is_some());
    // Unnamed consumers now see the page observer again.
    let (_, nearest) = active_size(&after, None).unwrap();
    assert!(Arc::ptr_eq(&nearest, outer.ranges()));
    assert_eq!(after, page_ctx);
}

#[test]
fn fallback_only_observer_renders_without_probes() {
    let mut svc = GeometryProbes::new(Size::new(700.0, 300.0));
    let only = RangeConfig::new([("any", Constraints::new())]).unwrap();
    let mut observer = SizeObserver::new(only, ObserverOptions::default(), &mut svc);
    assert_eq!(observer.observe(0, &svc.flush()).unwrap(), None);
    assert_eq!(observer.active_name(), Some("any"));
    assert!(observer.should_render());
}

#[test]
fn zero_minimum_matches_any_width() {
    let ranges = RangeConfig::from_notation(&["0 <= small < 600", "600 <= large"]).unwrap();
    let mut svc = GeometryProbes::new(Size::new(300.0, 300.0));
    let mut observer = SizeObserver::new(ranges, ObserverOptions::default(), &mut svc);
    observer.observe(0, &svc.flush()).unwrap();
    assert_eq!(observer.active_name(), Some("small"));
}
