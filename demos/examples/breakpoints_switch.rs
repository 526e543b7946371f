// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing content by the active range, and the storm guard stepping in
//! when that content feeds back into the observed size.
//!
//! Run:
//! - `cargo run -p understory_demos --example breakpoints_switch`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_breakpoints::config::RangeConfig;
use understory_breakpoints::guard::{GuardConfig, StormPolicy};
use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
use understory_breakpoints::service::GeometryProbes;
use understory_breakpoints::switch::{SizeCondition, select_case};

const LABELS: [&str; 3] = ["full table", "two columns", "single column"];

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).compact().try_init();

    let ranges = RangeConfig::from_notation(&["small < 600", "600 <= medium < 900", "900 <= large"]).unwrap();
    let cases = [
        SizeCondition::at_least("large"),
        SizeCondition::is("medium"),
        SizeCondition::Always,
    ];

    let mut svc = GeometryProbes::new(Size::new(500.0, 300.0));
    let mut observer = SizeObserver::new(ranges.clone(), ObserverOptions::default(), &mut svc);
    for (now, width) in [(0, 500.0), (10, 700.0), (20, 1200.0)] {
        observer.observe(now, &svc.resize(Size::new(width, 300.0))).unwrap();
        let pick = select_case(&observer.entry(), &cases).unwrap();
        println!(
            "width {width:>6}: {}",
            pick.map_or("<nothing>", |i| LABELS[i])
        );
    }

    // Rendering "two columns" adds a scrollbar that pushes the element back
    // under 600px, which selects "single column", which removes the scrollbar.
    let options = ObserverOptions {
        guard: GuardConfig {
            limit: 10,
            window_ms: 1000,
            policy: StormPolicy::Suppress,
        },
        ..ObserverOptions::default()
    };
    let mut svc = GeometryProbes::new(Size::new(610.0, 300.0));
    let mut observer = SizeObserver::new(ranges, options, &mut svc);
    let mut width = 610.0;
    let mut published = 0;
    for now in 0..40 {
        if observer.observe(now, &svc.resize(Size::new(width, 300.0))).unwrap().is_some() {
            published += 1;
        }
        width = if observer.active_name() == Some("medium") { 590.0 } else { 610.0 };
    }
    println!("oscillation: {published} updates published in 40 frames");
    if let Some(released) = observer.poll(1000).unwrap() {
        println!("released after the window: {:?}", released.and_then(|i| observer.ranges().name_of(i)));
    }
}
