// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested size observers over a simulated window resize.
//!
//! A page observer and a named sidebar observer share one `GeometryProbes`
//! service per element. Descendants query the context by nearest ancestor or
//! by name. Set `RUST_LOG=understory_breakpoints=debug` to see registration
//! and guard diagnostics.
//!
//! Run:
//! - `cargo run -p understory_demos --example breakpoints_observer`

use kurbo::Size;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_breakpoints::config::RangeConfig;
use understory_breakpoints::context::{ContextValue, active_size};
use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
use understory_breakpoints::service::GeometryProbes;
use understory_breakpoints::types::Constraints;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}

fn describe(ctx: &ContextValue, name: Option<&str>) -> String {
    match active_size(ctx, name) {
        Ok((active, ranges)) => active
            .and_then(|i| ranges.name_of(i))
            .unwrap_or("<none>")
            .to_string(),
        Err(err) => format!("error: {err}"),
    }
}

fn main() {
    init_logging();

    let page_ranges = RangeConfig::from_notation(&["mobile < 768", "768 <= tablet < 1200", "desktop"])
        .unwrap();
    let sidebar_ranges = RangeConfig::new([
        ("collapsed", Constraints::new().max_width(199.0)),
        ("short", Constraints::new().min_width(200.0).max_height(499.0)),
        ("expanded", Constraints::new()),
    ])
    .unwrap();

    let mut window = GeometryProbes::new(Size::new(375.0, 812.0));
    let mut sidebar_box = GeometryProbes::new(Size::new(0.0, 812.0));
    let mut page = SizeObserver::new(page_ranges, ObserverOptions::named("page"), &mut window);
    let mut sidebar = SizeObserver::new(
        sidebar_ranges,
        ObserverOptions::named("sidebar"),
        &mut sidebar_box,
    );

    let frames = [
        (0, Size::new(375.0, 812.0)),
        (16, Size::new(800.0, 600.0)),
        (32, Size::new(1280.0, 720.0)),
        (48, Size::new(1920.0, 400.0)),
    ];
    for (now, size) in frames {
        page.observe(now, &window.resize(size)).unwrap();
        // The sidebar takes a fifth of the window, once there is room for it.
        let sidebar_width = if size.width >= 768.0 { size.width / 5.0 } else { 0.0 };
        sidebar
            .observe(now, &sidebar_box.resize(Size::new(sidebar_width, size.height)))
            .unwrap();

        let root = ContextValue::root();
        let page_ctx = page.publish(&root).unwrap();
        let sidebar_ctx = sidebar.publish(&page_ctx).unwrap();

        info!(
            t = now,
            window = %format!("{}x{}", size.width, size.height),
            nearest = %describe(&sidebar_ctx, None),
            page = %describe(&sidebar_ctx, Some("page")),
            sidebar = %describe(&sidebar_ctx, Some("sidebar")),
            "frame"
        );
    }

    // Unknown names are wiring mistakes and surface as errors.
    let ctx = page.publish(&ContextValue::root()).unwrap();
    info!(footer = %describe(&ctx, Some("footer")), "lookup of an unpublished name");

    let ctx = sidebar.teardown(&mut sidebar_box, &ctx);
    let ctx = page.teardown(&mut window, &ctx);
    info!(
        probes = window.len() + sidebar_box.len(),
        published = ctx.default_entry().is_some(),
        "torn down"
    );
}
