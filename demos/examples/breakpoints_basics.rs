// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range configuration, probe expansion, and resolution without an observer.
//!
//! Run:
//! - `cargo run -p understory_demos --example breakpoints_basics`

use kurbo::Size;
use understory_breakpoints::config::RangeConfig;
use understory_breakpoints::probe::expand_probes;
use understory_breakpoints::resolve::resolve;
use understory_breakpoints::types::ProbeState;

fn main() {
    let ranges = RangeConfig::from_notation(&[
        "x-small < 600",
        "600 <= small < 768",
        "768 <= medium < 1024",
        "1024 <= large",
    ])
    .unwrap();

    let probes = expand_probes(&ranges);
    println!("{} ranges, {} probes:", ranges.len(), probes.len());
    for p in &probes {
        let t = p.target_size();
        println!(
            "  {:<8} {:>6}px  owner={:<8} probe box {}x{}",
            p.kind.config_key(),
            p.value,
            ranges[p.owner].name(),
            t.width,
            t.height
        );
    }

    // Nothing observed yet.
    let unknown = vec![ProbeState::Unknown; probes.len()];
    println!("before observation: {:?}", resolve(&ranges, &probes, &unknown));

    // Sense each probe against an element, the way a probe service would.
    for width in [320.0, 600.0, 767.0, 768.0, 1440.0] {
        let element = Size::new(width, 400.0);
        let states: Vec<ProbeState> = probes
            .iter()
            .map(|p| {
                let t = p.target_size();
                ProbeState::from_contained(t.width <= element.width && t.height <= element.height)
            })
            .collect();
        let active = resolve(&ranges, &probes, &states);
        println!(
            "width {width:>6}: {}",
            active.and_then(|i| ranges.name_of(i)).unwrap_or("<none>")
        );
    }

    // A fallback anywhere but last is rejected.
    match RangeConfig::from_notation(&["rest", "600 <= wide"]) {
        Ok(_) => println!("unexpected: accepted"),
        Err(err) => println!("rejected: {err}"),
    }
}
