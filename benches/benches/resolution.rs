// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_breakpoints::config::RangeConfig;
use understory_breakpoints::guard::GuardConfig;
use understory_breakpoints::observer::{ObserverOptions, SizeObserver};
use understory_breakpoints::probe::expand_probes;
use understory_breakpoints::resolve::resolve;
use understory_breakpoints::service::GeometryProbes;
use understory_breakpoints::types::ProbeState;

/// `n` contiguous width ranges, 100px apart.
fn gen_width_notation(n: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(n);
    out.push("r0 < 100".to_string());
    for i in 1..n - 1 {
        out.push(format!("{} <= r{} < {}", i * 100, i, (i + 1) * 100));
    }
    out.push(format!("{} <= r{}", (n - 1) * 100, n - 1));
    out
}

fn gen_ranges(n: usize) -> RangeConfig {
    let entries = gen_width_notation(n);
    let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
    RangeConfig::from_notation(&refs).unwrap()
}

/// Xorshift widths in `1..=max`, reproducible per seed.
struct Widths(u64);

impl Widths {
    fn sample(&mut self, max: f64) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        let unit = (self.0 >> 11) as f64 / (1_u64 << 53) as f64;
        (unit * max).floor() + 1.0
    }
}

fn sensed_states(ranges: &RangeConfig, width: f64) -> Vec<ProbeState> {
    expand_probes(ranges)
        .iter()
        .map(|p| ProbeState::from_contained(p.target_size().width <= width))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[4usize, 16, 64] {
        let entries = gen_width_notation(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("from_notation_n{}", n), |b| {
            b.iter(|| {
                let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
                let ranges = RangeConfig::from_notation(&refs).unwrap();
                black_box(expand_probes(&ranges).len());
            });
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for &n in &[4usize, 16, 64] {
        let ranges = gen_ranges(n);
        let probes = expand_probes(&ranges);
        let mut widths = Widths(0x9E37_79B9_7F4A_7C15);
        let states: Vec<Vec<ProbeState>> = (0..256)
            .map(|_| sensed_states(&ranges, widths.sample((n * 100) as f64)))
            .collect();
        group.throughput(Throughput::Elements(states.len() as u64));
        group.bench_function(format!("random_widths_n{}", n), |b| {
            b.iter(|| {
                for s in &states {
                    black_box(resolve(&ranges, &probes, s));
                }
            });
        });
    }
    group.finish();
}

fn bench_observer(c: &mut Criterion) {
    let mut group = c.benchmark_group("observer");
    let ranges = gen_ranges(16);
    let mut source = Widths(7);
    let widths: Vec<f64> = (0..256).map(|_| source.sample(1600.0)).collect();
    group.throughput(Throughput::Elements(widths.len() as u64));
    group.bench_function("resize_sweep_n16", |b| {
        b.iter_batched(
            || {
                let mut svc = GeometryProbes::new(Size::new(800.0, 600.0));
                let options = ObserverOptions {
                    guard: GuardConfig {
                        limit: u32::MAX,
                        ..GuardConfig::default()
                    },
                    ..ObserverOptions::default()
                };
                let observer = SizeObserver::new(ranges.clone(), options, &mut svc);
                (svc, observer)
            },
            |(mut svc, mut observer)| {
                for (now, &w) in widths.iter().enumerate() {
                    let batch = svc.resize(Size::new(w, 600.0));
                    let _ = black_box(observer.observe(now as u64, &batch));
                }
                black_box(observer.active());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_resolve, bench_observer);
criterion_main!(benches);
