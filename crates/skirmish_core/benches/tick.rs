//! Tick-driver benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish_core::bot::Bot;
use skirmish_sandbox::fixtures::skirmish_scenario;

/// Benchmark a full decision pass on the canonical battlefield.
pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("bot_tick_skirmish", |b| {
        let mut bot = Bot::default();
        let mut arena = skirmish_scenario();
        b.iter(|| {
            black_box(bot.tick(&mut arena));
            arena.step();
        });
    });
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
