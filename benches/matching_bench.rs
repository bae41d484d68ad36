use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use clob_engine::{Asset, Context, Engine, Order, Value, Wallet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Amt(i64);

impl Value for Amt {
    fn zero() -> Self {
        Amt(0)
    }
    fn add(&self, other: &Self) -> Self {
        Amt(self.0 + other.0)
    }
    fn sub(&self, other: &Self) -> Self {
        Amt(self.0 - other.0)
    }
    fn mul(&self, other: &Self) -> Self {
        Amt(self.0 * other.0)
    }
}

#[derive(Clone, PartialEq)]
struct Bottomless;

impl Wallet<Amt> for Bottomless {
    fn balance(&self, _ctx: &Context, _asset: Asset) -> Amt {
        Amt(i64::MAX / 4)
    }
    fn update_balance(&self, _ctx: &Context, _asset: Asset, _delta: Amt) {}
    fn in_order(&self, _ctx: &Context, _asset: Asset) -> Amt {
        Amt(0)
    }
    fn update_in_order(&self, _ctx: &Context, _asset: Asset, _delta: Amt) {}
}

fn populated_book(depth: usize) -> Engine<Amt, Bottomless> {
    let engine = Engine::new("BASE", "QUOTE");
    for i in 0..depth {
        let price = 1_000 + (i % 500) as i64;
        let side = i % 2 == 0;
        let id = format!("seed-{i}");
        let order = Order::new(id, Bottomless, side, Amt(price), Amt(10));
        engine.place_order(&Context::none(), None, order).unwrap();
    }
    engine
}

fn bench_place_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine::place_order");
    for &depth in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("resting_limit", depth), &depth, |b, &depth| {
            b.iter_with_setup(
                || (populated_book(depth), 0usize),
                |(engine, mut counter)| {
                    counter += 1;
                    let id = format!("bench-{counter}");
                    let order = Order::new(id, Bottomless, true, Amt(1_250), Amt(10));
                    black_box(engine.place_order(&Context::none(), None, order).unwrap());
                },
            );
        });
    }
    group.finish();
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine::place_order - market sweep");
    for &depth in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("crossing_depth", depth), &depth, |b, &depth| {
            b.iter_with_setup(
                || (populated_book(depth), 0usize),
                |(engine, mut counter)| {
                    counter += 1;
                    let id = format!("sweep-{counter}");
                    let order = Order::new(id, Bottomless, true, Amt(0), Amt(5));
                    black_box(engine.place_order(&Context::none(), None, order).unwrap());
                },
            );
        });
    }
    group.finish();
}

fn bench_cancel_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine::cancel_order");
    for &depth in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("resting_limit", depth), &depth, |b, &depth| {
            b.iter_with_setup(
                || populated_book(depth),
                |engine| {
                    black_box(engine.cancel_order(&Context::none(), None, "seed-0").ok());
                },
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_place_order, bench_market_sweep, bench_cancel_order);
criterion_main!(benches);
