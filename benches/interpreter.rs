use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hierchat::interpreter::interpret;
use hierchat::storage::HierarchyTotal;
use hierchat::treemap::layout_totals;

const QUERIES: [(&str, &str); 5] = [
    ("year", "Show the relative total revenue of hierarchy 1 in 2019"),
    ("quarter", "Show the relative total stock of hierarchy 3 in Q2 2021"),
    ("month", "Show the relative total revenue of hierarchy 1 in Sept 2022"),
    ("between", "Show the relative total sales of hierarchy 2 between 05/03/2020 and 01-01-2020"),
    ("unmatched", "What is the weather today?"),
];

fn bench_interpret(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret");
    for (name, q) in QUERIES {
        group.bench_with_input(BenchmarkId::new("query", name), &q, |b, q| {
            b.iter(|| criterion::black_box(interpret(q)));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("treemap_layout");
    for n in [10usize, 100, 1_000] {
        // deterministic, uneven sizes
        let totals: Vec<HierarchyTotal> = (0..n)
            .map(|i| HierarchyTotal { label: format!("H{:04}", i), value: ((i * 7919) % 1000 + 1) as f64 })
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("layout_totals", n), &totals, |b, totals| {
            b.iter(|| criterion::black_box(layout_totals(totals).ok()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_interpret, bench_layout);
criterion_main!(benches);
