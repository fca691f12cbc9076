//! Route-finding benchmarks over a synthetic chain of linked tables.

use criterion::{Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use tl_core::Dtf;
use tl_engine::{find_route, load_str, relate};

/// Builds a model with `n` tables linked in a chain by `n - 1` sets.
fn chain_source(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n.saturating_sub(1) {
        let _ = writeln!(source, "identifier link{i}");
        let _ = writeln!(source, "\tfield pub.t{i}.id{i}");
        let _ = writeln!(source, "\tfield pub.t{next}.id{i}", next = i + 1);
    }
    source
}

fn bench_relate(c: &mut Criterion) {
    let model = load_str("bench.links", &chain_source(64)).expect("load failed");
    c.bench_function("relate_mid_chain", |b| {
        b.iter(|| relate(&model, "pub", "t32"));
    });
}

fn bench_find_route(c: &mut Criterion) {
    let model = load_str("bench.links", &chain_source(64)).expect("load failed");
    let a = Dtf::new("pub", "t0", "");
    let b_end = Dtf::new("pub", "t63", "");
    c.bench_function("find_route_64_tables", |b| {
        b.iter(|| find_route(&model, &a, &b_end));
    });
}

criterion_group!(benches, bench_relate, bench_find_route);
criterion_main!(benches);
