//! Benchmarks for the tree reconciler on the in-memory surface.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use vdom_core::{create_element, update_element, MemorySurface, Props, VNode};

fn list(n: usize, offset: usize) -> VNode {
    create_element(
        "ul",
        None,
        (0..n).map(|i| {
            create_element(
                "li",
                Props::new().with("className", if (i + offset) % 2 == 0 { "even" } else { "odd" }),
                [VNode::text(format!("Item {}", i + offset))],
            )
        }),
    )
}

fn deep(depth: usize, label: &str) -> VNode {
    (0..depth).fold(VNode::text(label), |child, i| {
        create_element("div", Props::new().with("data-depth", i as i64), [child])
    })
}

/// Patch a list whose every item changed class and text.
fn bench_wide_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_list");

    for n in [10, 100, 1000] {
        let old = list(n, 0);
        let new = list(n, 1);
        group.bench_with_input(BenchmarkId::new("patch", n), &n, |b, _| {
            b.iter_batched(
                || {
                    let mut surface = MemorySurface::new();
                    let root = surface.root();
                    update_element(&mut surface, &root, Some(&old), None, 0).unwrap();
                    (surface, root)
                },
                |(mut surface, root)| {
                    update_element(&mut surface, &root, Some(&new), Some(&old), 0).unwrap();
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Reconcile an unchanged deep tree against itself.
fn bench_deep_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_steady_state");

    for depth in [10, 100] {
        let tree = deep(depth, "leaf");
        let mut surface = MemorySurface::new();
        let root = surface.root();
        update_element(&mut surface, &root, Some(&tree), None, 0).unwrap();

        group.bench_with_input(BenchmarkId::new("noop", depth), &depth, |b, _| {
            b.iter(|| {
                update_element(&mut surface, &root, Some(&tree), Some(&tree), 0).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wide_list, bench_deep_steady_state);
criterion_main!(benches);
