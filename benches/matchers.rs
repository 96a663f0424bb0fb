use criterion::{Criterion, black_box, criterion_group, criterion_main};
use matchkit::{Graph, MatchingAlgorithm, PathGrowingMatcher, SuitorMatcher};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn random_graph(nodes: usize, probability: f64, seed: u64) -> Graph {
    let mut graph = Graph::new(nodes, true);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    for u in 0..nodes {
        for v in (u + 1)..nodes {
            if rng.r#gen::<f64>() <= probability {
                graph
                    .add_weighted_edge(u, v, rng.r#gen::<f64>())
                    .expect("edge");
            }
        }
    }
    graph
}

fn bench_matchers(c: &mut Criterion) {
    let graph = random_graph(2_000, 0.01, 42);
    let mut sorted = graph.clone();
    sorted.sort_edges_by_weight(true);

    let mut group = c.benchmark_group("matchers");

    group.bench_function("path_growing_2000", |b| {
        b.iter(|| {
            let mut matcher = PathGrowingMatcher::new(&graph).expect("matcher");
            matcher.run().expect("run");
            black_box(matcher.get_matching().expect("matching"));
        });
    });

    group.bench_function("suitor_2000", |b| {
        b.iter(|| {
            let mut matcher = SuitorMatcher::new(&graph, false, false).expect("matcher");
            matcher.run().expect("run");
            black_box(matcher.get_matching().expect("matching"));
        });
    });

    group.bench_function("suitor_sorted_2000", |b| {
        b.iter(|| {
            let mut matcher = SuitorMatcher::new(&sorted, true, false).expect("matcher");
            matcher.run().expect("run");
            black_box(matcher.get_matching().expect("matching"));
        });
    });

    group.bench_function("suitor_parallel_2000", |b| {
        b.iter(|| {
            let mut matcher = SuitorMatcher::new(&graph, false, false)
                .expect("matcher")
                .parallel(true);
            matcher.run().expect("run");
            black_box(matcher.get_matching().expect("matching"));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_matchers);
criterion_main!(benches);
