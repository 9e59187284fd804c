use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use size_scanner::builder::TreeBuilder;
use size_scanner::thread_pool::{worker_count, ThreadPoolStrategy};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Many sibling directories directly under the root, so the fan-out matters.
fn create_wide_structure(dir: &Path, subdirs: usize, depth: usize, files_per_dir: usize) {
    for s in 0..subdirs {
        let mut current = dir.join(format!("top_{}", s));
        for level in 0..depth {
            fs::create_dir_all(&current).unwrap();
            for i in 0..files_per_dir {
                let content = format!("Large file content {}\n", i).repeat(100);
                fs::write(current.join(format!("file_{}.txt", i)), content).unwrap();
            }
            current = current.join(format!("level_{}", level));
        }
    }
}

fn thread_pool_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_wide_structure(root, 24, 4, 8);

    let strategies = [
        (ThreadPoolStrategy::Default, 0),
        (ThreadPoolStrategy::Fixed, 1),
        (ThreadPoolStrategy::Fixed, 4),
        (ThreadPoolStrategy::NumCpusMinus1, 0),
        (ThreadPoolStrategy::IOHeavy, 0),
    ];

    let mut group = c.benchmark_group("thread_pool_strategies");

    for (strategy, n_threads) in strategies {
        let workers = worker_count(strategy, n_threads).unwrap();
        let builder = TreeBuilder::new().workers(workers);

        group.bench_with_input(
            BenchmarkId::new(strategy.as_str(), workers),
            &workers,
            |b, _workers| b.iter(|| builder.build(black_box(root)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, thread_pool_benchmark);
criterion_main!(benches);
