//! Fan-out benchmark suite.
//!
//! Benchmarks listener dispatch at different registration scales:
//! - Listener counts: 1, 8, 64
//!
//! Run with: cargo bench --bench fanout
//! Results saved to: target/criterion/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;

use taskwire::EventKind;
use taskwire::client::ListenerRegistry;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const LISTENER_COUNTS: &[usize] = &[1, 8, 64];

// ============================================================================
// Benchmark: Fan-out
// ============================================================================

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");

    for &count in LISTENER_COUNTS {
        let registry = ListenerRegistry::new();
        let sink = Arc::new(AtomicU64::new(0));

        for _ in 0..count {
            let sink = Arc::clone(&sink);
            registry.on(EventKind::TaskCreated, move |_| {
                sink.fetch_add(1, Ordering::Relaxed);
            });
        }

        let payload = json!({ "id": "t1", "title": "benchmark task" });

        group.bench_with_input(BenchmarkId::new("emit", count), &count, |b, _| {
            b.iter(|| registry.emit(EventKind::TaskCreated, &payload));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Registration Churn
// ============================================================================

fn bench_registration(c: &mut Criterion) {
    let registry = ListenerRegistry::new();

    c.bench_function("register_unregister", |b| {
        b.iter(|| {
            let id = registry.on(EventKind::UserTyping, |_| {});
            registry.off(EventKind::UserTyping, id);
        });
    });
}

criterion_group!(benches, bench_fanout, bench_registration);
criterion_main!(benches);
