// benches/export_bench.rs
//! Benchmarks for the flatten → schema → encode pipeline.

use bugsnag2csv::{encode_row, export_csv, flatten, SchemaPolicy};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

/// Bugsnag-shaped events whose optional fields vary by index.
fn create_sample_events(count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| {
            let mut event = json!({
                "id": format!("event-{}", i),
                "received_at": "2024-01-01T00:00:00.000Z",
                "severity": if i % 3 == 0 { "error" } else { "warning" },
                "unhandled": i % 2 == 0,
                "exceptions": [{
                    "errorClass": "TypeError",
                    "message": format!("value {} is undefined, \"again\"", i),
                    "stacktrace": [
                        {"file": "app.js", "lineNumber": i, "method": "render"},
                        {"file": "vendor.js", "lineNumber": 1, "method": "call"}
                    ]
                }],
                "app": {"releaseStage": "production", "version": "1.0.0"},
            });
            if i % 5 == 0 {
                event["metaData"] = json!({"user": {"id": i, "plan": "pro"}});
            }
            event
        })
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let events = create_sample_events(1);
    c.bench_function("flatten_single_event", |b| {
        b.iter(|| flatten(black_box(&events[0])));
    });
}

fn bench_encode(c: &mut Criterion) {
    let cells = vec!["plain", "with, comma", "with \"quotes\"", "", "multi\nline"];
    c.bench_function("encode_row_mixed_cells", |b| {
        b.iter(|| encode_row(black_box(&cells)));
    });
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_csv");

    for (size, name) in [(100, "small"), (1000, "medium"), (10000, "large")] {
        let events = create_sample_events(size);

        for policy in [SchemaPolicy::Frequency, SchemaPolicy::Intersection] {
            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), name),
                &events,
                |b, events| {
                    b.iter(|| export_csv(black_box(events), policy).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_encode, bench_export);
criterion_main!(benches);
