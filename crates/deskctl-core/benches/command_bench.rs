//! Criterion benchmarks for command decoding and envelope encoding.
//!
//! Measures the per-frame protocol cost the dispatcher pays before and after
//! a handler runs.
//!
//! Run with:
//! ```bash
//! cargo bench --package deskctl-core --bench command_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use deskctl_core::{CommandMessage, Envelope, ErrorCode};
use serde_json::json;

const FRAMES: &[(&str, &str)] = &[
    ("click", r#"{"token":"T","action":"click","x":100,"y":200,"button":"left"}"#),
    ("move", r#"{"token":"T","action":"move","x":500.5,"y":400,"duration":0.2}"#),
    ("type", r#"{"token":"T","action":"type","text":"Hello from WebSocket!","interval":0.02}"#),
    ("hotkey", r#"{"token":"T","action":"hotkey","keys":["ctrl","shift","esc"]}"#),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_parse");

    for (name, frame) in FRAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), frame, |b, frame| {
            b.iter(|| {
                let cmd = CommandMessage::parse(black_box(frame)).unwrap();
                (cmd.token().is_some(), cmd.coordinate("x"))
            })
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_encode");

    group.bench_function("ok_click", |b| {
        b.iter(|| Envelope::ok(black_box(json!({"clicked": [100, 200], "button": "left"}))).to_json())
    });

    group.bench_function("bare_error", |b| {
        b.iter(|| Envelope::bare_error(black_box(ErrorCode::Unauthorized)).to_json())
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_envelope);
criterion_main!(benches);
