//! Benchmarks for block decoding and rendering.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kb_renderer::{ContentBlock, render_all};
use serde_json::{Value, json};

/// Build a section with `n` blocks cycling through the common variants.
fn generate_section(n: usize) -> Value {
    let blocks: Vec<Value> = (0..n)
        .map(|i| match i % 5 {
            0 => json!({"type": "note-card", "label": "KEY", "body": format!("Note {i}")}),
            1 => json!({"type": "formula", "name": "Ohm", "latex": "V = IR"}),
            2 => json!({
                "type": "table",
                "headers": ["a", "b", "c"],
                "rows": [[1, 2, 3], [4, 5, 6], [7, 8, 9]]
            }),
            3 => json!({
                "type": "proof",
                "steps": ["Start.", {"step": "Expand", "latex": "a^2 + 2ab + b^2"}]
            }),
            _ => json!({"type": "callout", "variant": "success", "body": "Done"}),
        })
        .collect();
    Value::Array(blocks)
}

fn bench_decode(c: &mut Criterion) {
    let section = generate_section(50);

    c.bench_function("decode_50_blocks", |b| {
        b.iter(|| serde_json::from_value::<Vec<ContentBlock>>(section.clone()));
    });
}

fn bench_render_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_by_size");

    for n in [10, 100, 1000] {
        let blocks: Vec<ContentBlock> =
            serde_json::from_value(generate_section(n)).expect("valid section");
        let size = render_all(&blocks).len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("blocks", n), &blocks, |b, blocks| {
            b.iter(|| render_all(blocks));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_render_by_size);
criterion_main!(benches);
