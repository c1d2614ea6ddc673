//! Benchmark harness for the binder.
//!
//! Run with: cargo bench -p mu_binder

use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mu_ast::{AstBuilder, Declaration};
use mu_binder::Binder;
use mu_core::intern::NameInterner;
use mu_core::text::TextSpan;

/// Build `count` declarations over a manifest-shaped document body, one
/// declaration per line. Every `dup_every`-th one repeats an earlier name.
fn declarations<'a>(builder: &AstBuilder<'a>, count: usize, dup_every: usize) -> Vec<Declaration<'a>> {
    let names: Vec<String> = (0..count)
        .map(|i| {
            if dup_every > 0 && i % dup_every == 0 && i > 0 {
                format!("decl_{}", i / 2)
            } else {
                format!("decl_{}", i)
            }
        })
        .collect();

    let mut text = String::from("{\n  \"declarations\": [\n");
    let mut spans = Vec::with_capacity(count);
    for (i, name) in names.iter().enumerate() {
        let kind = if i % 2 == 0 { "stack" } else { "service" };
        text.push_str(&format!("    {{ \"kind\": \"{}\", \"name\": ", kind));
        spans.push(TextSpan::new(text.len() as u32, (name.len() + 2) as u32));
        text.push_str(&format!("\"{}\" }},\n", name));
    }
    text.push_str("  ]\n}\n");

    let doc = builder.document("bench.json", &text);
    names
        .iter()
        .zip(spans)
        .enumerate()
        .map(|(i, (name, span))| {
            if i % 2 == 0 {
                Declaration::Stack(builder.stack(doc, name, span, None))
            } else {
                Declaration::Service(builder.service(doc, name, span, Some("aws/ec2")))
            }
        })
        .collect()
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");
    for count in [100usize, 1_000, 10_000] {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);

        let clean = declarations(&builder, count, 0);
        group.bench_with_input(BenchmarkId::new("distinct", count), &clean, |b, decls| {
            b.iter(|| Binder::new(&interner).bind(black_box(decls)))
        });

        let noisy = declarations(&builder, count, 2);
        group.bench_with_input(BenchmarkId::new("duplicates", count), &noisy, |b, decls| {
            b.iter(|| Binder::new(&interner).bind(black_box(decls)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bind);
criterion_main!(benches);
