//! Throughput of actionable message token validation
//!
//! Keys are served by a static provider, so the numbers cover parsing, signature
//! verification and claim checks only.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

#[path = "../tests/common/mod.rs"]
mod common;

use common::{AUDIENCE, TokenBuilder, tamper_signature, validator};

fn bench_validation(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let validator = validator();
    let token = TokenBuilder::new().sign();
    let tampered = tamper_signature(&token);

    let mut group = c.benchmark_group("validate");

    group.bench_function("valid_rs256", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let result = validator.validate(black_box(&token), AUDIENCE).await;
                black_box(result)
            })
        })
    });

    group.bench_function("invalid_signature", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let result = validator.validate(black_box(&tampered), AUDIENCE).await;
                black_box(result)
            })
        })
    });

    group.bench_function("malformed", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let result = validator.validate(black_box("abc"), AUDIENCE).await;
                black_box(result)
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
