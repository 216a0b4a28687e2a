use floatlab::{
    bracket, decade_steps, normalize, significand, sweep, Scheme, Semantics,
    Sine, REFERENCE,
};

fn test_normalize() {
    for v in [8.2, 0.1, 2.3, 1e-6, 355. / 113.] {
        black_box(normalize(v, REFERENCE).unwrap());
    }
}

fn test_normalize_huge() {
    black_box(normalize(f64::MAX, REFERENCE).unwrap());
}

fn test_significand_subnormal() {
    let sem = Semantics::new(64, 1100);
    black_box(significand(f64::from_bits(1), sem).unwrap());
}

fn test_bracket() {
    for p in 1..54 {
        black_box(bracket(std::f64::consts::PI, p, REFERENCE).unwrap());
    }
}

fn test_sweep() {
    let steps = decade_steps(16).unwrap();
    black_box(sweep(&Sine, Scheme::Central, 1.0, &steps).unwrap());
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_normalize", |b| b.iter(test_normalize));
    c.bench_function("test_normalize_huge", |b| b.iter(test_normalize_huge));
    c.bench_function("test_significand_subnormal", |b| {
        b.iter(test_significand_subnormal)
    });
    c.bench_function("test_bracket", |b| b.iter(test_bracket));
    c.bench_function("test_sweep", |b| b.iter(test_sweep));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
