//! Benchmarks for factortest-math operations.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use factortest_math::{
    Winsorizer, design_with_intercept, ordinary_least_squares, spearman, zscore_xsection,
};
use ndarray::Array1;
use polars::prelude::*;
use rand::Rng;

fn random_array(n: usize) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    Array1::from_iter((0..n).map(|_| rng.r#gen::<f64>() * 0.1 - 0.05))
}

fn random_log_market_values(n: usize) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    Array1::from_iter((0..n).map(|_| rng.gen_range(20.0..26.0)))
}

/// `n_dates` cross-sections of `n_entities` random values.
fn random_panel(n_dates: usize, n_entities: usize) -> DataFrame {
    let dates: Vec<i32> =
        (0..n_dates as i32).flat_map(|d| std::iter::repeat_n(d, n_entities)).collect();
    let values = random_array(n_dates * n_entities).to_vec();
    df! { "date" => dates, "value" => values }.unwrap()
}

fn bench_winsorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("winsorize_expr");
    let winsorizer = Winsorizer::new(0.05, 0.05).unwrap();

    for n_entities in [300, 1000, 5000] {
        group.throughput(Throughput::Elements((n_entities * 20) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_entities), &n_entities, |b, &n| {
            let panel = random_panel(20, n);
            b.iter(|| {
                black_box(panel.clone())
                    .lazy()
                    .with_column(winsorizer.expr("value", "date"))
                    .collect()
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_zscore(c: &mut Criterion) {
    let mut group = c.benchmark_group("zscore_xsection");

    for n_entities in [300, 1000, 5000] {
        group.throughput(Throughput::Elements((n_entities * 20) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_entities), &n_entities, |b, &n| {
            let panel = random_panel(20, n);
            b.iter(|| {
                black_box(panel.clone())
                    .lazy()
                    .with_column(zscore_xsection("value", "date", 0).alias("z"))
                    .collect()
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_neutralization_ols(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_intercept_log_mv");

    // One CSI 1000 cross-section is ~1000 names.
    for n_entities in [300, 1000, 3000, 5000] {
        group.throughput(Throughput::Elements(n_entities as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_entities),
            &n_entities,
            |b, &n_entities| {
                let y = random_array(n_entities);
                let x = design_with_intercept(&random_log_market_values(n_entities));

                b.iter(|| ordinary_least_squares(black_box(&y), black_box(&x)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_rank_ic(c: &mut Criterion) {
    let mut group = c.benchmark_group("spearman");

    for size in [300, 1000, 5000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let x = random_array(size).to_vec();
            let y = random_array(size).to_vec();
            b.iter(|| spearman(black_box(&x), black_box(&y)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_winsorize, bench_zscore, bench_neutralization_ols, bench_rank_ic);

criterion_main!(benches);
