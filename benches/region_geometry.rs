use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skymast::ephemeris::EphemerisSample;
use skymast::search_region::SearchRegion;
use skymast::stcs::containment::{circle_intersects_ring, point_in_ring};
use skymast::stcs::winding::{ensure_counter_clockwise, is_counter_clockwise};

/// Star-shaped ring of `vertices` points around (180, 0), radius 1..5 deg.
fn random_ring(rng: &mut StdRng, vertices: usize) -> Vec<(f64, f64)> {
    let mut angles: Vec<f64> = (0..vertices)
        .map(|_| rng.random::<f64>() * std::f64::consts::TAU)
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles
        .into_iter()
        .map(|theta| {
            let radius = rng.random_range(1.0..5.0);
            (180.0 + radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn region_string(ring: &[(f64, f64)]) -> String {
    format!(
        "POLYGON {}",
        ring.iter()
            .map(|(lon, lat)| format!("{lon} {lat}"))
            .join(" ")
    )
}

fn bench_winding(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    for vertices in [16usize, 128, 1024] {
        c.bench_function(&format!("winding/is_counter_clockwise_{vertices}v"), |b| {
            b.iter_batched(
                || region_string(&random_ring(&mut rng, vertices)),
                |region| black_box(is_counter_clockwise(black_box(&region))),
                BatchSize::LargeInput,
            )
        });
    }

    c.bench_function("winding/ensure_counter_clockwise_128v", |b| {
        b.iter_batched(
            || region_string(&random_ring(&mut rng, 128)),
            |region| black_box(ensure_counter_clockwise(black_box(&region))),
            BatchSize::LargeInput,
        )
    });
}

fn bench_containment(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let ring = random_ring(&mut rng, 128);
    let samples = 10_000usize;

    c.bench_function("containment/point_in_ring_128v", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        (
                            rng.random_range(174.0..186.0),
                            rng.random_range(-6.0..6.0),
                        )
                    })
                    .collect::<Vec<_>>()
            },
            |points| {
                for point in points {
                    black_box(point_in_ring(black_box(point), &ring));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("containment/circle_intersects_ring_128v", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        (
                            rng.random_range(174.0..186.0),
                            rng.random_range(-6.0..6.0),
                        )
                    })
                    .collect::<Vec<_>>()
            },
            |centers| {
                for center in centers {
                    black_box(circle_intersects_ring(black_box(center), 0.0083, &ring));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_search_region(c: &mut Criterion) {
    let path: Vec<EphemerisSample> = (0..120)
        .map(|day| EphemerisSample {
            epoch_jd: 2459000.5 + day as f64,
            ra: 100.0 + 0.25 * day as f64,
            dec: 20.0 - 0.05 * day as f64,
        })
        .collect();

    c.bench_function("search_region/from_path_120_samples", |b| {
        b.iter(|| {
            let region = SearchRegion::from_path(black_box(&path), black_box(0.0083)).unwrap();
            black_box(region);
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_winding, bench_containment, bench_search_region
);
criterion_main!(benches);
