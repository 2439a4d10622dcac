use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use rayon::prelude::*;

use _rust::geod::Geod;
use _rust::geodesic::{Geodesic, Mask};
use _rust::polygon::PolygonArea;

fn make_pairs(n: usize) -> Vec<(f64, f64, f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (
                -80.0 + 160.0 * t,
                -180.0 + 360.0 * t,
                60.0 - 120.0 * t,
                170.0 - 300.0 * t,
            )
        })
        .collect()
}

fn bench_inverse(c: &mut Criterion) {
    let g = Geodesic::wgs84();
    let pairs = make_pairs(10_000);

    c.bench_function("inverse_10k", |b| {
        b.iter(|| {
            for &(lat1, lon1, lat2, lon2) in &pairs {
                black_box(g.gen_inverse(lat1, lon1, lat2, lon2, Mask::INVERSE_DEFAULT));
            }
        });
    });

    // Nearly antipodal pairs take the most Newton iterations
    c.bench_function("inverse_antipodal_1k", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let lat = -1.0 + 0.002 * i as f64;
                black_box(g.gen_inverse(lat, 0.0, -lat + 0.5, 179.5, Mask::ALL));
            }
        });
    });
}

fn bench_direct(c: &mut Criterion) {
    let g = Geodesic::wgs84();

    c.bench_function("direct_10k", |b| {
        b.iter(|| {
            for i in 0..10_000 {
                let t = i as f64 / 10_000.0;
                black_box(g.gen_direct(
                    -60.0 + 120.0 * t,
                    0.0,
                    360.0 * t - 180.0,
                    false,
                    1.0e7 * t,
                    Mask::DIRECT_DEFAULT,
                ));
            }
        });
    });

    let line = g.line(40.0, -75.0, 45.0, Mask::ALL).unwrap();
    c.bench_function("line_position_10k", |b| {
        b.iter(|| {
            for i in 0..10_000 {
                black_box(line.position(i as f64 * 1000.0, Mask::ALL));
            }
        });
    });
}

fn bench_polygon(c: &mut Criterion) {
    let g = Geodesic::wgs84();
    let n = 1000;
    let ring: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64;
            (45.0 + 10.0 * t.sin(), 10.0 + 15.0 * t.cos())
        })
        .collect();

    c.bench_function("polygon_area_1000_vertices", |b| {
        b.iter(|| {
            let mut poly = PolygonArea::new(g, false);
            for &(lat, lon) in &ring {
                poly.add_point(lat, lon);
            }
            black_box(poly.compute(false, true))
        });
    });
}

fn bench_geod_batch(c: &mut Criterion) {
    let geod = Geod::wgs84();
    let n = 100_000;
    let pairs = make_pairs(n);
    let lats1 = Array1::from_iter(pairs.iter().map(|p| p.0));
    let lons1 = Array1::from_iter(pairs.iter().map(|p| p.1));
    let lats2 = Array1::from_iter(pairs.iter().map(|p| p.2));
    let lons2 = Array1::from_iter(pairs.iter().map(|p| p.3));

    c.bench_function("geod_inv_100k", |b| {
        b.iter(|| {
            black_box(
                geod.inv(
                    &lons1.view(),
                    &lats1.view(),
                    &lons2.view(),
                    &lats2.view(),
                    false,
                )
                .unwrap(),
            )
        });
    });
}

fn bench_inverse_thread_scaling(c: &mut Criterion) {
    // One shared engine, inverse problems spread over a rayon pool
    let g = Geodesic::wgs84();
    let pairs = make_pairs(100_000);

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("inverse_threads_{threads}_100k"), |b| {
            b.iter(|| {
                black_box(pool.install(|| {
                    pairs
                        .par_iter()
                        .map(|&(lat1, lon1, lat2, lon2)| {
                            g.gen_inverse(lat1, lon1, lat2, lon2, Mask::DISTANCE).s12
                        })
                        .collect::<Vec<_>>()
                }))
            });
        });
    }
}

criterion_group!(
    benches,
    bench_inverse,
    bench_direct,
    bench_polygon,
    bench_geod_batch,
    bench_inverse_thread_scaling
);
criterion_main!(benches);
