use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::Array2;

use flens_lens::{
    UnlensedSpectra, calc_lensed_b_first_order, calc_lensed_clbb_flat_sky_first_order,
};
use flens_maps::{Grid, RealMap, SkyField};

/// Deterministic pseudo-random pixels for benchmarking.
fn noise_map(grid: Grid, seed: u64) -> RealMap {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let map = Array2::from_shape_fn(grid.shape(), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    });
    RealMap::new(grid, map).expect("map should build")
}

fn bench_lensed_b_map(c: &mut Criterion) {
    let grid = Grid::square(64, 0.01).expect("grid should build");
    let e = SkyField::from(noise_map(grid, 1));
    let phi = SkyField::from(noise_map(grid, 2));
    c.bench_function("calc_lensed_b_first_order_64", |b| {
        b.iter(|| calc_lensed_b_first_order(&e, &phi));
    });
}

fn bench_binned_clbb(c: &mut Criterion) {
    let lmax = 200;
    let clee = (0..=lmax).map(|l| 1.0 / (1.0 + l as f64).powi(2)).collect();
    let clpp = (0..=lmax)
        .map(|l| 1e-2 * (-(l as f64) / 60.0).exp())
        .collect();
    let cl_unl = UnlensedSpectra::new(lmax, clee, clpp).expect("spectra should build");
    let lbins: Vec<f64> = (0..=10).map(|i| 20.0 * i as f64).collect();
    c.bench_function("calc_lensed_clbb_first_order_32", |b| {
        b.iter(|| {
            calc_lensed_clbb_flat_sky_first_order(&lbins, 32, 0.02, &cl_unl, None)
                .expect("spectrum should evaluate")
        });
    });
}

criterion_group!(benches, bench_lensed_b_map, bench_binned_clbb);
criterion_main!(benches);
