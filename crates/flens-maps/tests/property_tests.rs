//! Property tests for flens-maps containers and conversions.
//!
//! Convention: test_{module}_{function}_{scenario}
//!
//! Reproduce: `PROPTEST_SEED=<seed> cargo test -p flens-maps --test property_tests`

use ndarray::Array2;
use proptest::prelude::*;

use flens_maps::{Grid, RealMap, SkyField};

fn small_grid() -> impl Strategy<Value = Grid> {
    ((2usize..=9), (2usize..=9), (0.005f64..0.5), (0.005f64..0.5)).prop_map(
        |(nx, ny, dx, dy)| Grid::new(nx, dx, ny, dy).expect("generated grid should be valid"),
    )
}

fn real_map(grid: Grid) -> impl Strategy<Value = RealMap> {
    let len = grid.nx() * grid.ny();
    proptest::collection::vec(-10.0f64..10.0, len).prop_map(move |pixels| {
        let map = Array2::from_shape_vec(grid.shape(), pixels)
            .expect("pixel vector should match the grid shape");
        RealMap::new(grid, map).expect("map should build")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_field_to_half_fourier_roundtrip_recovers_pixels(
        map in small_grid().prop_flat_map(real_map),
    ) {
        let recovered = map.to_half_fourier().to_real_map();
        for (actual, expected) in recovered.map().iter().zip(map.map().iter()) {
            prop_assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_field_full_fourier_of_real_input_is_hermitian(
        map in small_grid().prop_flat_map(real_map),
    ) {
        let fourier = map.to_full_fourier();
        let (ny, nx) = map.grid().shape();
        for ((iy, ix), value) in fourier.fft().indexed_iter() {
            let mirror = fourier.fft()[[(ny - iy) % ny, (nx - ix) % nx]];
            prop_assert!((*value - mirror.conj()).norm() < 1e-8);
        }
    }

    #[test]
    fn test_field_representations_agree_through_sky_field(
        map in small_grid().prop_flat_map(real_map),
    ) {
        let direct = SkyField::from(map.clone()).to_full_fourier();
        let via_half = SkyField::from(map.to_half_fourier()).to_full_fourier();
        let via_full = SkyField::from(map.to_full_fourier()).to_full_fourier();
        for ((lhs, mid), rhs) in direct
            .fft()
            .iter()
            .zip(via_half.fft().iter())
            .zip(via_full.fft().iter())
        {
            prop_assert!((lhs - mid).norm() < 1e-9);
            prop_assert!((lhs - rhs).norm() < 1e-9);
        }
    }

    #[test]
    fn test_field_forward_transform_preserves_power(
        map in small_grid().prop_flat_map(real_map),
    ) {
        // Parseval with the sqrt(dx*dy/(nx*ny)) forward convention:
        // sum |fft|^2 = dx*dy * sum |map|^2.
        let grid = map.grid();
        let fourier = map.to_full_fourier();
        let fourier_power: f64 = fourier.fft().iter().map(|value| value.norm_sqr()).sum();
        let pixel_power: f64 = map.map().iter().map(|value| value * value).sum();
        let expected = grid.dx() * grid.dy() * pixel_power;
        prop_assert!((fourier_power - expected).abs() <= 1e-8 * expected.max(1e-12));
    }
}
