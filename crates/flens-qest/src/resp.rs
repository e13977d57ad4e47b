#![deny(unsafe_code)]

//! Estimator-pair response power, evaluated by FFT convolution.

use ndarray::{Array2, Zip};
use num_complex::Complex64;

use flens_maps::{FullFourierMap, Grid, fft2_inplace, ifft2_inplace};

use crate::estimator::QuadEst;
use crate::QestError;

/// Padding factor applied when `fill_resp` receives `npad = None`.
pub const DEFAULT_NPAD: usize = 2;

/// Overwrite `dest` with the pair response of two quadratic estimators:
///
/// ```text
/// resp(L) = 1/2 * integral d^2 l1 / (2 pi)^2
///           W_A(l1, l2, L) W_B(l1, l2, L) fl1(l1) fl2(l2),   l2 = L - l1
/// ```
///
/// Each separable term pair becomes one FFT convolution over the grid.
/// `fl1`/`fl2` are per-leg filter arrays over multipoles 0..=lmax and must
/// match the estimators' weight arrays in length. `npad` evaluates the
/// convolution on a zero-padded grid (`npad` times the mode range at the
/// same mode resolution) to suppress wrap-around, then extracts the modes
/// of the destination grid; `npad = 1` disables padding and `None` selects
/// [`DEFAULT_NPAD`].
pub fn fill_resp(
    est_a: &QuadEst,
    est_b: &QuadEst,
    dest: &mut FullFourierMap,
    fl1: &[f64],
    fl2: &[f64],
    npad: Option<usize>,
) -> Result<(), QestError> {
    let npad = npad.unwrap_or(DEFAULT_NPAD);
    if npad == 0 {
        return Err(QestError::InvalidPadding { requested: npad });
    }
    for (leg, filter) in [("1", fl1), ("2", fl2)] {
        for est in [est_a, est_b] {
            if filter.len() != est.nl() {
                return Err(QestError::WeightLengthMismatch {
                    leg,
                    expected: est.nl(),
                    actual: filter.len(),
                });
            }
        }
    }

    let grid = dest.grid();
    let padded = Grid::new(
        grid.nx() * npad,
        grid.dx() / npad as f64,
        grid.ny() * npad,
        grid.dy() / npad as f64,
    )?;
    let ell = padded.ell();
    let psi = padded.psi();
    // One 1/(dx*dy) per convolution converts the mode sum to the continuum
    // integral; the 1/2 is the estimator-pairing prefactor.
    let scale = 0.5 / (padded.dx() * padded.dy());

    let mut acc = Array2::from_elem(padded.shape(), Complex64::new(0.0, 0.0));
    for ta in est_a.terms() {
        for tb in est_b.terms() {
            let v1 = combined_weights(&ta.leg1.wl, &tb.leg1.wl, fl1);
            let v2 = combined_weights(&ta.leg2.wl, &tb.leg2.wl, fl2);
            let mut g = leg_field(
                &v1,
                ta.leg1.lpow + tb.leg1.lpow,
                ta.leg1.spin + tb.leg1.spin,
                &ell,
                &psi,
            );
            let mut h = leg_field(
                &v2,
                ta.leg2.lpow + tb.leg2.lpow,
                ta.leg2.spin + tb.leg2.spin,
                &ell,
                &psi,
            );
            ifft2_inplace(&mut g);
            ifft2_inplace(&mut h);
            g.zip_mut_with(&h, |lhs, &rhs| *lhs *= rhs);
            fft2_inplace(&mut g);

            let coeff = ta.coeff * tb.coeff * scale;
            let spin_out = ta.spin_out + tb.spin_out;
            Zip::from(&mut acc).and(&g).and(&psi).for_each(|slot, &conv, &p| {
                *slot += coeff * conv * Complex64::from_polar(1.0, spin_out as f64 * p);
            });
        }
    }

    let fft = dest.fft_mut();
    for iy in 0..grid.ny() {
        let py = padded_index(iy, grid.ny(), padded.ny());
        for ix in 0..grid.nx() {
            let px = padded_index(ix, grid.nx(), padded.nx());
            fft[[iy, ix]] = acc[[py, px]];
        }
    }
    Ok(())
}

/// Elementwise product of both estimators' leg weights and the leg filter.
fn combined_weights(wl_a: &[f64], wl_b: &[f64], filter: &[f64]) -> Vec<f64> {
    wl_a.iter()
        .zip(wl_b.iter())
        .zip(filter.iter())
        .map(|((&a, &b), &f)| a * b * f)
        .collect()
}

/// Evaluate `interp(wl)(l) * l^lpow * e^{i spin psi}` over the mode grid.
fn leg_field(
    wl: &[f64],
    lpow: i32,
    spin: i32,
    ell: &Array2<f64>,
    psi: &Array2<f64>,
) -> Array2<Complex64> {
    let mut out = Array2::from_elem(ell.raw_dim(), Complex64::new(0.0, 0.0));
    Zip::from(&mut out).and(ell).and(psi).for_each(|slot, &l, &p| {
        let amp = interp_wl(wl, l) * l.powi(lpow);
        *slot = Complex64::from_polar(amp, spin as f64 * p);
    });
    out
}

/// Linear interpolation of a multipole-indexed array; zero beyond lmax.
fn interp_wl(wl: &[f64], l: f64) -> f64 {
    let last = (wl.len() - 1) as f64;
    if l <= 0.0 {
        return wl[0];
    }
    if l >= last {
        return if l == last { wl[wl.len() - 1] } else { 0.0 };
    }
    let idx = l.floor() as usize;
    let frac = l - idx as f64;
    wl[idx] * (1.0 - frac) + wl[idx + 1] * frac
}

/// Index of the destination-grid mode `idx` on a padded grid sharing the
/// same mode resolution.
fn padded_index(idx: usize, n: usize, padded_n: usize) -> usize {
    let signed = if idx < n.div_ceil(2) {
        idx as isize
    } else {
        idx as isize - n as isize
    };
    signed.rem_euclid(padded_n as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::{interp_wl, padded_index};

    #[test]
    fn padded_index_is_identity_without_padding() {
        for idx in 0..8 {
            assert_eq!(padded_index(idx, 8, 8), idx);
        }
    }

    #[test]
    fn padded_index_maps_negative_modes_to_the_tail() {
        // n = 8, padded to 16: mode -1 (index 7) lives at padded index 15.
        assert_eq!(padded_index(7, 8, 16), 15);
        assert_eq!(padded_index(4, 8, 16), 12);
        assert_eq!(padded_index(3, 8, 16), 3);
        // odd n = 5: indices 3, 4 are modes -2, -1.
        assert_eq!(padded_index(3, 5, 10), 8);
        assert_eq!(padded_index(2, 5, 10), 2);
    }

    #[test]
    fn interp_is_linear_inside_and_zero_beyond_lmax() {
        let wl = [1.0, 3.0, 5.0];
        assert_eq!(interp_wl(&wl, -2.0), 1.0);
        assert_eq!(interp_wl(&wl, 0.5), 2.0);
        assert_eq!(interp_wl(&wl, 2.0), 5.0);
        assert_eq!(interp_wl(&wl, 2.1), 0.0);
        assert_eq!(interp_wl(&wl, 50.0), 0.0);
    }
}
