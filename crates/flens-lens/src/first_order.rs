#![deny(unsafe_code)]

//! First-order lensed B modes: the map-level remapping formula and the
//! binned-spectrum wrappers around the quadratic-estimator response.

use ndarray::{Array2, Zip};
use num_complex::Complex64;

use flens_maps::{
    BinnedSpectrum, FullFourierMap, Grid, SkyField, fft2_inplace, ifft2_inplace,
};
use flens_qest::{QuadEst, fill_resp};

use crate::model::UnlensedSpectra;
use crate::LensError;

/// Evaluate the lensed B modes to first order in the lensing potential.
///
/// `e` holds the unlensed E modes and `phi` the lensing potential, each in
/// any [`SkyField`] representation; both are canonicalized to full-complex
/// Fourier form first. The remapping is the flat-sky spin-2 convolution:
/// rotate E by `e^{+-2i psi}`, form real-space gradients of the rotated
/// field and of the potential, multiply and sum the components, transform
/// back and undo the rotation, then combine the two spin branches with the
/// `-i/2` prefactor. The result is rescaled by `sqrt(nx*ny) / sqrt(dx*dy)`
/// to the analysis Fourier convention.
///
/// # Panics
///
/// Panics if the normalized `e` and `phi` grids are not compatible; there
/// is no sensible partial result for mismatched grids.
#[must_use]
pub fn calc_lensed_b_first_order(e: &SkyField, phi: &SkyField) -> FullFourierMap {
    let efft = e.to_full_fourier();
    let pfft = phi.to_full_fourier();
    assert!(
        efft.grid().compatible(&pfft.grid()),
        "e and phi must live on identical grids"
    );

    let grid = efft.grid();
    let lx = grid.lx();
    let ly = grid.ly();
    let psi = grid.psi();
    let rot = psi.mapv(|p| Complex64::from_polar(1.0, 2.0 * p));

    // Real-space gradient components of the potential, shared by both
    // spin branches.
    let grad_px = gradient_component(pfft.fft(), &lx, None);
    let grad_py = gradient_component(pfft.fft(), &ly, None);

    let conj_rot = rot.mapv(|value| value.conj());
    let plus = spin_branch(efft.fft(), &rot, &lx, &ly, &grad_px, &grad_py);
    let minus = spin_branch(efft.fft(), &conj_rot, &lx, &ly, &grad_px, &grad_py);

    let mut ret = FullFourierMap::zeroed(grid);
    let prefactor = Complex64::new(0.0, -0.5);
    Zip::from(ret.fft_mut())
        .and(&plus)
        .and(&minus)
        .and(&rot)
        .for_each(|slot, &p, &m, &r| {
            // The +2 branch is de-rotated by e^{-2i psi}; the -2 branch
            // carries the opposite phase and an overall sign flip.
            *slot = prefactor * (p * r.conj() - m * r);
        });
    ret *= ((grid.nx() * grid.ny()) as f64).sqrt() / (grid.dx() * grid.dy()).sqrt();
    ret
}

/// `field * lweight` (optionally spin-rotated), inverse transformed to
/// real space: one gradient component of the field.
fn gradient_component(
    fft: &Array2<Complex64>,
    lweight: &Array2<f64>,
    rot: Option<&Array2<Complex64>>,
) -> Array2<Complex64> {
    let mut out = Array2::from_elem(fft.raw_dim(), Complex64::new(0.0, 0.0));
    match rot {
        Some(rot) => Zip::from(&mut out)
            .and(fft)
            .and(lweight)
            .and(rot)
            .for_each(|slot, &value, &l, &r| *slot = value * l * r),
        None => Zip::from(&mut out)
            .and(fft)
            .and(lweight)
            .for_each(|slot, &value, &l| *slot = value * l),
    }
    ifft2_inplace(&mut out);
    out
}

/// One spin branch: dot the rotated-E gradient with the potential gradient
/// in real space and transform forward again.
fn spin_branch(
    efft: &Array2<Complex64>,
    rot: &Array2<Complex64>,
    lx: &Array2<f64>,
    ly: &Array2<f64>,
    grad_px: &Array2<Complex64>,
    grad_py: &Array2<Complex64>,
) -> Array2<Complex64> {
    let ex = gradient_component(efft, lx, Some(rot));
    let ey = gradient_component(efft, ly, Some(rot));
    let mut sum = Array2::from_elem(efft.raw_dim(), Complex64::new(0.0, 0.0));
    Zip::from(&mut sum)
        .and(&ex)
        .and(grad_px)
        .and(&ey)
        .and(grad_py)
        .for_each(|slot, &ex, &px, &ey, &py| *slot = ex * px + ey * py);
    fft2_inplace(&mut sum);
    sum
}

fn sqrt_weights(cl: &[f64]) -> Vec<f64> {
    cl.iter().map(|&value| value.sqrt()).collect()
}

fn binned_clbb(
    lbins: &[f64],
    nx: usize,
    dx: f64,
    cl_unl: &UnlensedSpectra,
    w: Option<&dyn Fn(f64) -> f64>,
    curl: bool,
    npad: Option<usize>,
) -> Result<BinnedSpectrum, LensError> {
    let grid = Grid::square(nx, dx)?;
    let mut dest = FullFourierMap::zeroed(grid);
    let wl_e = sqrt_weights(cl_unl.clee());
    let wl_p = sqrt_weights(cl_unl.clpp());
    // The estimator multiplies amplitude-like weight functions, hence the
    // square roots of the model spectra.
    let qe = if curl {
        QuadEst::blm_ex(&wl_e, &wl_p)?
    } else {
        QuadEst::blen_ep(&wl_e, &wl_p)?
    };
    let nl = cl_unl.lmax() + 1;
    // Unit filter on the E leg and 2 on the potential leg: the pairing
    // convention that cancels the response's symmetrization factor.
    fill_resp(&qe, &qe, &mut dest, &vec![1.0; nl], &vec![2.0; nl], npad)?;
    Ok(dest.bin_ml(lbins, w)?)
}

/// Binned lensed B-mode power spectrum at first order in `|phi|^2`,
/// for a gradient-type lensing potential.
///
/// `lbins` are the bin edges, `nx`/`dx` the pixel count and pixel size
/// (radians) of the square grid the response is evaluated on, and `w` an
/// optional binning weight `w(l)`.
pub fn calc_lensed_clbb_flat_sky_first_order(
    lbins: &[f64],
    nx: usize,
    dx: f64,
    cl_unl: &UnlensedSpectra,
    w: Option<&dyn Fn(f64) -> f64>,
) -> Result<BinnedSpectrum, LensError> {
    binned_clbb(lbins, nx, dx, cl_unl, w, false, Some(1))
}

/// Variant of [`calc_lensed_clbb_flat_sky_first_order`] that treats
/// `cl_unl.clpp` as a curl-mode lensing potential (psi) spectrum rather
/// than a gradient mode, swapping in the E/curl estimator kernel. The
/// response keeps its default padding here.
pub fn calc_lensed_clbb_flat_sky_first_order_curl(
    lbins: &[f64],
    nx: usize,
    dx: f64,
    cl_unl: &UnlensedSpectra,
    w: Option<&dyn Fn(f64) -> f64>,
) -> Result<BinnedSpectrum, LensError> {
    binned_clbb(lbins, nx, dx, cl_unl, w, true, None)
}

#[cfg(test)]
mod tests {
    use flens_maps::{FullFourierMap, Grid, SkyField};
    use num_complex::Complex64;

    use super::calc_lensed_b_first_order;

    #[test]
    fn output_grid_matches_the_input_grid() {
        let grid = Grid::new(8, 0.01, 4, 0.02).expect("grid should build");
        let mut e = FullFourierMap::zeroed(grid);
        e.fft_mut()[[1, 2]] = Complex64::new(1.0, 0.0);
        let phi = FullFourierMap::zeroed(grid);
        let lensed =
            calc_lensed_b_first_order(&SkyField::from(e), &SkyField::from(phi));
        assert!(lensed.grid().compatible(&grid));
    }

    #[test]
    #[should_panic(expected = "identical grids")]
    fn incompatible_grids_are_fatal() {
        let e = FullFourierMap::zeroed(Grid::square(8, 0.01).expect("grid should build"));
        let phi = FullFourierMap::zeroed(Grid::square(8, 0.02).expect("grid should build"));
        let _ = calc_lensed_b_first_order(&SkyField::from(e), &SkyField::from(phi));
    }
}
