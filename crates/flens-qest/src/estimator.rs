#![deny(unsafe_code)]

//! Separable spin-term representation of quadratic estimator kernels.

use num_complex::Complex64;

use crate::QestError;

/// One multiplicative leg of a separable term: a 1D weight array over
/// integer multipoles, an extra power of the mode magnitude, and a spin
/// phase `e^{i spin psi}`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegWeight {
    pub wl: Vec<f64>,
    pub lpow: i32,
    pub spin: i32,
}

/// A single separable term of an estimator kernel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Term {
    pub coeff: Complex64,
    pub leg1: LegWeight,
    pub leg2: LegWeight,
    pub spin_out: i32,
}

/// A quadratic estimator kernel as a sum of separable spin terms.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadEst {
    terms: Vec<Term>,
    nl: usize,
}

fn validated_lengths(wl_e: &[f64], wl_p: &[f64]) -> Result<usize, QestError> {
    if wl_e.is_empty() || wl_p.is_empty() {
        return Err(QestError::EmptyWeights);
    }
    if wl_e.len() != wl_p.len() {
        return Err(QestError::WeightLengthMismatch {
            leg: "2",
            expected: wl_e.len(),
            actual: wl_p.len(),
        });
    }
    Ok(wl_e.len())
}

impl QuadEst {
    /// Lensed-B response to a gradient-type (phi) lensing potential.
    ///
    /// Kernel `W = (l1 . l2) sin 2(psiL - psi1)` times the per-leg weights,
    /// decomposed into four spin terms. `wl_e` and `wl_p` are amplitude-like
    /// weight arrays (square roots of power spectra in the spectrum
    /// pipeline), indexed by multipole 0..=lmax.
    pub fn blen_ep(wl_e: &[f64], wl_p: &[f64]) -> Result<Self, QestError> {
        let nl = validated_lengths(wl_e, wl_p)?;
        let quarter = Complex64::new(0.0, -0.25);
        let terms = vec![
            spin_term(quarter, wl_e, -1, wl_p, -1, 2),
            spin_term(quarter, wl_e, -3, wl_p, 1, 2),
            spin_term(-quarter, wl_e, 3, wl_p, -1, -2),
            spin_term(-quarter, wl_e, 1, wl_p, 1, -2),
        ];
        Ok(Self { terms, nl })
    }

    /// Lensed-B response to a curl-type (psi) lensing potential.
    ///
    /// Kernel `W = (l1 x l2) cos 2(psiL - psi1)` times the per-leg weights;
    /// the same spin set as [`QuadEst::blen_ep`] with the sign pattern of
    /// the cross-product/cosine decomposition.
    pub fn blm_ex(wl_e: &[f64], wl_p: &[f64]) -> Result<Self, QestError> {
        let nl = validated_lengths(wl_e, wl_p)?;
        let quarter = Complex64::new(0.0, -0.25);
        let terms = vec![
            spin_term(quarter, wl_e, -3, wl_p, 1, 2),
            spin_term(quarter, wl_e, 1, wl_p, 1, -2),
            spin_term(-quarter, wl_e, -1, wl_p, -1, 2),
            spin_term(-quarter, wl_e, 3, wl_p, -1, -2),
        ];
        Ok(Self { terms, nl })
    }

    /// Number of multipoles (lmax + 1) covered by the weight arrays.
    #[must_use]
    pub fn nl(&self) -> usize {
        self.nl
    }

    pub(crate) fn terms(&self) -> &[Term] {
        &self.terms
    }
}

fn spin_term(
    coeff: Complex64,
    wl1: &[f64],
    spin1: i32,
    wl2: &[f64],
    spin2: i32,
    spin_out: i32,
) -> Term {
    Term {
        coeff,
        leg1: LegWeight {
            wl: wl1.to_vec(),
            lpow: 1,
            spin: spin1,
        },
        leg2: LegWeight {
            wl: wl2.to_vec(),
            lpow: 1,
            spin: spin2,
        },
        spin_out,
    }
}
