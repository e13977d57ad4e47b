#![deny(unsafe_code)]

//! Weighted quadratic estimators on the flat sky.
//!
//! ## Module layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | `estimator` | [`QuadEst`]: sums of separable spin terms, kernel constructors |
//! | `resp`      | [`fill_resp`]: estimator-pair response power via FFT convolution |
//!
//! An estimator kernel `W(l1, l2, L)` is stored as a sum of separable terms
//! `coeff * w1(l1) l1^p1 e^{i s1 psi1} * w2(l2) l2^p2 e^{i s2 psi2}
//! * e^{i sL psiL}`, which turns the response integral into a handful of
//! 2D FFT convolutions.

pub mod estimator;
pub mod resp;

pub use estimator::QuadEst;
pub use resp::{DEFAULT_NPAD, fill_resp};

use flens_maps::MapsError;

/// Validation failures raised by estimator construction and response filling.
#[derive(Debug, Clone, PartialEq)]
pub enum QestError {
    WeightLengthMismatch { leg: &'static str, expected: usize, actual: usize },
    EmptyWeights,
    InvalidPadding { requested: usize },
    Grid(MapsError),
}

impl std::fmt::Display for QestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightLengthMismatch { leg, expected, actual } => write!(
                f,
                "weight array for leg `{leg}` has length {actual}, expected {expected}"
            ),
            Self::EmptyWeights => write!(f, "weight arrays must cover at least one multipole"),
            Self::InvalidPadding { requested } => {
                write!(f, "invalid padding factor: {requested}")
            }
            Self::Grid(err) => write!(f, "padded grid construction failed: {err}"),
        }
    }
}

impl std::error::Error for QestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MapsError> for QestError {
    fn from(err: MapsError) -> Self {
        Self::Grid(err)
    }
}
