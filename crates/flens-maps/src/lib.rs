#![deny(unsafe_code)]

//! Flat-sky field containers for FrankenLens.
//!
//! ## Module layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | `grid`       | [`Grid`] metadata, `fftfreq`, mode coordinates (lx, ly, ψ)   |
//! | `transforms` | unnormalized 2D FFT kernels on complex arrays                |
//! | `field`      | [`RealMap`], [`HalfFourierMap`], [`FullFourierMap`], [`SkyField`] |
//! | `binning`    | [`BinnedSpectrum`] and multipole binning of Fourier power    |
//!
//! A pixelized patch of sky is described by a [`Grid`] (pixel counts and
//! angular pixel sizes in radians). Scalar fields over the patch come in
//! three interchangeable representations with fixed conversion conventions:
//! the forward transform of a map is scaled by `sqrt(dx*dy / (nx*ny))` so
//! that Fourier amplitudes approximate the continuum convention.

pub mod binning;
pub mod field;
pub mod grid;
pub mod transforms;

pub use binning::BinnedSpectrum;
pub use field::{FullFourierMap, HalfFourierMap, RealMap, SkyField};
pub use grid::{Grid, fftfreq};
pub use transforms::{fft2_inplace, ifft2_inplace};

/// Validation failures raised by grid and field constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum MapsError {
    NonPositiveDimension { axis: &'static str },
    NonPositivePixelSize { axis: &'static str },
    ShapeMismatch { expected: (usize, usize), actual: (usize, usize) },
    NonFiniteInput { index: usize },
    InvalidBins { detail: &'static str },
}

impl std::fmt::Display for MapsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDimension { axis } => {
                write!(f, "pixel count `{axis}` must be greater than zero")
            }
            Self::NonPositivePixelSize { axis } => {
                write!(f, "pixel size `{axis}` must be finite and greater than zero")
            }
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "array shape {actual:?} does not match the grid shape {expected:?}"
            ),
            Self::NonFiniteInput { index } => {
                write!(f, "non-finite value at flat index {index} rejected by policy")
            }
            Self::InvalidBins { detail } => write!(f, "invalid bin edges: {detail}"),
        }
    }
}

impl std::error::Error for MapsError {}

impl From<flens_runtime::NonFiniteError> for MapsError {
    fn from(err: flens_runtime::NonFiniteError) -> Self {
        Self::NonFiniteInput { index: err.index }
    }
}
