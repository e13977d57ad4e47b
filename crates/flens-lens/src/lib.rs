#![deny(unsafe_code)]

//! First-order weak-lensing B-mode corrections on the flat sky.
//!
//! Lensing by foreground mass remaps CMB polarization and converts E-mode
//! power into B modes. This crate evaluates that conversion to first order
//! in the lensing potential, both at map level and as a binned power
//! spectrum:
//!
//! - [`calc_lensed_b_first_order`] turns unlensed E modes and a lensing
//!   potential into the induced B-mode Fourier field;
//! - [`calc_lensed_clbb_flat_sky_first_order`] bins the lensed B-mode power
//!   sourced by a gradient-type (phi) potential spectrum;
//! - [`calc_lensed_clbb_flat_sky_first_order_curl`] does the same for a
//!   curl-type (psi) potential.
//!
//! Field containers come from `flens-maps`; the spectrum routines delegate
//! the response integral to `flens-qest`.

pub mod first_order;
pub mod model;

pub use first_order::{
    calc_lensed_b_first_order, calc_lensed_clbb_flat_sky_first_order,
    calc_lensed_clbb_flat_sky_first_order_curl,
};
pub use model::{ModelError, UnlensedSpectra};

use flens_maps::MapsError;
use flens_qest::QestError;

/// Failures surfaced by the spectrum pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum LensError {
    Maps(MapsError),
    Qest(QestError),
}

impl std::fmt::Display for LensError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Maps(err) => write!(f, "map container error: {err}"),
            Self::Qest(err) => write!(f, "quadratic estimator error: {err}"),
        }
    }
}

impl std::error::Error for LensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Maps(err) => Some(err),
            Self::Qest(err) => Some(err),
        }
    }
}

impl From<MapsError> for LensError {
    fn from(err: MapsError) -> Self {
        Self::Maps(err)
    }
}

impl From<QestError> for LensError {
    fn from(err: QestError) -> Self {
        Self::Qest(err)
    }
}
