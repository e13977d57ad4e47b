#![deny(unsafe_code)]

//! Flat-sky field containers and conversions between their representations.
//!
//! A scalar field over a [`Grid`] exists in three interchangeable forms:
//! real-space pixels ([`RealMap`]), the Hermitian half-plane transform
//! ([`HalfFourierMap`]), and the unrestricted complex transform
//! ([`FullFourierMap`]). [`SkyField`] is the closed sum of the three and is
//! the input type of the lensing operations.

use ndarray::{Array2, s};
use num_complex::Complex64;

use flens_runtime::{RuntimeMode, ensure_finite, ensure_finite_complex};

use crate::grid::Grid;
use crate::transforms::{fft2_inplace, ifft2_inplace};
use crate::MapsError;

/// Real-valued pixel map over a flat-sky patch, shape `(ny, nx)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RealMap {
    grid: Grid,
    map: Array2<f64>,
}

/// Hermitian half-plane Fourier transform of a real map, shape `(ny, nx/2+1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfFourierMap {
    grid: Grid,
    fft: Array2<Complex64>,
}

/// Full complex Fourier transform, shape `(ny, nx)`. The canonical
/// representation on which the lensing formula operates.
#[derive(Debug, Clone, PartialEq)]
pub struct FullFourierMap {
    grid: Grid,
    fft: Array2<Complex64>,
}

fn expect_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<(), MapsError> {
    if expected != actual {
        return Err(MapsError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

impl RealMap {
    pub fn new(grid: Grid, map: Array2<f64>) -> Result<Self, MapsError> {
        Self::new_in_mode(grid, map, RuntimeMode::Strict)
    }

    /// As [`RealMap::new`]; under [`RuntimeMode::Hardened`] non-finite
    /// pixels are rejected instead of propagating.
    pub fn new_in_mode(
        grid: Grid,
        map: Array2<f64>,
        mode: RuntimeMode,
    ) -> Result<Self, MapsError> {
        expect_shape(grid.shape(), map.dim())?;
        if mode.checks_finite() {
            ensure_finite(map.iter())?;
        }
        Ok(Self { grid, map })
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn map(&self) -> &Array2<f64> {
        &self.map
    }

    /// Forward real transform, Hermitian half-plane storage.
    #[must_use]
    pub fn to_half_fourier(&self) -> HalfFourierMap {
        let tfac = self.grid.tfac();
        let mut full = self.map.mapv(|value| Complex64::new(value, 0.0));
        fft2_inplace(&mut full);
        let half_width = self.grid.nx() / 2 + 1;
        let fft = full.slice(s![.., ..half_width]).mapv(|value| value * tfac);
        HalfFourierMap {
            grid: self.grid,
            fft,
        }
    }

    /// Forward transform straight to the canonical full-complex form.
    #[must_use]
    pub fn to_full_fourier(&self) -> FullFourierMap {
        self.to_half_fourier().to_full_fourier()
    }
}

impl HalfFourierMap {
    pub fn new(grid: Grid, fft: Array2<Complex64>) -> Result<Self, MapsError> {
        Self::new_in_mode(grid, fft, RuntimeMode::Strict)
    }

    pub fn new_in_mode(
        grid: Grid,
        fft: Array2<Complex64>,
        mode: RuntimeMode,
    ) -> Result<Self, MapsError> {
        expect_shape((grid.ny(), grid.nx() / 2 + 1), fft.dim())?;
        if mode.checks_finite() {
            ensure_finite_complex(fft.iter())?;
        }
        Ok(Self { grid, fft })
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn fft(&self) -> &Array2<Complex64> {
        &self.fft
    }

    /// Complete the negative-frequency half-plane by Hermitian symmetry.
    #[must_use]
    pub fn to_full_fourier(&self) -> FullFourierMap {
        let (ny, nx) = self.grid.shape();
        let half_width = nx / 2 + 1;
        let mut fft = Array2::from_elem((ny, nx), Complex64::new(0.0, 0.0));
        for iy in 0..ny {
            for ix in 0..half_width {
                fft[[iy, ix]] = self.fft[[iy, ix]];
            }
            for ix in half_width..nx {
                let cy = (ny - iy) % ny;
                let cx = nx - ix;
                fft[[iy, ix]] = self.fft[[cy, cx]].conj();
            }
        }
        FullFourierMap {
            grid: self.grid,
            fft,
        }
    }

    /// Inverse transform back to real-space pixels.
    #[must_use]
    pub fn to_real_map(&self) -> RealMap {
        self.to_full_fourier().to_real_map()
    }
}

impl FullFourierMap {
    pub fn new(grid: Grid, fft: Array2<Complex64>) -> Result<Self, MapsError> {
        Self::new_in_mode(grid, fft, RuntimeMode::Strict)
    }

    pub fn new_in_mode(
        grid: Grid,
        fft: Array2<Complex64>,
        mode: RuntimeMode,
    ) -> Result<Self, MapsError> {
        expect_shape(grid.shape(), fft.dim())?;
        if mode.checks_finite() {
            ensure_finite_complex(fft.iter())?;
        }
        Ok(Self { grid, fft })
    }

    /// Empty (all-zero) field over `grid`.
    #[must_use]
    pub fn zeroed(grid: Grid) -> Self {
        let fft = Array2::from_elem(grid.shape(), Complex64::new(0.0, 0.0));
        Self { grid, fft }
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn fft(&self) -> &Array2<Complex64> {
        &self.fft
    }

    /// Mutable access to the mode array. The shape is fixed by the grid and
    /// must not change.
    pub fn fft_mut(&mut self) -> &mut Array2<Complex64> {
        &mut self.fft
    }

    /// Inverse transform; the imaginary residue of a Hermitian field is
    /// discarded.
    #[must_use]
    pub fn to_real_map(&self) -> RealMap {
        let tfac = self.grid.tfac();
        let mut pixels = self.fft.clone();
        ifft2_inplace(&mut pixels);
        let map = pixels.mapv(|value| value.re / tfac);
        RealMap {
            grid: self.grid,
            map,
        }
    }
}

impl std::ops::MulAssign<f64> for FullFourierMap {
    fn mul_assign(&mut self, rhs: f64) {
        self.fft.mapv_inplace(|value| value * rhs);
    }
}

impl std::ops::MulAssign<Complex64> for FullFourierMap {
    fn mul_assign(&mut self, rhs: Complex64) {
        self.fft.mapv_inplace(|value| value * rhs);
    }
}

/// A scalar flat-sky field in any of its three representations.
///
/// Replaces runtime type dispatch with a closed sum: every lensing entry
/// point accepts a `SkyField` and canonicalizes it with
/// [`SkyField::to_full_fourier`].
#[derive(Debug, Clone, PartialEq)]
pub enum SkyField {
    RealSpace(RealMap),
    HalfFourier(HalfFourierMap),
    FullFourier(FullFourierMap),
}

impl SkyField {
    #[must_use]
    pub fn grid(&self) -> Grid {
        match self {
            Self::RealSpace(map) => map.grid(),
            Self::HalfFourier(map) => map.grid(),
            Self::FullFourier(map) => map.grid(),
        }
    }

    /// Canonicalize to the full-complex Fourier representation. A field
    /// already in that form is passed through unchanged.
    #[must_use]
    pub fn to_full_fourier(&self) -> FullFourierMap {
        match self {
            Self::RealSpace(map) => map.to_full_fourier(),
            Self::HalfFourier(map) => map.to_full_fourier(),
            Self::FullFourier(map) => map.clone(),
        }
    }
}

impl From<RealMap> for SkyField {
    fn from(map: RealMap) -> Self {
        Self::RealSpace(map)
    }
}

impl From<HalfFourierMap> for SkyField {
    fn from(map: HalfFourierMap) -> Self {
        Self::HalfFourier(map)
    }
}

impl From<FullFourierMap> for SkyField {
    fn from(map: FullFourierMap) -> Self {
        Self::FullFourier(map)
    }
}
