#![deny(unsafe_code)]

//! Grid metadata and Fourier-mode coordinates for a flat-sky patch.

use std::f64::consts::TAU;

use ndarray::Array2;

use crate::MapsError;

/// Sample frequencies for a length-`n` complex FFT with sample spacing `d`.
///
/// Standard ordering: non-negative frequencies first, then the negative
/// half-spectrum.
pub fn fftfreq(n: usize, d: f64) -> Result<Vec<f64>, MapsError> {
    if n == 0 {
        return Err(MapsError::NonPositiveDimension { axis: "n" });
    }
    if !(d.is_finite() && d > 0.0) {
        return Err(MapsError::NonPositivePixelSize { axis: "d" });
    }
    Ok(freqs_unchecked(n, d))
}

fn freqs_unchecked(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * d);
    let split = n.div_ceil(2);
    (0..n)
        .map(|idx| {
            if idx < split {
                idx as f64 * scale
            } else {
                -((n - idx) as f64) * scale
            }
        })
        .collect()
}

/// Pixelization of a rectangular flat-sky patch.
///
/// `nx`/`ny` are pixel counts along the x/y axes, `dx`/`dy` the angular
/// pixel sizes in radians. Arrays over the patch are indexed `[iy, ix]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
}

impl Grid {
    pub fn new(nx: usize, dx: f64, ny: usize, dy: f64) -> Result<Self, MapsError> {
        if nx == 0 {
            return Err(MapsError::NonPositiveDimension { axis: "nx" });
        }
        if ny == 0 {
            return Err(MapsError::NonPositiveDimension { axis: "ny" });
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(MapsError::NonPositivePixelSize { axis: "dx" });
        }
        if !(dy.is_finite() && dy > 0.0) {
            return Err(MapsError::NonPositivePixelSize { axis: "dy" });
        }
        Ok(Self { nx, ny, dx, dy })
    }

    /// Square patch with `nx` pixels of size `dx` along both axes.
    pub fn square(nx: usize, dx: f64) -> Result<Self, MapsError> {
        Self::new(nx, dx, nx, dx)
    }

    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Array shape `(ny, nx)` of fields over this grid.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Exact-match compatibility predicate for binary operations.
    #[must_use]
    pub fn compatible(&self, other: &Grid) -> bool {
        self.nx == other.nx && self.ny == other.ny && self.dx == other.dx && self.dy == other.dy
    }

    /// Forward-transform scale factor `sqrt(dx*dy / (nx*ny))`.
    #[must_use]
    pub fn tfac(&self) -> f64 {
        ((self.dx * self.dy) / ((self.nx * self.ny) as f64)).sqrt()
    }

    /// Angular wavenumber along x for every Fourier mode, indexed `[iy, ix]`.
    #[must_use]
    pub fn lx(&self) -> Array2<f64> {
        let fx = freqs_unchecked(self.nx, self.dx);
        Array2::from_shape_fn((self.ny, self.nx), |(_, ix)| TAU * fx[ix])
    }

    /// Angular wavenumber along y for every Fourier mode, indexed `[iy, ix]`.
    #[must_use]
    pub fn ly(&self) -> Array2<f64> {
        let fy = freqs_unchecked(self.ny, self.dy);
        Array2::from_shape_fn((self.ny, self.nx), |(iy, _)| TAU * fy[iy])
    }

    /// Mode magnitude `sqrt(lx^2 + ly^2)` for every Fourier mode.
    #[must_use]
    pub fn ell(&self) -> Array2<f64> {
        let fx = freqs_unchecked(self.nx, self.dx);
        let fy = freqs_unchecked(self.ny, self.dy);
        Array2::from_shape_fn((self.ny, self.nx), |(iy, ix)| {
            (TAU * fx[ix]).hypot(TAU * fy[iy])
        })
    }

    /// Mode azimuthal angle `atan2(lx, -ly)` for every Fourier mode.
    #[must_use]
    pub fn psi(&self) -> Array2<f64> {
        let fx = freqs_unchecked(self.nx, self.dx);
        let fy = freqs_unchecked(self.ny, self.dy);
        Array2::from_shape_fn((self.ny, self.nx), |(iy, ix)| {
            (TAU * fx[ix]).atan2(-(TAU * fy[iy]))
        })
    }
}
