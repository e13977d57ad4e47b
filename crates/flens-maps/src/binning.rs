#![deny(unsafe_code)]

//! Multipole binning of 2D Fourier-space power into a 1D spectrum.

use crate::field::FullFourierMap;
use crate::MapsError;

/// Binned angular power spectrum: bin-center multipoles and binned values.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedSpectrum {
    pub ls: Vec<f64>,
    pub cl: Vec<f64>,
}

impl BinnedSpectrum {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ls.is_empty()
    }
}

fn validate_bins(lbins: &[f64]) -> Result<(), MapsError> {
    if lbins.len() < 2 {
        return Err(MapsError::InvalidBins {
            detail: "at least two bin edges are required",
        });
    }
    if lbins.windows(2).any(|pair| !(pair[0] < pair[1])) {
        return Err(MapsError::InvalidBins {
            detail: "bin edges must be strictly increasing",
        });
    }
    Ok(())
}

impl FullFourierMap {
    /// Average `Re(fft)` over grid modes within each multipole bin.
    ///
    /// Bins are the half-open ranges `[lbins[i], lbins[i+1])`; modes outside
    /// the outer edges are ignored. `w` supplies an optional weight `w(l)`
    /// per mode; `None` means uniform weighting. Empty bins yield zero.
    pub fn bin_ml(
        &self,
        lbins: &[f64],
        w: Option<&dyn Fn(f64) -> f64>,
    ) -> Result<BinnedSpectrum, MapsError> {
        validate_bins(lbins)?;
        let nbins = lbins.len() - 1;
        let mut acc = vec![0.0; nbins];
        let mut norm = vec![0.0; nbins];

        let ell = self.grid().ell();
        for (value, &l) in self.fft().iter().zip(ell.iter()) {
            if l < lbins[0] || l >= lbins[nbins] {
                continue;
            }
            let bin = lbins.partition_point(|&edge| edge <= l) - 1;
            let weight = w.map_or(1.0, |w| w(l));
            acc[bin] += weight * value.re;
            norm[bin] += weight;
        }

        let ls = lbins
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect();
        let cl = acc
            .iter()
            .zip(norm.iter())
            .map(|(&sum, &weight)| if weight > 0.0 { sum / weight } else { 0.0 })
            .collect();
        Ok(BinnedSpectrum { ls, cl })
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::BinnedSpectrum;
    use crate::field::FullFourierMap;
    use crate::grid::Grid;
    use crate::MapsError;

    fn power_field(grid: Grid) -> FullFourierMap {
        // Re(fft) = ell, so binned values are weighted mean multipoles.
        let ell = grid.ell();
        let mut field = FullFourierMap::zeroed(grid);
        field
            .fft_mut()
            .zip_mut_with(&ell, |value, &l| *value = Complex64::new(l, 0.0));
        field
    }

    #[test]
    fn bin_ml_rejects_malformed_edges() {
        let grid = Grid::square(8, 0.1).expect("grid should build");
        let field = FullFourierMap::zeroed(grid);
        assert!(matches!(
            field.bin_ml(&[10.0], None),
            Err(MapsError::InvalidBins { .. })
        ));
        assert!(matches!(
            field.bin_ml(&[10.0, 5.0], None),
            Err(MapsError::InvalidBins { .. })
        ));
    }

    #[test]
    fn bin_centers_are_edge_midpoints() {
        let grid = Grid::square(8, 0.1).expect("grid should build");
        let spectrum = power_field(grid)
            .bin_ml(&[0.0, 40.0, 80.0], None)
            .expect("binning should succeed");
        assert_eq!(spectrum.ls, vec![20.0, 60.0]);
        assert_eq!(spectrum.len(), 2);
        assert!(!spectrum.is_empty());
    }

    #[test]
    fn uniform_weighting_averages_the_real_part() {
        let grid = Grid::square(8, 0.1).expect("grid should build");
        let ell = grid.ell();
        let lmax_edge = 200.0;
        let spectrum = power_field(grid)
            .bin_ml(&[0.0, lmax_edge], None)
            .expect("binning should succeed");
        let inside: Vec<f64> = ell.iter().copied().filter(|&l| l < lmax_edge).collect();
        let mean = inside.iter().sum::<f64>() / inside.len() as f64;
        assert!((spectrum.cl[0] - mean).abs() < 1e-9);
    }

    #[test]
    fn constant_weight_matches_uniform_weighting() {
        let grid = Grid::square(8, 0.1).expect("grid should build");
        let field = power_field(grid);
        let edges = [0.0, 30.0, 90.0, 200.0];
        let uniform = field.bin_ml(&edges, None).expect("binning should succeed");
        let weighted = field
            .bin_ml(&edges, Some(&|_| 4.0))
            .expect("binning should succeed");
        for (lhs, rhs) in uniform.cl.iter().zip(weighted.cl.iter()) {
            assert!((lhs - rhs).abs() < 1e-12);
        }
    }

    #[test]
    fn weight_function_reweights_but_does_not_alter_modes() {
        let grid = Grid::square(8, 0.1).expect("grid should build");
        let field = power_field(grid);
        let ell = grid.ell();
        let edges = [10.0, 120.0];
        let w = |l: f64| 1.0 + l;
        let weighted = field
            .bin_ml(&edges, Some(&w))
            .expect("binning should succeed");
        let mut acc = 0.0;
        let mut norm = 0.0;
        for (value, &l) in field.fft().iter().zip(ell.iter()) {
            if l >= edges[0] && l < edges[1] {
                acc += w(l) * value.re;
                norm += w(l);
            }
        }
        assert!((weighted.cl[0] - acc / norm).abs() < 1e-9);
    }

    #[test]
    fn empty_bins_report_zero() {
        let grid = Grid::square(4, 0.1).expect("grid should build");
        let spectrum = power_field(grid)
            .bin_ml(&[1e6, 2e6], None)
            .expect("binning should succeed");
        assert_eq!(spectrum, BinnedSpectrum { ls: vec![1.5e6], cl: vec![0.0] });
    }
}
