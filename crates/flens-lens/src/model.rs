#![deny(unsafe_code)]

//! Unlensed model spectra consumed by the spectrum pipeline.

/// Unlensed E-mode and lensing-potential power spectra up to a shared
/// `lmax`, indexed by integer multipole.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlensedSpectra {
    lmax: usize,
    clee: Vec<f64>,
    clpp: Vec<f64>,
}

/// Validation failures for [`UnlensedSpectra`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { field, expected, actual } => write!(
                f,
                "`{field}` has length {actual}, expected lmax + 1 = {expected}"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

impl UnlensedSpectra {
    /// Both spectra must cover multipoles 0..=lmax.
    pub fn new(lmax: usize, clee: Vec<f64>, clpp: Vec<f64>) -> Result<Self, ModelError> {
        let expected = lmax + 1;
        if clee.len() != expected {
            return Err(ModelError::LengthMismatch {
                field: "clee",
                expected,
                actual: clee.len(),
            });
        }
        if clpp.len() != expected {
            return Err(ModelError::LengthMismatch {
                field: "clpp",
                expected,
                actual: clpp.len(),
            });
        }
        Ok(Self { lmax, clee, clpp })
    }

    #[must_use]
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    #[must_use]
    pub fn clee(&self) -> &[f64] {
        &self.clee
    }

    #[must_use]
    pub fn clpp(&self) -> &[f64] {
        &self.clpp
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelError, UnlensedSpectra};

    #[test]
    fn construction_requires_matching_lengths() {
        let cl = UnlensedSpectra::new(2, vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0])
            .expect("spectra should build");
        assert_eq!(cl.lmax(), 2);
        assert_eq!(cl.clee(), &[1.0, 2.0, 3.0]);
        assert_eq!(cl.clpp(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn construction_rejects_wrong_lengths() {
        assert_eq!(
            UnlensedSpectra::new(2, vec![1.0, 2.0], vec![4.0, 5.0, 6.0]),
            Err(ModelError::LengthMismatch {
                field: "clee",
                expected: 3,
                actual: 2,
            })
        );
        assert_eq!(
            UnlensedSpectra::new(2, vec![1.0, 2.0, 3.0], vec![4.0]),
            Err(ModelError::LengthMismatch {
                field: "clpp",
                expected: 3,
                actual: 1,
            })
        );
    }
}
