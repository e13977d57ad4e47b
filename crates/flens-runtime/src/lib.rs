#![deny(unsafe_code)]

//! FrankenLens runtime: operating-mode policy shared by the numerical crates.
//!
//! - **Strict**: match the reference flat-sky pipeline exactly; non-finite
//!   values propagate silently through the arrays per IEEE-754 semantics.
//! - **Hardened**: extra safety layer beyond the reference; construction
//!   boundaries reject NaN/Inf input instead of letting it surface in the
//!   final spectra.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Operational mode governing compatibility/safety trade-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuntimeMode {
    #[default]
    Strict,
    Hardened,
}

impl RuntimeMode {
    /// Whether construction boundaries must reject non-finite input.
    #[must_use]
    pub fn checks_finite(self) -> bool {
        matches!(self, Self::Hardened)
    }
}

/// A non-finite value was found at flat index `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonFiniteError {
    pub index: usize,
}

impl std::fmt::Display for NonFiniteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "non-finite value at flat index {}", self.index)
    }
}

impl std::error::Error for NonFiniteError {}

/// Reject NaN/Inf anywhere in a real-valued buffer.
pub fn ensure_finite<'a, I>(values: I) -> Result<(), NonFiniteError>
where
    I: IntoIterator<Item = &'a f64>,
{
    for (index, value) in values.into_iter().enumerate() {
        if !value.is_finite() {
            return Err(NonFiniteError { index });
        }
    }
    Ok(())
}

/// Reject NaN/Inf in either component of a complex buffer.
pub fn ensure_finite_complex<'a, I>(values: I) -> Result<(), NonFiniteError>
where
    I: IntoIterator<Item = &'a Complex64>,
{
    for (index, value) in values.into_iter().enumerate() {
        if !(value.re.is_finite() && value.im.is_finite()) {
            return Err(NonFiniteError { index });
        }
    }
    Ok(())
}
