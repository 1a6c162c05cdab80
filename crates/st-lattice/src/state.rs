// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};

/// Ordered amplitudes fed through the lattice stages.
///
/// No normalisation or magnitude invariant is imposed. Stages borrow the
/// vector and always hand back a fresh one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    pub fn new(amplitudes: Vec<Complex64>) -> Self {
        Self { amplitudes }
    }

    /// Builds a vector from `[re0, im0, re1, im1, ...]`.
    pub fn from_interleaved(components: &[f64]) -> LatticeResult<Self> {
        if components.len() % 2 != 0 {
            return Err(LatticeError::input(format!(
                "interleaved components must come in (re, im) pairs, got {} values",
                components.len()
            )));
        }
        Ok(components
            .chunks_exact(2)
            .map(|pair| Complex64::new(pair[0], pair[1]))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex64> {
        self.amplitudes.iter()
    }

    pub fn into_inner(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Largest elementwise distance to `other`, or `None` when the lengths
    /// differ.
    pub fn max_abs_diff(&self, other: &StateVector) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .map(|(a, b)| (a - b).norm())
                .fold(0.0, f64::max),
        )
    }

    /// Rejects amplitudes with a NaN or infinite component.
    pub(crate) fn ensure_finite(&self) -> LatticeResult<()> {
        match self
            .amplitudes
            .iter()
            .position(|z| !(z.re.is_finite() && z.im.is_finite()))
        {
            Some(index) => Err(LatticeError::input(format!(
                "amplitude[{index}] is not finite: {}",
                self.amplitudes[index]
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn map(&self, f: impl Fn(Complex64) -> Complex64) -> StateVector {
        self.amplitudes.iter().copied().map(f).collect()
    }
}

impl From<Vec<Complex64>> for StateVector {
    fn from(amplitudes: Vec<Complex64>) -> Self {
        Self::new(amplitudes)
    }
}

impl FromIterator<Complex64> for StateVector {
    fn from_iter<I: IntoIterator<Item = Complex64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StateVector {
    type Item = &'a Complex64;
    type IntoIter = std::slice::Iter<'a, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses a comma-separated list such as `0.5, 0.5i, 1-2i`.
///
/// Whitespace inside an element is ignored, so `1 - 2i` is accepted. A blank
/// string yields the empty vector.
impl FromStr for StateVector {
    type Err = LatticeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Ok(StateVector::default());
        }
        raw.split(',')
            .enumerate()
            .map(|(index, element)| {
                let compact: String = element.split_whitespace().collect();
                if compact.is_empty() {
                    return Err(LatticeError::input(format!("element {index} is empty")));
                }
                Complex64::from_str(&compact).map_err(|err| {
                    LatticeError::input(format!(
                        "element {index} ('{compact}') is not a complex number: {err}"
                    ))
                })
            })
            .collect()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, z) in self.amplitudes.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{z}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_pairs_become_amplitudes() {
        let v = StateVector::from_interleaved(&[1.0, 0.0, 0.0, -2.0]).unwrap();
        assert_eq!(
            v.as_slice(),
            &[Complex64::new(1.0, 0.0), Complex64::new(0.0, -2.0)]
        );
    }

    #[test]
    fn odd_interleaved_length_is_invalid_input() {
        let err = StateVector::from_interleaved(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, LatticeError::InvalidInput(_)));
    }

    #[test]
    fn parses_mixed_real_and_complex_elements() {
        let v: StateVector = "0.5, 0.25i, 1 - 2i, -3".parse().unwrap();
        assert_eq!(
            v.as_slice(),
            &[
                Complex64::new(0.5, 0.0),
                Complex64::new(0.0, 0.25),
                Complex64::new(1.0, -2.0),
                Complex64::new(-3.0, 0.0),
            ]
        );
    }

    #[test]
    fn blank_text_parses_to_empty_vector() {
        let v: StateVector = "  ".parse().unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn garbage_element_is_invalid_input() {
        let err = "1, banana".parse::<StateVector>().unwrap_err();
        match err {
            LatticeError::InvalidInput(msg) => assert!(msg.contains("element 1")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!("1,,2".parse::<StateVector>().is_err());
    }

    #[test]
    fn non_finite_amplitude_is_reported_by_index() {
        let v = StateVector::new(vec![Complex64::new(1.0, 0.0), Complex64::new(f64::NAN, 0.0)]);
        match v.ensure_finite().unwrap_err() {
            LatticeError::InvalidInput(msg) => assert!(msg.starts_with("amplitude[1]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn max_abs_diff_requires_equal_lengths() {
        let a = StateVector::new(vec![Complex64::new(1.0, 1.0)]);
        let b = StateVector::new(vec![Complex64::new(1.0, 0.0)]);
        assert_eq!(a.max_abs_diff(&b), Some(1.0));
        assert_eq!(a.max_abs_diff(&StateVector::default()), None);
    }

    #[test]
    fn norm_and_display() {
        let v = StateVector::new(vec![Complex64::new(3.0, 4.0), Complex64::new(0.0, 0.0)]);
        assert_eq!(v.norm_sqr(), 25.0);
        assert_eq!(v.to_string(), "[3+4i, 0+0i]");
    }
}
