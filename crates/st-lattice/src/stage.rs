// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! The three lattice stages share one [`LatticeStage`] interface and are
//! composed by [`run_stages`]; swapping a stage never touches the fold.

use num_complex::Complex64;
use tracing::debug_span;

use crate::error::{LatticeError, LatticeResult};
use crate::state::StateVector;
use spiral_config::lattice::DEFAULT_FREQUENCY_DEGREES;

/// One step of the triple-mirror pipeline.
pub trait LatticeStage: Send + Sync {
    /// Stable identifier used in tracing spans and reports.
    fn name(&self) -> &'static str;

    /// Produces a new vector; the input is never modified.
    ///
    /// Amplitudes are taken as given. Finiteness of caller-supplied vectors is
    /// checked once by [`run_stages`] and the transformer entry points, so an
    /// intermediate that overflowed inside an earlier stage still flows on.
    fn apply(&self, state: &StateVector) -> LatticeResult<StateVector>;
}

/// Feeds `input` through `stages` in order. `input` must be finite; the
/// first failure aborts the run and no intermediate vector is returned.
pub fn run_stages(
    stages: &[&dyn LatticeStage],
    input: &StateVector,
) -> LatticeResult<StateVector> {
    input.ensure_finite()?;
    let mut current = input.clone();
    for stage in stages {
        let _span = debug_span!("lattice_stage", stage = stage.name(), len = current.len()).entered();
        current = stage.apply(&current)?;
    }
    Ok(current)
}

/// Global phase rotation by `exp(iθ)`, `θ` taken from an angle in degrees.
///
/// The angle is converted to radians as-is; values beyond ±360° are not
/// wrapped first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseAlignment {
    degrees: f64,
    rotor: Complex64,
}

impl PhaseAlignment {
    pub fn from_degrees(degrees: f64) -> LatticeResult<Self> {
        if !degrees.is_finite() {
            return Err(LatticeError::configuration(format!(
                "phase frequency must be finite, got {degrees}"
            )));
        }
        Ok(Self {
            degrees,
            rotor: Complex64::from_polar(1.0, degrees.to_radians()),
        })
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Unit factor every amplitude is multiplied by.
    pub fn rotor(&self) -> Complex64 {
        self.rotor
    }

    /// Rotation by `-θ`; undoes `self` up to rounding.
    pub fn inverse(&self) -> Self {
        Self {
            degrees: -self.degrees,
            rotor: Complex64::from_polar(1.0, -self.radians()),
        }
    }
}

impl Default for PhaseAlignment {
    fn default() -> Self {
        Self {
            degrees: DEFAULT_FREQUENCY_DEGREES,
            rotor: Complex64::from_polar(1.0, DEFAULT_FREQUENCY_DEGREES.to_radians()),
        }
    }
}

impl LatticeStage for PhaseAlignment {
    fn name(&self) -> &'static str {
        "phase_alignment"
    }

    fn apply(&self, state: &StateVector) -> LatticeResult<StateVector> {
        let rotor = self.rotor;
        Ok(state.map(|z| z * rotor))
    }
}

/// Projection onto the real axis: `z ↦ (z + z̄) / 2`.
///
/// Evaluated as `Re(z) + 0i` so the imaginary part is exactly zero and the
/// doubling cannot overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EquilibriumGate;

impl LatticeStage for EquilibriumGate {
    fn name(&self) -> &'static str {
        "equilibrium_gate"
    }

    fn apply(&self, state: &StateVector) -> LatticeResult<StateVector> {
        Ok(state.map(|z| Complex64::new(z.re, 0.0)))
    }
}

/// Identity placeholder where register coupling will attach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntanglementAnchor;

impl LatticeStage for EntanglementAnchor {
    fn name(&self) -> &'static str {
        "entanglement_anchor"
    }

    fn apply(&self, state: &StateVector) -> LatticeResult<StateVector> {
        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn sample() -> StateVector {
        StateVector::new(vec![
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(0.0, FRAC_1_SQRT_2),
            Complex64::new(-0.3, 1.7),
            Complex64::new(2.5, -4.0),
        ])
    }

    #[test]
    fn quarter_turn_maps_one_to_i() {
        let stage = PhaseAlignment::from_degrees(90.0).unwrap();
        let out = stage
            .apply(&StateVector::new(vec![Complex64::new(1.0, 0.0)]))
            .unwrap();
        assert_abs_diff_eq!(out.as_slice()[0].re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.as_slice()[0].im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_preserves_magnitudes_and_relative_phase() {
        let stage = PhaseAlignment::from_degrees(60106.0).unwrap();
        let input = sample();
        let out = stage.apply(&input).unwrap();
        for (before, after) in input.iter().zip(out.iter()) {
            assert_abs_diff_eq!(before.norm(), after.norm(), epsilon = 1e-9);
        }
        let before = input.as_slice()[2] * input.as_slice()[3].conj();
        let after = out.as_slice()[2] * out.as_slice()[3].conj();
        assert_abs_diff_eq!(before.re, after.re, epsilon = 1e-9);
        assert_abs_diff_eq!(before.im, after.im, epsilon = 1e-9);
    }

    #[test]
    fn inverse_rotation_recovers_input() {
        let stage = PhaseAlignment::from_degrees(-1234.5).unwrap();
        let input = sample();
        let restored = stage.inverse().apply(&stage.apply(&input).unwrap()).unwrap();
        assert!(restored.max_abs_diff(&input).unwrap() < 1e-9);
        assert_eq!(stage.inverse().degrees(), 1234.5);
    }

    #[test]
    fn default_matches_standard_anchor() {
        assert_eq!(
            PhaseAlignment::default(),
            PhaseAlignment::from_degrees(60106.0).unwrap()
        );
    }

    #[test]
    fn non_finite_frequency_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = PhaseAlignment::from_degrees(bad).unwrap_err();
            assert!(matches!(err, LatticeError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn gate_keeps_real_parts_and_zeroes_imaginary() {
        let out = EquilibriumGate.apply(&sample()).unwrap();
        let reals: Vec<f64> = out.iter().map(|z| z.re).collect();
        assert_eq!(reals, vec![FRAC_1_SQRT_2, 0.0, -0.3, 2.5]);
        assert!(out.iter().all(|z| z.im == 0.0));
    }

    #[test]
    fn gate_does_not_overflow_large_amplitudes() {
        let huge = StateVector::new(vec![Complex64::new(f64::MAX, f64::MAX)]);
        let out = EquilibriumGate.apply(&huge).unwrap();
        assert_eq!(out.as_slice()[0], Complex64::new(f64::MAX, 0.0));
    }

    #[test]
    fn anchor_is_identity() {
        let input = sample();
        assert_eq!(EntanglementAnchor.apply(&input).unwrap(), input);
    }

    #[test]
    fn run_stages_rejects_non_finite_input() {
        let bad = StateVector::new(vec![Complex64::new(0.0, f64::INFINITY)]);
        let phase = PhaseAlignment::from_degrees(10.0).unwrap();
        for stages in [
            [&phase as &dyn LatticeStage],
            [&EquilibriumGate as &dyn LatticeStage],
            [&EntanglementAnchor as &dyn LatticeStage],
        ] {
            assert!(matches!(
                run_stages(&stages, &bad),
                Err(LatticeError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn overflowed_rotation_still_projects_to_real() {
        let phase = PhaseAlignment::from_degrees(45.0).unwrap();
        let input = StateVector::new(vec![Complex64::new(1.5e308, 1.5e308)]);
        let rotated = phase.apply(&input).unwrap();
        assert!(rotated.as_slice()[0].im.is_infinite());

        let out = run_stages(&[&phase, &EquilibriumGate, &EntanglementAnchor], &input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.as_slice()[0].im, 0.0);
        assert!(out.as_slice()[0].re.is_finite());
        assert_eq!(out.as_slice()[0].re, rotated.as_slice()[0].re);
    }

    #[test]
    fn run_stages_without_stages_returns_copy() {
        let input = sample();
        assert_eq!(run_stages(&[], &input).unwrap(), input);
    }
}
