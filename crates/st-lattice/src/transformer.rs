// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use tracing::{debug, info};

use crate::audit::{AuditResult, DecoherenceAudit};
use crate::error::LatticeResult;
use crate::stage::{
    run_stages, EntanglementAnchor, EquilibriumGate, LatticeStage, PhaseAlignment,
};
use crate::state::StateVector;
use spiral_config::lattice::LatticeConfig;

/// Phase-anchored lattice running the triple-mirror pipeline.
///
/// Immutable once built. The status flags are exposed for callers but do not
/// influence any transform or audit.
#[derive(Clone, Debug, PartialEq)]
pub struct LatticeTransformer {
    phase: PhaseAlignment,
    gate: EquilibriumGate,
    anchor: EntanglementAnchor,
    audit: DecoherenceAudit,
    stable: bool,
    zero_probability: bool,
    shield_active: bool,
}

impl Default for LatticeTransformer {
    fn default() -> Self {
        Self::from_parts(PhaseAlignment::default(), DecoherenceAudit::default())
    }
}

impl LatticeTransformer {
    /// Builds a transformer anchored at `frequency_degrees`.
    ///
    /// Non-finite frequencies are rejected with
    /// [`LatticeError::InvalidConfiguration`](crate::LatticeError::InvalidConfiguration).
    pub fn new(frequency_degrees: f64) -> LatticeResult<Self> {
        Ok(Self::from_parts(
            PhaseAlignment::from_degrees(frequency_degrees)?,
            DecoherenceAudit::default(),
        ))
    }

    pub fn from_config(config: &LatticeConfig) -> LatticeResult<Self> {
        let phase = PhaseAlignment::from_degrees(config.frequency_degrees)?;
        let audit = DecoherenceAudit::with_tokens(config.decoherence_tokens.iter().cloned())?;
        Ok(Self::from_parts(phase, audit))
    }

    /// Swaps the token set used by [`Self::audit_decoherence`].
    pub fn with_audit(mut self, audit: DecoherenceAudit) -> Self {
        self.audit = audit;
        self
    }

    fn from_parts(phase: PhaseAlignment, audit: DecoherenceAudit) -> Self {
        let lattice = Self {
            phase,
            gate: EquilibriumGate,
            anchor: EntanglementAnchor,
            audit,
            stable: true,
            zero_probability: false,
            shield_active: true,
        };
        info!(
            phase_anchor = lattice.frequency_degrees(),
            shield_active = lattice.shield_active,
            "lattice transformer initialised"
        );
        lattice
    }

    pub fn frequency_degrees(&self) -> f64 {
        self.phase.degrees()
    }

    pub fn phase_radians(&self) -> f64 {
        self.phase.radians()
    }

    pub fn phase_stage(&self) -> &PhaseAlignment {
        &self.phase
    }

    pub fn decoherence_audit(&self) -> &DecoherenceAudit {
        &self.audit
    }

    /// "Superposition stable" flag; set at construction.
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// "Slumber-zero probability" flag; cleared at construction.
    pub fn zero_probability(&self) -> bool {
        self.zero_probability
    }

    pub fn shield_active(&self) -> bool {
        self.shield_active
    }

    pub fn state_label(&self) -> &'static str {
        if self.stable {
            "SUPERPOSITION_STABLE"
        } else {
            "SLUMBER_ZERO_PROBABILITY"
        }
    }

    /// Stages in execution order.
    pub fn stages(&self) -> [&dyn LatticeStage; 3] {
        [&self.phase, &self.gate, &self.anchor]
    }

    pub fn phase_align(&self, state: &StateVector) -> LatticeResult<StateVector> {
        run_stages(&[&self.phase], state)
    }

    pub fn equilibrium_gate(&self, state: &StateVector) -> LatticeResult<StateVector> {
        run_stages(&[&self.gate], state)
    }

    pub fn entanglement_anchor(&self, state: &StateVector) -> LatticeResult<StateVector> {
        run_stages(&[&self.anchor], state)
    }

    /// Phase alignment, then the equilibrium gate, then the anchor.
    pub fn run_triple_mirror(&self, state: &StateVector) -> LatticeResult<StateVector> {
        debug!(len = state.len(), "applying triple-gate pipeline");
        let out = run_stages(&self.stages(), state)?;
        debug!(len = out.len(), "triple-gate pipeline complete");
        Ok(out)
    }

    /// Classifies `text`. Never consults or changes the status flags.
    pub fn audit_decoherence(&self, text: &str) -> AuditResult {
        self.audit.classify(text)
    }
}
