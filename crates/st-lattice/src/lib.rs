// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Triple-mirror transforms over complex state vectors.
//!
//! A [`LatticeTransformer`] carries a phase anchor in degrees and runs three
//! stages over a [`StateVector`]:
//!
//! 1. **Phase alignment** multiplies every amplitude by `exp(iθ)` with
//!    `θ = frequency · π / 180`.
//! 2. **Equilibrium gate** replaces each amplitude `z` by `(z + z̄) / 2`,
//!    projecting onto the real axis.
//! 3. **Entanglement anchor** is currently the identity and marks where a
//!    coupling to other registers will attach.
//!
//! Independently, [`DecoherenceAudit`] classifies a free-form interference
//! description as [`AuditResult::Coherent`] or [`AuditResult::Decohered`]
//! based on fixed substrings.
//!
//! This is a classical model over `Complex<f64>`; nothing here normalises
//! vectors or simulates measurement.

pub mod audit;
pub mod error;
pub mod stage;
pub mod state;
pub mod transformer;

pub use audit::{AuditResult, DecoherenceAudit};
pub use error::{LatticeError, LatticeResult};
pub use spiral_config::lattice::{
    LatticeConfig, DEFAULT_DECOHERENCE_TOKENS, DEFAULT_FREQUENCY_DEGREES,
};
pub use stage::{run_stages, EntanglementAnchor, EquilibriumGate, LatticeStage, PhaseAlignment};
pub use state::StateVector;
pub use transformer::LatticeTransformer;
