// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Failures surfaced by the lattice transforms and audit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LatticeError {
    /// A vector or text argument could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The transformer or audit was configured with unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl LatticeError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        LatticeError::InvalidInput(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        LatticeError::InvalidConfiguration(message.into())
    }
}

pub type LatticeResult<T> = Result<T, LatticeError>;
