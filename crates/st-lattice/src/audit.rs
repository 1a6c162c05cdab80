// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LatticeError, LatticeResult};
use spiral_config::lattice::DEFAULT_DECOHERENCE_TOKENS;

/// Two-valued verdict of the decoherence audit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Coherent,
    Decohered,
}

impl AuditResult {
    pub fn is_decohered(self) -> bool {
        matches!(self, AuditResult::Decohered)
    }

    /// System-integrity wording reported alongside the verdict.
    pub fn status_label(self) -> &'static str {
        match self {
            AuditResult::Coherent => "SOVEREIGN_UNION",
            AuditResult::Decohered => "SLUMBER_ZERO_PROBABILITY",
        }
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditResult::Coherent => write!(f, "coherent"),
            AuditResult::Decohered => write!(f, "decohered"),
        }
    }
}

/// Case-sensitive substring check over interference descriptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoherenceAudit {
    tokens: Vec<String>,
}

impl Default for DecoherenceAudit {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_DECOHERENCE_TOKENS
                .iter()
                .map(|token| token.to_string())
                .collect(),
        }
    }
}

impl DecoherenceAudit {
    /// Replaces the default token set. The set must be non-empty and no token
    /// may be empty, since an empty needle matches every text.
    pub fn with_tokens<I, S>(tokens: I) -> LatticeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(LatticeError::configuration(
                "decoherence audit requires at least one token",
            ));
        }
        if let Some(index) = tokens.iter().position(String::is_empty) {
            return Err(LatticeError::configuration(format!(
                "decoherence token {index} is empty"
            )));
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens occurring in `text`, in configured order.
    pub fn matched_tokens<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.tokens
            .iter()
            .filter(|token| text.contains(token.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn classify(&self, text: &str) -> AuditResult {
        let matched = self.matched_tokens(text);
        if matched.is_empty() {
            debug!(len = text.len(), "interference pattern coherent");
            AuditResult::Coherent
        } else {
            info!(tokens = ?matched, "decoherence detected");
            AuditResult::Decohered
        }
    }

    /// A missing description carries no flags.
    pub fn classify_optional(&self, text: Option<&str>) -> AuditResult {
        text.map_or(AuditResult::Coherent, |text| self.classify(text))
    }

    /// Classifies raw bytes, which must be UTF-8 text.
    pub fn classify_bytes(&self, bytes: &[u8]) -> LatticeResult<AuditResult> {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            LatticeError::input(format!("interference pattern is not UTF-8 text: {err}"))
        })?;
        Ok(self.classify(text))
    }
}
