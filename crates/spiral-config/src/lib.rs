//! Shared runtime configuration for the SpiralTorch lattice tooling.
//!
//! [`tracing`] installs the process-wide subscriber; [`lattice`] resolves the
//! transformer settings from TOML files and environment overrides.

pub mod lattice;
pub mod tracing;
