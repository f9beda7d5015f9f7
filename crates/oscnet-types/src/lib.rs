// ─────────────────────────────────────────────────────────────────────
// OscNet — Coupled-Oscillator Synchronization Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! OscNet kernel — network-coupled oscillator simulation and
//! steady-state synchronization measurement.

pub mod config;
pub mod error;

pub use config::SimulationConfig;
pub use error::{OscnetError, OscnetResult};
