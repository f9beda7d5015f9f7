// ─────────────────────────────────────────────────────────────────────
// OscNet — Oscillator Dynamics & Measurement Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Continuous-time oscillator models on coupling networks, plus the
//! steady-state measurement protocol built on top of them.
//!
//! Architecture:
//!   - integrator: adaptive Dormand-Prince 5(4) with fixed-step output
//!   - kuramoto: phase oscillators dθ_i/dt = ω_i + (K/N) Σ A_ij sin(θ_j - θ_i)
//!   - stuart_landau: complex amplitude-phase chain with feedforward
//!     coupling and a phase-lock classifier
//!   - sweep: trial-averaged coupling sweeps and critical-coupling
//!     estimation
//!   - disorder: barycentric (zero-mean) heterogeneity vectors
//!
//! Every entry point that consumes randomness takes an explicit `u64`
//! seed; the kernel never reads process-global RNG state. Each call is
//! independent and single-threaded — callers parallelize across
//! trials, coupling values, and topologies.

pub mod disorder;
pub mod integrator;
pub mod kuramoto;
pub mod stuart_landau;
pub mod sweep;

pub use disorder::{
    anti_degree_correlated_disorder, bimodal_disorder, center_to_zero_mean,
    complete_to_zero_mean, degree_correlated_disorder, gaussian_disorder, uniform_disorder,
};
pub use integrator::{integrate, Trajectory};
pub use kuramoto::{
    order_parameter, order_parameter_series, simulate_kuramoto, KuramotoModel, KuramotoSummary,
};
pub use stuart_landau::{
    scan_phase_locking, simulate_stuart_landau, LockScan, StuartLandauChain, StuartLandauRun,
};
pub use sweep::{
    critical_coupling_scan, estimate_critical_coupling, sweep_coupling, CriticalCouplingScan,
    SweepResult,
};
