// ─────────────────────────────────────────────────────────────────────
// OscNet — Coupling Sweeps & Critical-Coupling Estimation
// ─────────────────────────────────────────────────────────────────────
//! Trial-averaged coupling sweeps: synchronization outcomes are
//! stochastic in the initial condition, so every reported quantity is
//! a sample mean over seeded trials. Per-trial seeds derive
//! deterministically from the base seed, which is what makes sweeps
//! reproducible and safely parallelizable by callers.

use serde::{Deserialize, Serialize};

use oscnet_network::Adjacency;
use oscnet_types::{OscnetError, OscnetResult, SimulationConfig};

use crate::kuramoto::simulate_kuramoto;
use crate::stuart_landau::linspace;

/// Mean/std of the steady-state order parameter per coupling value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    pub k_values: Vec<f64>,
    pub r_means: Vec<f64>,
    pub r_stds: Vec<f64>,
}

/// Sweep coupling strength, averaging `n_trials` seeded Kuramoto
/// trials per value.
///
/// Trial seeds are `base_seed + i * n_trials + t` for coupling index i
/// and trial t. Integration failure propagates; treating a failed
/// trial as zero output is a caller policy, not done here.
pub fn sweep_coupling(
    omega: &[f64],
    adj: &Adjacency,
    k_values: &[f64],
    n_trials: usize,
    cfg: &SimulationConfig,
    base_seed: u64,
) -> OscnetResult<SweepResult> {
    if k_values.is_empty() {
        return Err(OscnetError::Validation(
            "coupling sweep needs at least one K value".to_string(),
        ));
    }
    if n_trials == 0 {
        return Err(OscnetError::Validation("n_trials must be >= 1".to_string()));
    }

    let mut r_means = Vec::with_capacity(k_values.len());
    let mut r_stds = Vec::with_capacity(k_values.len());

    for (i, &k) in k_values.iter().enumerate() {
        let mut trial_r = Vec::with_capacity(n_trials);
        for t in 0..n_trials {
            let trial_seed = base_seed + (i * n_trials + t) as u64;
            let summary = simulate_kuramoto(omega, k, adj, cfg, None, trial_seed)?;
            trial_r.push(summary.r_mean);
        }
        let m = trial_r.len() as f64;
        let mean = trial_r.iter().sum::<f64>() / m;
        let var = trial_r.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / m;
        r_means.push(mean);
        r_stds.push(var.sqrt());
    }

    Ok(SweepResult {
        k_values: k_values.to_vec(),
        r_means,
        r_stds,
    })
}

/// First threshold crossing of the r(K) curve, linearly interpolated.
///
/// Policy (load-bearing for downstream comparisons):
///   - never crosses: upper bound of the K range ("no synchronization
///     observed in range")
///   - already above at the first sample: lower bound
///   - otherwise: linear interpolation between the bracketing pairs;
///     a flat bracket degenerates to the upper bracket K.
pub fn estimate_critical_coupling(k_values: &[f64], r_means: &[f64], threshold: f64) -> f64 {
    debug_assert_eq!(k_values.len(), r_means.len());
    if k_values.is_empty() {
        return f64::NAN;
    }

    let idx = match r_means.iter().position(|&r| r >= threshold) {
        None => return k_values[k_values.len() - 1],
        Some(0) => return k_values[0],
        Some(idx) => idx,
    };

    // The bracket is strict by construction: r0 < threshold <= r1.
    let (k0, k1) = (k_values[idx - 1], k_values[idx]);
    let (r0, r1) = (r_means[idx - 1], r_means[idx]);
    k0 + (threshold - r0) * (k1 - k0) / (r1 - r0)
}

/// Sweep plus threshold-crossing estimate in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalCouplingScan {
    pub k_c: f64,
    pub sweep: SweepResult,
}

/// Convenience entry point: linspace over `k_range`, sweep, estimate.
#[allow(clippy::too_many_arguments)]
pub fn critical_coupling_scan(
    omega: &[f64],
    adj: &Adjacency,
    k_range: (f64, f64),
    n_k: usize,
    n_trials: usize,
    threshold: f64,
    cfg: &SimulationConfig,
    base_seed: u64,
) -> OscnetResult<CriticalCouplingScan> {
    if n_k < 2 {
        return Err(OscnetError::Validation(
            "critical-coupling scan needs at least two K values".to_string(),
        ));
    }
    let k_values = linspace(k_range.0, k_range.1, n_k);
    let sweep = sweep_coupling(omega, adj, &k_values, n_trials, cfg, base_seed)?;
    let k_c = estimate_critical_coupling(&sweep.k_values, &sweep.r_means, threshold);
    Ok(CriticalCouplingScan { k_c, sweep })
}
