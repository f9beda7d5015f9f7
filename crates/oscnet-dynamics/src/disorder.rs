// ─────────────────────────────────────────────────────────────────────
// OscNet — Barycentric Disorder Vectors
// ─────────────────────────────────────────────────────────────────────
//! Zero-mean heterogeneity vectors for frequency/excitation disorder.
//!
//! The barycentric condition Σv_i = 0 is a caller contract, not an
//! engine invariant — the dynamics accept any real vector. These
//! helpers produce vectors that satisfy it, including the projection
//! used by disorder searches: N-1 free parameters with the last entry
//! completing the sum to zero.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use oscnet_network::Adjacency;
use oscnet_types::{OscnetError, OscnetResult};

/// Subtract the mean: projection onto the zero-mean hyperplane.
pub fn center_to_zero_mean(v: &[f64]) -> Vec<f64> {
    let mean = v.iter().sum::<f64>() / v.len().max(1) as f64;
    v.iter().map(|x| x - mean).collect()
}

/// Extend N-1 free parameters to a full zero-sum vector by appending
/// the negated sum. Decoupled from any particular search strategy.
pub fn complete_to_zero_mean(free: &[f64]) -> Vec<f64> {
    let mut full = free.to_vec();
    full.push(-free.iter().sum::<f64>());
    full
}

/// Uniform disorder on (-delta, delta), centered to zero mean.
pub fn uniform_disorder(n: usize, delta: f64, seed: u64) -> OscnetResult<Vec<f64>> {
    if n == 0 || !(delta > 0.0) {
        return Err(OscnetError::Validation(format!(
            "uniform disorder needs n >= 1 and delta > 0, got n={n} delta={delta}"
        )));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..n).map(|_| rng.gen_range(-delta..delta)).collect();
    Ok(center_to_zero_mean(&raw))
}

/// Gaussian disorder N(0, sigma), centered to zero mean.
pub fn gaussian_disorder(n: usize, sigma: f64, seed: u64) -> OscnetResult<Vec<f64>> {
    if n == 0 || !(sigma > 0.0) {
        return Err(OscnetError::Validation(format!(
            "gaussian disorder needs n >= 1 and sigma > 0, got n={n} sigma={sigma}"
        )));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma)
        .map_err(|e| OscnetError::Numerical(format!("normal distribution: {e}")))?;
    let raw: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    Ok(center_to_zero_mean(&raw))
}

/// Structured disorder proportional to degree deviation (d_i - d̄),
/// rescaled so the largest magnitude equals `delta`.
///
/// Regular graphs have no degree deviation; the result is then the
/// zero vector (homogeneous).
pub fn degree_correlated_disorder(adj: &Adjacency, delta: f64) -> Vec<f64> {
    let deviation = center_to_zero_mean(&adj.degrees());
    let max_abs = deviation.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_abs == 0.0 {
        return deviation;
    }
    center_to_zero_mean(
        &deviation
            .iter()
            .map(|v| delta * v / max_abs)
            .collect::<Vec<f64>>(),
    )
}

/// Negated degree-correlated disorder: slow hubs, fast leaves.
pub fn anti_degree_correlated_disorder(adj: &Adjacency, delta: f64) -> Vec<f64> {
    degree_correlated_disorder(adj, delta)
        .iter()
        .map(|v| -v)
        .collect()
}

/// Bimodal disorder: first half at +delta, rest at -delta, centered
/// (odd N leaves a residual mean that centering removes).
pub fn bimodal_disorder(n: usize, delta: f64) -> Vec<f64> {
    let half = n / 2;
    let raw: Vec<f64> = (0..n)
        .map(|i| if i < half { delta } else { -delta })
        .collect();
    center_to_zero_mean(&raw)
}
