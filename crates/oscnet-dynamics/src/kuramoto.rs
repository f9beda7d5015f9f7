// ─────────────────────────────────────────────────────────────────────
// OscNet — Kuramoto Phase Dynamics
// ─────────────────────────────────────────────────────────────────────
//! Generalized Kuramoto model on an arbitrary coupling network:
//!
//!   dθ_i/dt = ω_i + (K/N) Σ_j A_ij sin(θ_j - θ_i)
//!
//! The (K/N) normalization keeps coupling strength comparable across
//! network sizes. The pairwise term is the full O(N²) loop — cheap at
//! the kernel's working sizes (N <= 20).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use oscnet_network::Adjacency;
use oscnet_types::{OscnetError, OscnetResult, SimulationConfig};

use crate::integrator::integrate;

/// Kuramoto order parameter r = |⟨e^{iθ}⟩| ∈ [0, 1].
///
/// r = 1 is full synchrony; r ~ 0 is uniform phase spread.
pub fn order_parameter(theta: &[f64]) -> f64 {
    let n = theta.len() as f64;
    if n < 1.0 {
        return 0.0;
    }
    let (sum_sin, sum_cos) = theta
        .iter()
        .fold((0.0, 0.0), |(s, c), &th| (s + th.sin(), c + th.cos()));
    let r = ((sum_sin / n).powi(2) + (sum_cos / n).powi(2)).sqrt();
    r.clamp(0.0, 1.0)
}

/// Order parameter per trajectory sample.
pub fn order_parameter_series(states: &[Vec<f64>]) -> Vec<f64> {
    states.iter().map(|th| order_parameter(th)).collect()
}

/// Phase-oscillator vector field over one coupling matrix.
pub struct KuramotoModel {
    n: usize,
    omega: Vec<f64>,
    k: f64,
    adj: Adjacency,
}

impl KuramotoModel {
    /// The frequency vector must match the network size. Callers
    /// enforcing the barycentric condition center `omega` themselves;
    /// the model accepts any real vector.
    pub fn new(omega: &[f64], k: f64, adj: &Adjacency) -> OscnetResult<Self> {
        let n = adj.n();
        if omega.len() != n {
            return Err(OscnetError::Validation(format!(
                "frequency vector length {} does not match network size {n}",
                omega.len()
            )));
        }
        if !k.is_finite() {
            return Err(OscnetError::Validation(format!(
                "coupling strength must be finite, got {k}"
            )));
        }
        Ok(Self {
            n,
            omega: omega.to_vec(),
            k,
            adj: adj.clone(),
        })
    }

    /// dθ_i/dt = ω_i + (K/N) Σ_j A_ij sin(θ_j - θ_i).
    pub fn rhs(&self, theta: &[f64], dtheta: &mut [f64]) {
        let n = self.n;
        let w = self.adj.as_slice();
        let k_over_n = self.k / n as f64;
        for i in 0..n {
            let mut coupling = 0.0;
            for j in 0..n {
                coupling += w[i * n + j] * (theta[j] - theta[i]).sin();
            }
            dtheta[i] = self.omega[i] + k_over_n * coupling;
        }
    }
}

/// Steady-state synchronization statistics for one trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KuramotoSummary {
    /// Time-averaged order parameter after the transient.
    pub r_mean: f64,
    /// Standard deviation of the order parameter after the transient.
    pub r_std: f64,
    /// Order parameter at the last retained sample.
    pub r_final: f64,
}

/// Integrate one Kuramoto trial and reduce to steady-state statistics.
///
/// Initial phases are drawn uniformly on [0, 2π) from the seeded
/// stream when `theta0` is not supplied. Solver non-convergence
/// propagates as `IntegrationFailure`; substituting a default outcome
/// for a failed trial is a caller policy, never done here.
pub fn simulate_kuramoto(
    omega: &[f64],
    k: f64,
    adj: &Adjacency,
    cfg: &SimulationConfig,
    theta0: Option<&[f64]>,
    seed: u64,
) -> OscnetResult<KuramotoSummary> {
    cfg.validate()?;
    let model = KuramotoModel::new(omega, k, adj)?;
    let n = adj.n();

    let theta0 = match theta0 {
        Some(t0) => {
            if t0.len() != n {
                return Err(OscnetError::Validation(format!(
                    "initial phase vector length {} does not match network size {n}",
                    t0.len()
                )));
            }
            t0.to_vec()
        }
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..n)
                .map(|_| rng.gen::<f64>() * std::f64::consts::TAU)
                .collect()
        }
    };

    let traj = integrate(|_t, th, dth| model.rhs(th, dth), &theta0, cfg)?;

    let start = traj.steady_start(cfg.transient_time);
    let r_steady: Vec<f64> = traj.states[start..]
        .iter()
        .map(|th| order_parameter(th))
        .collect();
    if r_steady.is_empty() {
        return Err(OscnetError::Validation(
            "no samples retained after transient discard".to_string(),
        ));
    }

    let m = r_steady.len() as f64;
    let r_mean = r_steady.iter().sum::<f64>() / m;
    let r_var = r_steady.iter().map(|r| (r - r_mean).powi(2)).sum::<f64>() / m;

    Ok(KuramotoSummary {
        r_mean,
        r_std: r_var.sqrt(),
        r_final: *r_steady.last().unwrap(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_cfg() -> SimulationConfig {
        SimulationConfig {
            total_time: 20.0,
            transient_time: 10.0,
            output_step: 0.05,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_order_parameter_aligned() {
        let theta = vec![1.3; 12];
        let r = order_parameter(&theta);
        assert!((r - 1.0).abs() < 1e-12, "aligned phases should give r=1, got {r}");
    }

    #[test]
    fn test_order_parameter_balanced_spread() {
        // Antipodal pair cancels exactly
        let r = order_parameter(&[0.0, std::f64::consts::PI]);
        assert!(r < 1e-12, "antipodal phases should give r=0, got {r}");

        // Uniformly spaced phases cancel as well
        let n = 10;
        let theta: Vec<f64> = (0..n)
            .map(|i| std::f64::consts::TAU * i as f64 / n as f64)
            .collect();
        assert!(order_parameter(&theta) < 1e-12);
    }

    #[test]
    fn test_order_parameter_in_unit_interval() {
        let theta = vec![0.3, 2.9, 4.1, 5.5, 1.7];
        let r = order_parameter(&theta);
        assert!((0.0..=1.0).contains(&r));
        assert!(r < 1.0, "non-degenerate spread must give r < 1");
    }

    #[test]
    fn test_rhs_fixed_point_when_aligned() {
        let adj = Adjacency::complete(6).unwrap();
        let model = KuramotoModel::new(&[0.0; 6], 2.0, &adj).unwrap();
        let mut dtheta = vec![0.0; 6];
        model.rhs(&[0.7; 6], &mut dtheta);
        for &d in &dtheta {
            assert!(d.abs() < 1e-12, "aligned identical oscillators must be stationary");
        }
    }

    #[test]
    fn test_uncoupled_identical_oscillators_stay_static() {
        // K=0, omega=0: phases frozen at the random initial draw, so
        // r(t) is constant and r_std vanishes.
        let adj = Adjacency::complete(10).unwrap();
        let summary =
            simulate_kuramoto(&[0.0; 10], 0.0, &adj, &quick_cfg(), None, 3).unwrap();
        assert!(summary.r_std < 1e-8, "static phases should give r_std ~ 0");
        assert!((0.0..=1.0).contains(&summary.r_mean));
    }

    #[test]
    fn test_uncoupled_mean_matches_finite_n_expectation() {
        // For N random static phases, E[r] ~ sqrt(pi)/(2 sqrt(N)).
        // Used as a sanity band over seeds, not an exact equality.
        let n = 10;
        let adj = Adjacency::complete(n).unwrap();
        let cfg = quick_cfg();
        let expectation = std::f64::consts::PI.sqrt() / (2.0 * (n as f64).sqrt());
        let n_seeds = 40;
        let mut acc = 0.0;
        for seed in 0..n_seeds {
            let s = simulate_kuramoto(&[0.0; 10], 0.0, &adj, &cfg, None, seed).unwrap();
            acc += s.r_mean;
        }
        let mean_r = acc / n_seeds as f64;
        assert!(
            (mean_r - expectation).abs() < 0.1,
            "mean r over seeds {mean_r} far from finite-N expectation {expectation}"
        );
    }

    #[test]
    fn test_strong_coupling_synchronizes() {
        // Identical oscillators under strong coupling: full sync is
        // the deterministic attractor, independent of seed.
        let adj = Adjacency::complete(5).unwrap();
        let cfg = quick_cfg();
        for seed in [1, 17, 99] {
            let s = simulate_kuramoto(&[0.0; 5], 10.0, &adj, &cfg, None, seed).unwrap();
            assert!(
                s.r_mean >= 0.99,
                "seed {seed}: expected r_mean >= 0.99, got {}",
                s.r_mean
            );
            assert!(s.r_final >= 0.99);
        }
    }

    #[test]
    fn test_simulation_deterministic_in_seed() {
        let adj = Adjacency::ring(8, 2).unwrap();
        let omega = [0.4, -0.1, 0.2, -0.5, 0.3, -0.3, 0.1, -0.1];
        let cfg = quick_cfg();
        let a = simulate_kuramoto(&omega, 2.0, &adj, &cfg, None, 42).unwrap();
        let b = simulate_kuramoto(&omega, 2.0, &adj, &cfg, None, 42).unwrap();
        assert_eq!(a.r_mean.to_bits(), b.r_mean.to_bits());
        assert_eq!(a.r_std.to_bits(), b.r_std.to_bits());
        assert_eq!(a.r_final.to_bits(), b.r_final.to_bits());
    }

    #[test]
    fn test_explicit_initial_phases_bypass_rng() {
        let adj = Adjacency::complete(4).unwrap();
        let theta0 = [0.0, 0.1, 0.2, 0.3];
        let cfg = quick_cfg();
        let a = simulate_kuramoto(&[0.0; 4], 1.0, &adj, &cfg, Some(&theta0), 1).unwrap();
        let b = simulate_kuramoto(&[0.0; 4], 1.0, &adj, &cfg, Some(&theta0), 999).unwrap();
        assert_eq!(a.r_mean.to_bits(), b.r_mean.to_bits(), "seed must be unused");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let adj = Adjacency::complete(5).unwrap();
        assert!(KuramotoModel::new(&[0.0; 4], 1.0, &adj).is_err());
        assert!(
            simulate_kuramoto(&[0.0; 5], 1.0, &adj, &quick_cfg(), Some(&[0.0; 3]), 1).is_err()
        );
    }
}
