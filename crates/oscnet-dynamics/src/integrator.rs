// ─────────────────────────────────────────────────────────────────────
// OscNet — Adaptive Dormand-Prince Integrator
// ─────────────────────────────────────────────────────────────────────
//! Explicit Runge-Kutta 5(4) (Dormand-Prince) with embedded error
//! control and fixed-step trajectory sampling.
//!
//! Internal steps adapt to the local error estimate and clamp onto the
//! output grid, so the sampled trajectory is uniform regardless of the
//! step sequence. Non-convergence (step underflow, step-budget
//! exhaustion, non-finite state) surfaces as `IntegrationFailure`.

use oscnet_types::{OscnetError, OscnetResult, SimulationConfig};

// Dormand-Prince 5(4) tableau.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
// Sixth row doubles as the 5th-order solution weights.
const B5: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];
// b5 - b4: weights for the embedded error estimate.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Smallest admissible internal step before the run is declared
/// non-convergent.
const H_MIN: f64 = 1e-12;

/// Fixed-step-sampled solution of one integration run.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Sample times, strictly increasing, starting at 0.
    pub times: Vec<f64>,
    /// State vector at each sample time.
    pub states: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of the first sample at or past the transient cutoff.
    pub fn steady_start(&self, t_transient: f64) -> usize {
        self.times.partition_point(|&t| t < t_transient)
    }
}

/// Integrate `rhs` from `y0` over `[0, total_time)`, sampling every
/// `output_step` (endpoint excluded, matching the measurement
/// protocol's sample grid).
pub fn integrate<F>(mut rhs: F, y0: &[f64], cfg: &SimulationConfig) -> OscnetResult<Trajectory>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    cfg.validate()?;
    let n = y0.len();
    if n == 0 {
        return Err(OscnetError::Validation("empty initial state".to_string()));
    }
    for &v in y0 {
        if !v.is_finite() {
            return Err(OscnetError::Validation(
                "initial state contains NaN or Inf".to_string(),
            ));
        }
    }

    // Output grid: k * dt for k * dt < T.
    let dt = cfg.output_step;
    let mut grid = Vec::new();
    let mut k = 0u64;
    loop {
        let t = k as f64 * dt;
        if t >= cfg.total_time - 1e-12 {
            break;
        }
        grid.push(t);
        k += 1;
    }

    let mut traj = Trajectory {
        times: Vec::with_capacity(grid.len()),
        states: Vec::with_capacity(grid.len()),
    };
    traj.times.push(0.0);
    traj.states.push(y0.to_vec());

    // Stage and scratch buffers, allocated once.
    let mut ks: [Vec<f64>; 7] = std::array::from_fn(|_| vec![0.0; n]);
    let mut y = y0.to_vec();
    let mut y_stage = vec![0.0; n];
    let mut y_new = vec![0.0; n];

    let mut t = 0.0;
    let mut h = dt;
    let mut steps: u64 = 0;

    for &target in grid.iter().skip(1) {
        while t < target {
            steps += 1;
            if steps > cfg.max_steps {
                return Err(OscnetError::IntegrationFailure {
                    t,
                    reason: format!("exceeded {} internal steps", cfg.max_steps),
                });
            }

            let h_step = h.min(target - t);
            let clamped = h_step < h;
            if h_step < H_MIN {
                return Err(OscnetError::IntegrationFailure {
                    t,
                    reason: format!("step size underflow (h = {h_step:.3e})"),
                });
            }

            // Seven stages.
            rhs(t, &y, &mut ks[0]);
            stage(&y, &ks, &A2, h_step, &mut y_stage);
            rhs(t + C[1] * h_step, &y_stage, &mut ks[1]);
            stage(&y, &ks, &A3, h_step, &mut y_stage);
            rhs(t + C[2] * h_step, &y_stage, &mut ks[2]);
            stage(&y, &ks, &A4, h_step, &mut y_stage);
            rhs(t + C[3] * h_step, &y_stage, &mut ks[3]);
            stage(&y, &ks, &A5, h_step, &mut y_stage);
            rhs(t + C[4] * h_step, &y_stage, &mut ks[4]);
            stage(&y, &ks, &A6, h_step, &mut y_stage);
            rhs(t + C[5] * h_step, &y_stage, &mut ks[5]);
            stage(&y, &ks, &B5, h_step, &mut y_new);
            rhs(t + C[6] * h_step, &y_new, &mut ks[6]);

            // Weighted RMS error norm against atol + rtol * |y|.
            let mut err_sq = 0.0;
            for i in 0..n {
                let mut e = 0.0;
                for (s, k_s) in ks.iter().enumerate() {
                    e += E[s] * k_s[i];
                }
                e *= h_step;
                let scale = cfg.atol + cfg.rtol * y[i].abs().max(y_new[i].abs());
                let r = e / scale;
                err_sq += r * r;
            }
            let err_norm = (err_sq / n as f64).sqrt();

            if err_norm.is_finite() && err_norm <= 1.0 {
                t += h_step;
                y.copy_from_slice(&y_new);
                let factor = if err_norm == 0.0 {
                    5.0
                } else {
                    (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
                };
                // A step clamped to the grid must not shrink the
                // controller's working step.
                if !clamped {
                    h = h_step * factor;
                }
            } else {
                let factor = if err_norm.is_finite() {
                    (0.9 * err_norm.powf(-0.2)).clamp(0.2, 0.9)
                } else {
                    0.2
                };
                h = h_step * factor;
            }
        }
        // Kill accumulated roundoff so the grid stays exact.
        t = target;
        traj.times.push(target);
        traj.states.push(y.clone());
    }

    Ok(traj)
}

/// y_stage = y + h * sum(a[s] * k[s]).
fn stage(y: &[f64], ks: &[Vec<f64>; 7], a: &[f64], h: f64, out: &mut [f64]) {
    for i in 0..y.len() {
        let mut acc = 0.0;
        for (s, &a_s) in a.iter().enumerate() {
            if a_s != 0.0 {
                acc += a_s * ks[s][i];
            }
        }
        out[i] = y[i] + h * acc;
    }
}
