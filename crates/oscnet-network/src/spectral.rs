// ─────────────────────────────────────────────────────────────────────
// OscNet — Laplacian Spectral Layer
// ─────────────────────────────────────────────────────────────────────
//! A → graph Laplacian L = D - A → eigenvalues and derived scalars.
//!
//! Uses a pure-Rust cyclic Jacobi eigensolver for symmetric matrices.
//! For the network sizes the kernel targets (N <= 20), convergence is
//! fast (typically <10 sweeps).

use serde::{Deserialize, Serialize};

use crate::topology::Adjacency;
use oscnet_types::{OscnetError, OscnetResult};

/// Eigenvalues below this tolerance count as zero modes.
pub const EIG_ZERO_TOL: f64 = 1e-10;

/// Symmetry tolerance for the spectral path.
const SYM_TOL: f64 = 1e-12;

/// Laplacian eigenvalues of an undirected graph, ascending.
///
/// The first eigenvalue is ~0 for any graph; it is 0 with multiplicity
/// equal to the number of connected components. Directed matrices
/// (the feedforward chain) are rejected — spectral analysis targets
/// undirected topologies only.
pub fn laplacian_spectrum(adj: &Adjacency) -> OscnetResult<Vec<f64>> {
    if !adj.is_symmetric(SYM_TOL) {
        return Err(OscnetError::InvalidTopology(
            "laplacian spectrum requires an undirected (symmetric) adjacency".to_string(),
        ));
    }

    let n = adj.n();
    let w = adj.as_slice();

    // L = D - A
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            l[i * n + j] = -w[i * n + j];
        }
        l[i * n + i] += adj.degree(i);
    }

    let mut eigvals = vec![0.0; n];
    jacobi_eigenvalues(&mut l, n, &mut eigvals)?;

    // Clamp small negative eigenvalues from numerical noise: L is PSD.
    for v in eigvals.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }

    eigvals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(eigvals)
}

/// Algebraic connectivity: second-smallest Laplacian eigenvalue.
///
/// Zero iff the graph is disconnected.
pub fn algebraic_connectivity(adj: &Adjacency) -> OscnetResult<f64> {
    let eigvals = laplacian_spectrum(adj)?;
    Ok(eigvals[1])
}

/// Ratio of largest to smallest nonzero Laplacian eigenvalue.
///
/// A smaller ratio means the network synchronizes more uniformly
/// across modes. Returns +inf when fewer than two eigenvalues exceed
/// the zero tolerance — callers read that as "spectral ratio
/// undefined, worst-case synchronizability".
pub fn spectral_gap_ratio(adj: &Adjacency) -> OscnetResult<f64> {
    let eigvals = laplacian_spectrum(adj)?;
    Ok(gap_ratio_of(&eigvals))
}

fn gap_ratio_of(eigvals: &[f64]) -> f64 {
    let nonzero: Vec<f64> = eigvals.iter().copied().filter(|&v| v > EIG_ZERO_TOL).collect();
    if nonzero.len() < 2 {
        return f64::INFINITY;
    }
    nonzero[nonzero.len() - 1] / nonzero[0]
}

/// Read-only diagnostic bundle for one topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyProperties {
    pub name: String,
    pub n: usize,
    pub num_edges: usize,
    pub mean_degree: f64,
    pub algebraic_connectivity: f64,
    pub spectral_gap_ratio: f64,
    pub laplacian_eigenvalues: Vec<f64>,
}

/// Compute the diagnostic bundle consumed by experiment drivers.
pub fn topology_properties(adj: &Adjacency, name: &str) -> OscnetResult<TopologyProperties> {
    let eigvals = laplacian_spectrum(adj)?;
    Ok(TopologyProperties {
        name: name.to_string(),
        n: adj.n(),
        num_edges: adj.edge_count(),
        mean_degree: adj.mean_degree(),
        algebraic_connectivity: eigvals[1],
        spectral_gap_ratio: gap_ratio_of(&eigvals),
        laplacian_eigenvalues: eigvals,
    })
}

/// Cyclic Jacobi eigenvalue iteration for a symmetric n×n matrix.
///
/// `a` is row-major and destroyed — its diagonal converges to the
/// eigenvalues, which are copied (unsorted) into `eigvals_out`.
fn jacobi_eigenvalues(a: &mut [f64], n: usize, eigvals_out: &mut [f64]) -> OscnetResult<()> {
    const MAX_SWEEPS: usize = 64;
    const TOL: f64 = 1e-14;

    let mut converged = false;
    for sweep in 0..MAX_SWEEPS {
        // Max off-diagonal magnitude
        let mut max_off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                let v = a[p * n + q].abs();
                if v > max_off {
                    max_off = v;
                }
            }
        }
        if max_off < TOL {
            converged = true;
            break;
        }

        // Jacobi threshold strategy: skip tiny rotations early on
        let threshold = if sweep < 4 {
            0.2 * max_off / (n * n) as f64
        } else {
            0.0
        };

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq.abs() < threshold {
                    continue;
                }

                let app = a[p * n + p];
                let aqq = a[q * n + q];
                let diff = aqq - app;

                let t = if diff.abs() < 1e-300 {
                    // Equal diagonal elements: rotate by pi/4
                    if apq > 0.0 {
                        1.0
                    } else {
                        -1.0
                    }
                } else {
                    let tau = diff / (2.0 * apq);
                    // Smaller root for numerical stability
                    if tau >= 0.0 {
                        1.0 / (tau + (1.0 + tau * tau).sqrt())
                    } else {
                        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                    }
                };

                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                let tau_rot = s / (1.0 + c); // Rutishauser form

                a[p * n + p] -= t * apq;
                a[q * n + q] += t * apq;
                a[p * n + q] = 0.0;
                a[q * n + p] = 0.0;

                for r in 0..n {
                    if r == p || r == q {
                        continue;
                    }
                    let arp = a[r * n + p];
                    let arq = a[r * n + q];
                    a[r * n + p] = arp - s * (arq + tau_rot * arp);
                    a[r * n + q] = arq + s * (arp - tau_rot * arq);
                    a[p * n + r] = a[r * n + p];
                    a[q * n + r] = a[r * n + q];
                }
            }
        }
    }

    if !converged {
        // One final check after the last sweep
        let mut max_off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                max_off = f64::max(max_off, a[p * n + q].abs());
            }
        }
        if max_off >= TOL {
            return Err(OscnetError::Numerical(format!(
                "jacobi eigensolver did not converge: max off-diagonal {max_off:.3e} after {MAX_SWEEPS} sweeps"
            )));
        }
    }

    for i in 0..n {
        eigvals_out[i] = a[i * n + i];
    }
    Ok(())
}
