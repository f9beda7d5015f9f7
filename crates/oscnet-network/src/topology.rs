// ─────────────────────────────────────────────────────────────────────
// OscNet — Topology Constructors
// ─────────────────────────────────────────────────────────────────────
//! Adjacency matrices for the canonical coupling topologies.
//!
//! Convention: `A[i][j] != 0` means node j influences node i directly.
//! All undirected constructors produce symmetric, zero-diagonal
//! matrices; the only exception is the directed feedforward chain,
//! which carries the explicit head-cell self-loop `A[0][0] = 1`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use oscnet_types::{OscnetError, OscnetResult};

/// Immutable N×N coupling matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    n: usize,
    w: Vec<f64>,
}

impl Adjacency {
    /// Wrap a caller-supplied row-major matrix.
    ///
    /// Entries must be finite and non-negative; the dimension must be
    /// square and at least 2×2.
    pub fn from_flat(n: usize, w: Vec<f64>) -> OscnetResult<Self> {
        if n < 2 {
            return Err(OscnetError::InvalidTopology(format!(
                "need at least 2 nodes, got {n}"
            )));
        }
        if w.len() != n * n {
            return Err(OscnetError::InvalidTopology(format!(
                "expected {n}x{n} = {} entries, got {}",
                n * n,
                w.len()
            )));
        }
        for &v in &w {
            if !v.is_finite() || v < 0.0 {
                return Err(OscnetError::InvalidTopology(format!(
                    "adjacency entries must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(Self { n, w })
    }

    fn zeros(n: usize) -> OscnetResult<Self> {
        if n < 2 {
            return Err(OscnetError::InvalidTopology(format!(
                "need at least 2 nodes, got {n}"
            )));
        }
        Ok(Self {
            n,
            w: vec![0.0; n * n],
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Coupling weight from node j into node i.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.w[i * self.n + j]
    }

    /// Row-major backing slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.w
    }

    /// Weighted in-degree of node i (row sum).
    pub fn degree(&self, i: usize) -> f64 {
        self.w[i * self.n..(i + 1) * self.n].iter().sum()
    }

    /// All node degrees.
    pub fn degrees(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.degree(i)).collect()
    }

    /// Undirected edge count: total weight / 2.
    pub fn edge_count(&self) -> usize {
        let total: f64 = self.w.iter().sum();
        (total / 2.0).round() as usize
    }

    /// Mean node degree.
    pub fn mean_degree(&self) -> f64 {
        self.degrees().iter().sum::<f64>() / self.n as f64
    }

    /// Whether the matrix is symmetric within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    fn set_undirected(&mut self, i: usize, j: usize) {
        self.w[i * self.n + j] = 1.0;
        self.w[j * self.n + i] = 1.0;
    }

    fn has_edge(&self, i: usize, j: usize) -> bool {
        self.w[i * self.n + j] != 0.0
    }

    fn unset_undirected(&mut self, i: usize, j: usize) {
        self.w[i * self.n + j] = 0.0;
        self.w[j * self.n + i] = 0.0;
    }

    /// Complete graph K_N: all-to-all coupling.
    pub fn complete(n: usize) -> OscnetResult<Self> {
        let mut a = Self::zeros(n)?;
        for i in 0..n {
            for j in (i + 1)..n {
                a.set_undirected(i, j);
            }
        }
        Ok(a)
    }

    /// Ring with k nearest neighbours on each side.
    ///
    /// k=1 is the simple cycle; k=2 couples each node to 4 neighbours.
    pub fn ring(n: usize, k: usize) -> OscnetResult<Self> {
        let offsets: Vec<usize> = (1..=k).collect();
        Self::circulant(n, &offsets)
    }

    /// Star: node 0 is the hub, nodes 1..N are leaves.
    pub fn star(n: usize) -> OscnetResult<Self> {
        let mut a = Self::zeros(n)?;
        for leaf in 1..n {
            a.set_undirected(0, leaf);
        }
        Ok(a)
    }

    /// Path (open chain): 0-1-2-...-(N-1).
    pub fn path(n: usize) -> OscnetResult<Self> {
        let mut a = Self::zeros(n)?;
        for i in 0..n - 1 {
            a.set_undirected(i, i + 1);
        }
        Ok(a)
    }

    /// Circulant graph C_N(offsets): node i couples to i ± o for each
    /// offset o. Offsets must satisfy 1 <= o < N/2 so that no offset
    /// wraps onto itself or duplicates another edge.
    pub fn circulant(n: usize, offsets: &[usize]) -> OscnetResult<Self> {
        let mut a = Self::zeros(n)?;
        if offsets.is_empty() {
            return Err(OscnetError::InvalidTopology(
                "circulant offset set must be non-empty".to_string(),
            ));
        }
        for &o in offsets {
            if o == 0 || 2 * o >= n {
                return Err(OscnetError::InvalidTopology(format!(
                    "circulant offset must satisfy 1 <= o < N/2, got o={o} for N={n}"
                )));
            }
        }
        for i in 0..n {
            for &o in offsets {
                a.set_undirected(i, (i + o) % n);
            }
        }
        Ok(a)
    }

    /// Watts-Strogatz small-world graph.
    ///
    /// Starts from a ring lattice with k/2 neighbours per side (k must
    /// be even, >= 2, < N), then rewires each forward edge with
    /// probability p. The rewiring stream is fully determined by `seed`.
    pub fn small_world(n: usize, k: usize, p: f64, seed: u64) -> OscnetResult<Self> {
        if k < 2 || k % 2 != 0 {
            return Err(OscnetError::InvalidTopology(format!(
                "small-world mean degree must be even and >= 2, got k={k}"
            )));
        }
        if k >= n {
            return Err(OscnetError::InvalidTopology(format!(
                "small-world mean degree must be < N, got k={k} for N={n}"
            )));
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(OscnetError::InvalidTopology(format!(
                "rewire probability must be in [0, 1], got {p}"
            )));
        }

        let mut a = Self::zeros(n)?;
        let half = k / 2;
        for i in 0..n {
            for o in 1..=half {
                a.set_undirected(i, (i + o) % n);
            }
        }

        // Rewire each forward lattice edge (i, i+o) with probability p,
        // avoiding self-loops and duplicate edges. Saturated nodes
        // (degree N-1) keep their edges.
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for o in 1..=half {
            for i in 0..n {
                if rng.gen::<f64>() >= p {
                    continue;
                }
                if a.degree(i) as usize >= n - 1 {
                    continue;
                }
                let old = (i + o) % n;
                let mut target = rng.gen_range(0..n);
                while target == i || a.has_edge(i, target) {
                    target = rng.gen_range(0..n);
                }
                a.unset_undirected(i, old);
                a.set_undirected(i, target);
            }
        }
        Ok(a)
    }

    /// Directed feedforward chain: node i-1 drives node i, with the
    /// explicit self-loop on the head cell.
    ///
    /// Never passed to the symmetric spectral layer.
    pub fn feedforward_chain(n: usize) -> OscnetResult<Self> {
        let mut a = Self::zeros(n)?;
        a.w[0] = 1.0; // A[0][0]: head-cell self-loop convention
        for i in 1..n {
            a.w[i * n + (i - 1)] = 1.0;
        }
        Ok(a)
    }
}

/// Topology selector for the dispatch entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyKind {
    Complete,
    Ring { k: usize },
    Star,
    Path,
    Circulant { offsets: Vec<usize> },
    SmallWorld { k: usize, p: f64, seed: u64 },
    FeedforwardChain,
}

/// Build an adjacency matrix for `kind` on `n` nodes.
pub fn build_topology(kind: &TopologyKind, n: usize) -> OscnetResult<Adjacency> {
    match kind {
        TopologyKind::Complete => Adjacency::complete(n),
        TopologyKind::Ring { k } => Adjacency::ring(n, *k),
        TopologyKind::Star => Adjacency::star(n),
        TopologyKind::Path => Adjacency::path(n),
        TopologyKind::Circulant { offsets } => Adjacency::circulant(n, offsets),
        TopologyKind::SmallWorld { k, p, seed } => Adjacency::small_world(n, *k, *p, *seed),
        TopologyKind::FeedforwardChain => Adjacency::feedforward_chain(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_degrees() {
        let a = Adjacency::complete(8).unwrap();
        for i in 0..8 {
            assert!((a.degree(i) - 7.0).abs() < 1e-12, "degree({i}) = {}", a.degree(i));
            assert_eq!(a.get(i, i), 0.0, "diagonal must be zero");
        }
        assert_eq!(a.edge_count(), 28);
    }

    #[test]
    fn test_ring_k1_is_cycle() {
        let a = Adjacency::ring(10, 1).unwrap();
        for i in 0..10 {
            assert!((a.degree(i) - 2.0).abs() < 1e-12);
        }
        assert_eq!(a.get(0, 9), 1.0, "ring must wrap around");
    }

    #[test]
    fn test_ring_offset_too_large_rejected() {
        // k=3 on N=6 would wrap offset 3 onto the antipode
        assert!(Adjacency::ring(6, 3).is_err());
        assert!(Adjacency::ring(7, 3).is_ok());
    }

    #[test]
    fn test_star_hub_and_leaves() {
        let a = Adjacency::star(6).unwrap();
        assert!((a.degree(0) - 5.0).abs() < 1e-12, "hub degree");
        for leaf in 1..6 {
            assert!((a.degree(leaf) - 1.0).abs() < 1e-12, "leaf degree");
        }
    }

    #[test]
    fn test_path_edge_count() {
        let a = Adjacency::path(9).unwrap();
        assert_eq!(a.edge_count(), 8);
        assert!((a.degree(0) - 1.0).abs() < 1e-12);
        assert!((a.degree(4) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_circulant_matches_ring() {
        let ring = Adjacency::ring(11, 2).unwrap();
        let circ = Adjacency::circulant(11, &[1, 2]).unwrap();
        assert_eq!(ring, circ);
    }

    #[test]
    fn test_circulant_rejects_bad_offsets() {
        assert!(Adjacency::circulant(10, &[]).is_err());
        assert!(Adjacency::circulant(10, &[0]).is_err());
        assert!(Adjacency::circulant(10, &[5]).is_err());
    }

    #[test]
    fn test_tiny_network_rejected() {
        assert!(Adjacency::complete(1).is_err());
        assert!(Adjacency::path(0).is_err());
    }

    #[test]
    fn test_small_world_no_rewiring_is_lattice() {
        let sw = Adjacency::small_world(12, 4, 0.0, 42).unwrap();
        let lattice = Adjacency::ring(12, 2).unwrap();
        assert_eq!(sw, lattice);
    }

    #[test]
    fn test_small_world_preserves_edge_count() {
        let sw = Adjacency::small_world(20, 4, 0.3, 42).unwrap();
        assert_eq!(sw.edge_count(), 40);
        assert!(sw.is_symmetric(0.0));
        for i in 0..20 {
            assert_eq!(sw.get(i, i), 0.0, "rewiring must not create self-loops");
        }
    }

    #[test]
    fn test_small_world_deterministic_in_seed() {
        let a = Adjacency::small_world(16, 4, 0.5, 7).unwrap();
        let b = Adjacency::small_world(16, 4, 0.5, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_world_odd_degree_rejected() {
        assert!(Adjacency::small_world(10, 3, 0.3, 42).is_err());
        assert!(Adjacency::small_world(10, 0, 0.3, 42).is_err());
    }

    #[test]
    fn test_feedforward_structure() {
        let a = Adjacency::feedforward_chain(5).unwrap();
        assert_eq!(a.get(0, 0), 1.0, "head-cell self-loop");
        for i in 1..5 {
            assert_eq!(a.get(i, i - 1), 1.0, "node {} must drive node {}", i - 1, i);
            assert_eq!(a.get(i - 1, i), 0.0, "coupling is unidirectional");
        }
        assert!(!a.is_symmetric(1e-12));
    }

    #[test]
    fn test_from_flat_rejects_negative_and_shape() {
        assert!(Adjacency::from_flat(3, vec![0.0; 9]).is_ok());
        assert!(Adjacency::from_flat(3, vec![0.0; 8]).is_err());
        let mut w = vec![0.0; 9];
        w[1] = -1.0;
        assert!(Adjacency::from_flat(3, w).is_err());
    }

    #[test]
    fn test_build_topology_dispatch() {
        let n = 10;
        let direct = Adjacency::complete(n).unwrap();
        let dispatched = build_topology(&TopologyKind::Complete, n).unwrap();
        assert_eq!(direct, dispatched);

        let sw_kind = TopologyKind::SmallWorld { k: 4, p: 0.3, seed: 42 };
        let sw = build_topology(&sw_kind, n).unwrap();
        assert_eq!(sw, Adjacency::small_world(n, 4, 0.3, 42).unwrap());
    }
}
