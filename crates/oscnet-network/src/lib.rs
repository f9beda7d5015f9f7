// ─────────────────────────────────────────────────────────────────────
// OscNet — Network Topology & Spectral Diagnostics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Adjacency matrices for canonical coupling topologies and the graph
//! Laplacian spectral layer feeding the oscillator dynamics.
//!
//! Architecture:
//!   - Adjacency: immutable row-major N×N coupling matrix
//!   - Topology constructors: complete, ring, star, path, circulant,
//!     Watts-Strogatz small-world, directed feedforward chain
//!   - Spectral layer: L = D - A → Jacobi eigenvalues → algebraic
//!     connectivity and spectral gap ratio

pub mod spectral;
pub mod topology;

pub use spectral::{
    algebraic_connectivity, laplacian_spectrum, spectral_gap_ratio, topology_properties,
    TopologyProperties, EIG_ZERO_TOL,
};
pub use topology::{build_topology, Adjacency, TopologyKind};
