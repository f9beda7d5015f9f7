// ─────────────────────────────────────────────────────────────────────
// OscNet — Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all OscNet kernel failures.
///
/// Degenerate spectra (disconnected or trivial graphs) are deliberately
/// NOT errors: `spectral_gap_ratio` returns `f64::INFINITY` instead,
/// since "worst-case synchronizability" is a usable downstream value.
#[derive(Error, Debug)]
pub enum OscnetError {
    /// Malformed topology parameters (N < 2, offsets >= N/2, odd
    /// small-world degree, directed matrix on the symmetric path).
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// The adaptive solver could not advance within its tolerance and
    /// step budget. Propagated as-is; the kernel never retries with
    /// relaxed tolerances.
    #[error("integration failure at t={t:.6}: {reason}")]
    IntegrationFailure { t: f64, reason: String },

    /// Inconsistent call arguments (vector/matrix length mismatches).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation, eigensolver stall).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type OscnetResult<T> = Result<T, OscnetError>;
