// ─────────────────────────────────────────────────────────────────────
// OscNet — Simulation Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{OscnetError, OscnetResult};

/// Integration and measurement protocol for one simulation run.
///
/// The tolerances are tight enough to resolve oscillatory dynamics
/// without artificial damping; the output grid is fixed-step regardless
/// of the solver's internal adaptive stepping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total integration time T.
    pub total_time: f64,

    /// Leading portion of the trajectory discarded before any
    /// steady-state statistic is computed.
    pub transient_time: f64,

    /// Fixed sampling step for trajectory output.
    pub output_step: f64,

    /// Relative solver tolerance. Default: 1e-8.
    pub rtol: f64,

    /// Absolute solver tolerance. Default: 1e-10.
    pub atol: f64,

    /// Hard cap on internal solver steps before the run is declared
    /// non-convergent.
    pub max_steps: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_time: 100.0,
            transient_time: 50.0,
            output_step: 0.01,
            rtol: 1e-8,
            atol: 1e-10,
            max_steps: 10_000_000,
        }
    }
}

impl SimulationConfig {
    /// Preset for the Stuart-Landau feedforward protocol: the amplitude
    /// transient is slower than the phase transient, so both windows
    /// are doubled.
    pub fn stuart_landau() -> Self {
        Self {
            total_time: 200.0,
            transient_time: 100.0,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> OscnetResult<()> {
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err(OscnetError::Config(format!(
                "total_time must be finite and > 0, got {}",
                self.total_time
            )));
        }
        if !self.transient_time.is_finite()
            || self.transient_time < 0.0
            || self.transient_time >= self.total_time
        {
            return Err(OscnetError::Config(format!(
                "transient_time must be in [0, total_time), got {} (total_time {})",
                self.transient_time, self.total_time
            )));
        }
        if !self.output_step.is_finite()
            || self.output_step <= 0.0
            || self.output_step > self.total_time
        {
            return Err(OscnetError::Config(format!(
                "output_step must be in (0, total_time], got {}",
                self.output_step
            )));
        }
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(OscnetError::Config(format!(
                "tolerances must be > 0, got rtol={} atol={}",
                self.rtol, self.atol
            )));
        }
        if self.max_steps == 0 {
            return Err(OscnetError::Config("max_steps must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> OscnetResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OscnetError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_stuart_landau_preset_validates() {
        let cfg = SimulationConfig::stuart_landau();
        assert!(cfg.validate().is_ok());
        assert!((cfg.total_time - 200.0).abs() < 1e-12);
        assert!((cfg.transient_time - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_transient_past_total_rejected() {
        let cfg = SimulationConfig {
            transient_time: 150.0,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_positive_output_step_rejected() {
        let cfg = SimulationConfig {
            output_step: 0.0,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let cfg = SimulationConfig {
            rtol: 0.0,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_roundtrip() {
        let cfg = SimulationConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = SimulationConfig::from_json(&json).unwrap();
        assert!((back.total_time - cfg.total_time).abs() < 1e-12);
        assert!((back.rtol - cfg.rtol).abs() < 1e-20);
    }

    #[test]
    fn test_from_json_garbage_rejected() {
        assert!(SimulationConfig::from_json("not json").is_err());
    }
}
