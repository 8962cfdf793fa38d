use validator::{Validate, ValidationError};

use crate::error::IsingError;

/// Order in which a sweep visits the sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepOrder {
    /// Linear index order `0..n_spins`.
    #[default]
    Sequential,
    /// All even-parity sites, then all odd-parity sites. Needs every axis even.
    Checkerboard,
}

impl TryFrom<&str> for SweepOrder {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "checkerboard" => Ok(Self::Checkerboard),
            _ => Err(format!(
                "unknown sweep_order '{s}', expected 'sequential' or 'checkerboard'"
            )),
        }
    }
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if !cfg.coupling.is_finite() {
        return Err(ValidationError::new("coupling must be finite"));
    }
    if cfg.betas.is_empty() {
        return Err(ValidationError::new("betas must not be empty"));
    }
    if cfg.betas.iter().any(|b| !b.is_finite() || *b < 0.0) {
        return Err(ValidationError::new("every beta must be finite and >= 0"));
    }
    if cfg.n_samples < 1 {
        return Err(ValidationError::new("n_samples must be >= 1"));
    }
    if cfg.sweeps_per_sample < 1 {
        return Err(ValidationError::new("sweeps_per_sample must be >= 1"));
    }
    if cfg.autocorrelation_max_lag == Some(0) {
        return Err(ValidationError::new("autocorrelation_max_lag must be >= 1"));
    }
    Ok(())
}

/// Parameters of a temperature sweep.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Coupling constant J.
    pub coupling: f64,
    /// Inverse temperatures, visited in order.
    pub betas: Vec<f64>,
    pub thermalization_sweeps: usize,
    /// Number of recorded measurements per temperature.
    pub n_samples: usize,
    pub sweeps_per_sample: usize,
    pub sweep_order: SweepOrder,
    /// Carry one lattice through the whole beta ladder instead of starting
    /// a fresh lattice at every temperature.
    pub anneal: bool,
    /// Start from all spins +1 instead of a random configuration.
    pub cold_start: bool,
    /// Base seed. Independent lattices use `seed + i`. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub autocorrelation_max_lag: Option<usize>,
    /// Process independent temperature points on the current thread.
    pub sequential: bool,
}

impl SimConfig {
    /// Config with the classic driver settings: 30 thermalization sweeps,
    /// then 100 samples taken every 100 sweeps, annealed across `betas`.
    pub fn new(coupling: f64, betas: Vec<f64>) -> Self {
        Self {
            coupling,
            betas,
            thermalization_sweeps: 30,
            n_samples: 100,
            sweeps_per_sample: 100,
            sweep_order: SweepOrder::Sequential,
            anneal: true,
            cold_start: false,
            seed: None,
            autocorrelation_max_lag: None,
            sequential: false,
        }
    }

    /// Sweeps performed at a single temperature point.
    pub fn sweeps_per_point(&self) -> usize {
        self.thermalization_sweeps + self.n_samples * self.sweeps_per_sample
    }
}

/// `start, start + step, ...` for every value strictly below `end`.
pub fn beta_ladder(start: f64, end: f64, step: f64) -> crate::Result<Vec<f64>> {
    if !(start.is_finite() && end.is_finite() && step.is_finite()) {
        return Err(IsingError::Config(
            "beta ladder bounds and step must be finite".to_string(),
        ));
    }
    if step <= 0.0 {
        return Err(IsingError::Config(format!("beta step must be > 0, got {step}")));
    }
    if end < start {
        return Err(IsingError::Config(format!(
            "beta end {end} is below beta start {start}"
        )));
    }
    Ok((0u64..)
        .map(|i| start + i as f64 * step)
        .take_while(|&b| b < end)
        .collect())
}
