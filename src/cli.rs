use anyhow::{ensure, Context, Result};
use clap::Parser;
use ising_sim::{beta_ladder, SimConfig, SweepOrder};

fn parse_order(s: &str) -> Result<SweepOrder, String> {
    SweepOrder::try_from(s)
}

#[derive(Parser, Debug)]
#[command(name = "ising-sweep")]
#[command(author, version, about = "Metropolis Monte Carlo temperature sweep of the Ising model")]
pub struct Cli {
    /// Lattice extent along each axis, comma separated (e.g. 10,10 or 8,8,8)
    #[arg(long, value_delimiter = ',', default_value = "10,10")]
    pub shape: Vec<usize>,

    /// Coupling constant J
    #[arg(long, short = 'j', default_value_t = 1.0, allow_negative_numbers = true)]
    pub coupling: f64,

    /// First inverse temperature of the ladder
    #[arg(long, default_value_t = 0.4)]
    pub beta_start: f64,

    /// Ladder stops below this inverse temperature
    #[arg(long, default_value_t = 0.6)]
    pub beta_end: f64,

    #[arg(long, default_value_t = 0.001)]
    pub beta_step: f64,

    /// Sweeps discarded before sampling at each temperature
    #[arg(long, default_value_t = 30)]
    pub thermalization: usize,

    /// Measurements recorded at each temperature
    #[arg(long, default_value_t = 100)]
    pub samples: usize,

    #[arg(long, default_value_t = 100)]
    pub sweeps_per_sample: usize,

    /// Site visiting order: sequential or checkerboard
    #[arg(long, default_value = "sequential", value_parser = parse_order)]
    pub order: SweepOrder,

    /// Fresh lattice per temperature instead of annealing one lattice
    #[arg(long)]
    pub independent: bool,

    /// Start from all spins up
    #[arg(long)]
    pub cold: bool,

    /// Base seed; omitted means OS entropy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum lag for the magnetization autocorrelation time
    #[arg(long)]
    pub autocorr_lag: Option<usize>,

    /// Run independent temperatures on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    pub fn to_config(&self) -> Result<SimConfig> {
        ensure!(!self.shape.is_empty(), "--shape needs at least one axis");
        let betas = beta_ladder(self.beta_start, self.beta_end, self.beta_step)
            .context("invalid beta ladder")?;
        Ok(SimConfig {
            thermalization_sweeps: self.thermalization,
            n_samples: self.samples,
            sweeps_per_sample: self.sweeps_per_sample,
            sweep_order: self.order,
            anneal: !self.independent,
            cold_start: self.cold,
            seed: self.seed,
            autocorrelation_max_lag: self.autocorr_lag,
            sequential: self.sequential,
            ..SimConfig::new(self.coupling, betas)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_driver() {
        let cli = Cli::parse_from(["ising-sweep"]);
        assert_eq!(cli.shape, vec![10, 10]);
        let cfg = cli.to_config().unwrap();
        assert_eq!(cfg.coupling, 1.0);
        assert_eq!(cfg.betas.len(), 200);
        assert_eq!(cfg.thermalization_sweeps, 30);
        assert_eq!(cfg.n_samples, 100);
        assert_eq!(cfg.sweeps_per_sample, 100);
        assert!(cfg.anneal);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "ising-sweep",
            "--shape",
            "4,4,4",
            "-j",
            "-1.0",
            "--beta-start",
            "0.1",
            "--beta-end",
            "0.3",
            "--beta-step",
            "0.1",
            "--order",
            "checkerboard",
            "--independent",
            "--cold",
            "--seed",
            "7",
        ]);
        let cfg = cli.to_config().unwrap();
        assert_eq!(cli.shape, vec![4, 4, 4]);
        assert_eq!(cfg.coupling, -1.0);
        assert_eq!(cfg.betas.len(), 2);
        assert_eq!(cfg.sweep_order, SweepOrder::Checkerboard);
        assert!(!cfg.anneal);
        assert!(cfg.cold_start);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn test_bad_order_rejected() {
        assert!(Cli::try_parse_from(["ising-sweep", "--order", "wolff"]).is_err());
    }

    #[test]
    fn test_bad_ladder_rejected() {
        let cli = Cli::parse_from(["ising-sweep", "--beta-step", "0"]);
        assert!(cli.to_config().is_err());
    }
}
