pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod rng;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{beta_ladder, SimConfig, SweepOrder};
pub use error::{IsingError, Result};
pub use geometry::Lattice;
pub use rng::RandomSource;
pub use simulation::{run_beta_sweep, run_temperature};
pub use spins::IsingLattice;
pub use statistics::TemperaturePoint;
