use tracing::debug;

use crate::config::SweepOrder;
use crate::error::{IsingError, Result};
use crate::geometry::Lattice;
use crate::mcmc::{self, FlipTally};
use crate::rng::RandomSource;
use crate::spins::energy;

/// Ising spin configuration on a periodic lattice, with its own generator,
/// model parameters and Metropolis bookkeeping.
///
/// J and beta start unset; anything that needs them returns
/// [`IsingError::Unconfigured`] until [`set_coupling`](Self::set_coupling)
/// and [`set_beta`](Self::set_beta) have been called.
#[derive(Debug, Clone)]
pub struct IsingLattice {
    lattice: Lattice,
    /// One entry per site, each +1 or -1.
    spins: Vec<i8>,
    rng: RandomSource,
    coupling: Option<f64>,
    beta: Option<f64>,
    tally: FlipTally,
}

impl IsingLattice {
    /// Random initial spins, generator seeded from OS entropy.
    pub fn new(shape: Vec<usize>) -> Result<Self> {
        Self::with_rng(shape, RandomSource::from_entropy())
    }

    /// Random initial spins from a reproducible seed.
    pub fn with_seed(shape: Vec<usize>, seed: u64) -> Result<Self> {
        Self::with_rng(shape, RandomSource::from_seed(seed))
    }

    fn with_rng(shape: Vec<usize>, mut rng: RandomSource) -> Result<Self> {
        let lattice = Lattice::new(shape)?;
        let spins: Vec<i8> = (0..lattice.n_spins).map(|_| rng.spin()).collect();
        debug!(shape = ?lattice.shape, n_spins = lattice.n_spins, "lattice initialized");
        Ok(Self {
            lattice,
            spins,
            rng,
            coupling: None,
            beta: None,
            tally: FlipTally::default(),
        })
    }

    /// Set every spin to +1. Counters and generator state are kept.
    pub fn cold_start(&mut self) {
        self.spins.fill(1);
    }

    pub fn set_coupling(&mut self, coupling: f64) {
        self.coupling = Some(coupling);
    }

    pub fn set_beta(&mut self, beta: f64) {
        self.beta = Some(beta);
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.beta = Some(1.0 / temperature);
    }

    pub fn coupling(&self) -> Option<f64> {
        self.coupling
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    pub fn geometry(&self) -> &Lattice {
        &self.lattice
    }

    pub fn shape(&self) -> &[usize] {
        &self.lattice.shape
    }

    pub fn n_spins(&self) -> usize {
        self.lattice.n_spins
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    pub fn spin(&self, i: usize) -> i8 {
        self.spins[i]
    }

    /// Negate the spin at site `i`.
    pub fn flip_spin(&mut self, i: usize) {
        self.spins[i] = -self.spins[i];
    }

    pub fn coordinates_of(&self, i: usize) -> Vec<usize> {
        self.lattice.coordinates_of(i)
    }

    pub fn index_of(&self, coords: &[usize]) -> usize {
        self.lattice.index_of(coords)
    }

    pub fn neighbor(&self, i: usize, dim: usize, forward: bool) -> usize {
        self.lattice.neighbor(i, dim, forward)
    }

    /// Sum of the `2 * n_dims` neighbor spins of site `i`.
    pub fn sum_around(&self, i: usize) -> i32 {
        energy::local_field(&self.lattice, &self.spins, i)
    }

    /// Total energy `H = -J * sum over bonds of s_i s_j`. Independent of beta.
    pub fn hamiltonian(&self) -> Result<f64> {
        let j = self.coupling.ok_or(IsingError::Unconfigured("coupling"))?;
        Ok(-j * energy::bond_sum(&self.lattice, &self.spins) as f64)
    }

    pub fn energy_per_site(&self) -> Result<f64> {
        Ok(self.hamiltonian()? / self.lattice.n_spins as f64)
    }

    /// Mean spin, in `[-1, 1]`.
    pub fn magnetization(&self) -> f64 {
        energy::magnetization(&self.spins)
    }

    pub fn accepted(&self) -> u64 {
        self.tally.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.tally.rejected
    }

    pub fn attempts(&self) -> u64 {
        self.tally.accepted + self.tally.rejected
    }

    /// Fraction of accepted proposals, or `None` before the first attempt.
    pub fn acceptance_ratio(&self) -> Option<f64> {
        match self.attempts() {
            0 => None,
            n => Some(self.tally.accepted as f64 / n as f64),
        }
    }

    fn coupling_beta(&self) -> Result<f64> {
        let j = self.coupling.ok_or(IsingError::Unconfigured("coupling"))?;
        let beta = self.beta.ok_or(IsingError::Unconfigured("beta"))?;
        Ok(j * beta)
    }

    /// Metropolis proposal at site `i`. Returns whether the spin was flipped.
    pub fn propose_flip(&mut self, i: usize) -> Result<bool> {
        let jb = self.coupling_beta()?;
        let accepted = mcmc::metropolis_step(&self.lattice, &mut self.spins, jb, &mut self.rng, i);
        if accepted {
            self.tally.accepted += 1;
        } else {
            self.tally.rejected += 1;
        }
        Ok(accepted)
    }

    /// One Metropolis attempt per site in index order.
    pub fn sweep(&mut self) -> Result<()> {
        self.sweep_ordered(SweepOrder::Sequential)
    }

    pub fn sweep_ordered(&mut self, order: SweepOrder) -> Result<()> {
        let jb = self.coupling_beta()?;
        let tally =
            mcmc::metropolis_sweep(&self.lattice, &mut self.spins, jb, &mut self.rng, order)?;
        self.tally.accepted += tally.accepted;
        self.tally.rejected += tally.rejected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(shape: Vec<usize>, seed: u64, coupling: f64, beta: f64) -> IsingLattice {
        let mut lat = IsingLattice::with_seed(shape, seed).unwrap();
        lat.set_coupling(coupling);
        lat.set_beta(beta);
        lat
    }

    #[test]
    fn test_construction() {
        let lat = IsingLattice::new(vec![4, 5, 3]).unwrap();
        assert_eq!(lat.n_spins(), 60);
        assert_eq!(lat.spins().len(), 60);
        assert!(lat.spins().iter().all(|&s| s == 1 || s == -1));
        assert_eq!(lat.accepted(), 0);
        assert_eq!(lat.rejected(), 0);
        assert_eq!(lat.coupling(), None);
        assert_eq!(lat.beta(), None);
        assert_eq!(lat.acceptance_ratio(), None);
    }

    #[test]
    fn test_rejects_malformed_shape() {
        assert!(matches!(
            IsingLattice::new(vec![]),
            Err(IsingError::InvalidShape(_))
        ));
        assert!(matches!(
            IsingLattice::with_seed(vec![3, 0], 1),
            Err(IsingError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_unconfigured_lattice_refuses_to_simulate() {
        let mut lat = IsingLattice::with_seed(vec![4, 4], 1).unwrap();
        assert_eq!(lat.sweep(), Err(IsingError::Unconfigured("coupling")));
        assert_eq!(lat.hamiltonian(), Err(IsingError::Unconfigured("coupling")));

        lat.set_coupling(1.0);
        assert_eq!(lat.propose_flip(0), Err(IsingError::Unconfigured("beta")));
        assert!(lat.hamiltonian().is_ok());
        assert_eq!(lat.attempts(), 0);

        lat.set_beta(0.4);
        assert!(lat.sweep().is_ok());
    }

    #[test]
    fn test_cold_start() {
        let mut lat = configured(vec![5, 5], 2, 1.0, 0.3);
        lat.sweep().unwrap();
        let attempts = lat.attempts();

        lat.cold_start();
        assert_eq!(lat.magnetization(), 1.0);
        let once = lat.spins().to_vec();
        lat.cold_start();
        assert_eq!(lat.spins(), once.as_slice());
        assert_eq!(lat.attempts(), attempts);
    }

    #[test]
    fn test_two_site_hamiltonian() {
        let mut lat = IsingLattice::with_seed(vec![2], 0).unwrap();
        lat.set_coupling(1.0);
        lat.cold_start();
        assert_eq!(lat.hamiltonian().unwrap(), -2.0);
        lat.flip_spin(1);
        assert_eq!(lat.hamiltonian().unwrap(), 2.0);
        assert_eq!(lat.magnetization(), 0.0);
    }

    #[test]
    fn test_hamiltonian_ignores_beta() {
        let mut lat = configured(vec![6, 6], 9, 1.5, 0.2);
        let h = lat.hamiltonian().unwrap();
        lat.set_beta(10.0);
        assert_eq!(lat.hamiltonian().unwrap(), h);
        assert_eq!(lat.energy_per_site().unwrap(), h / 36.0);
    }

    #[test]
    fn test_periodic_neighbors_1d() {
        let lat = IsingLattice::with_seed(vec![7], 0).unwrap();
        assert_eq!(lat.neighbor(6, 0, true), 0);
        assert_eq!(lat.neighbor(0, 0, false), 6);
    }

    #[test]
    fn test_index_round_trip() {
        let lat = IsingLattice::with_seed(vec![3, 2, 5], 0).unwrap();
        for i in 0..lat.n_spins() {
            assert_eq!(lat.index_of(&lat.coordinates_of(i)), i);
        }
    }

    #[test]
    fn test_counters_advance_by_site_count() {
        let mut lat = configured(vec![4, 6], 4, 1.0, 0.44);
        let n = 25u64;
        let mut prev = (0, 0);
        for _ in 0..n {
            lat.sweep().unwrap();
            assert!(lat.accepted() >= prev.0 && lat.rejected() >= prev.1);
            prev = (lat.accepted(), lat.rejected());
        }
        assert_eq!(lat.attempts(), n * 24);
        let ratio = lat.acceptance_ratio().unwrap();
        assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn test_magnetization_bounds() {
        let mut lat = configured(vec![8, 8], 21, 1.0, 0.2);
        for _ in 0..20 {
            lat.sweep().unwrap();
            let m = lat.magnetization();
            assert!((-1.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_zero_beta_accepts_every_proposal() {
        let mut lat = configured(vec![10, 10], 8, 1.0, 0.0);
        for _ in 0..50 {
            lat.sweep().unwrap();
        }
        assert_eq!(lat.acceptance_ratio(), Some(1.0));
    }

    #[test]
    fn test_large_beta_from_cold_start_freezes() {
        let mut lat = configured(vec![8, 8], 8, 1.0, 50.0);
        lat.cold_start();
        for _ in 0..20 {
            lat.sweep().unwrap();
        }
        assert_eq!(lat.accepted(), 0);
        assert_eq!(lat.magnetization(), 1.0);
    }

    #[test]
    fn test_antiferromagnet_accepts_aligned_flip() {
        // J < 0 favors anti-alignment, so a flip out of the all-up state is downhill.
        let mut lat = configured(vec![4], 3, -1.0, 5.0);
        lat.cold_start();
        assert_eq!(lat.propose_flip(0), Ok(true));
        assert_eq!(lat.spin(0), -1);
        assert_eq!(lat.acceptance_ratio(), Some(1.0));
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = configured(vec![6, 6], 99, 1.0, 0.44);
        let mut b = configured(vec![6, 6], 99, 1.0, 0.44);
        assert_eq!(a.spins(), b.spins());
        for _ in 0..10 {
            a.sweep().unwrap();
            b.sweep().unwrap();
        }
        assert_eq!(a.spins(), b.spins());
        assert_eq!(a.accepted(), b.accepted());
    }

    #[test]
    fn test_ordered_low_temperature_phase() {
        // Deep in the ordered phase of the 2D model a cold start stays magnetized.
        let mut lat = configured(vec![16, 16], 5, 1.0, 1.0);
        lat.cold_start();
        for _ in 0..200 {
            lat.sweep_ordered(SweepOrder::Checkerboard).unwrap();
        }
        assert!(lat.magnetization() > 0.9);
    }

    #[test]
    fn test_high_temperature_phase_disorders() {
        let mut lat = configured(vec![16, 16], 6, 1.0, 0.1);
        lat.cold_start();
        for _ in 0..500 {
            lat.sweep().unwrap();
        }
        assert!(lat.magnetization().abs() < 0.3);
    }
}
