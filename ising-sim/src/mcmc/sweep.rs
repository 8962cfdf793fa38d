use crate::config::SweepOrder;
use crate::error::{IsingError, Result};
use crate::geometry::Lattice;
use crate::rng::RandomSource;
use crate::spins::energy::local_field;

/// Accepted and rejected flip proposals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipTally {
    pub accepted: u64,
    pub rejected: u64,
}

impl FlipTally {
    #[inline]
    fn record(&mut self, accepted: bool) {
        if accepted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }
}

/// Metropolis decision for site `i`, flipping it in place when accepted.
///
/// `coupling_beta` is `J * beta`. Flipping `s_i` changes the energy
/// `-J * sum s_i s_j` by `2 J s_i h`, so the acceptance probability is
/// `min(1, exp(-2 J beta s_i h))`.
#[inline]
pub fn metropolis_step(
    lattice: &Lattice,
    spins: &mut [i8],
    coupling_beta: f64,
    rng: &mut RandomSource,
    i: usize,
) -> bool {
    let si = spins[i] as f64;
    let h = local_field(lattice, spins, i) as f64;
    let p = (-2.0 * coupling_beta * si * h).exp().min(1.0);
    if p > rng.uniform() {
        spins[i] = -spins[i];
        true
    } else {
        false
    }
}

/// One Metropolis attempt at every site, updating spins in place.
///
/// With [`SweepOrder::Sequential`] sites are visited in index order, so a
/// site sees flips made earlier in the same sweep.
#[cfg_attr(feature = "profile", inline(never))]
pub fn metropolis_sweep(
    lattice: &Lattice,
    spins: &mut [i8],
    coupling_beta: f64,
    rng: &mut RandomSource,
    order: SweepOrder,
) -> Result<FlipTally> {
    let mut tally = FlipTally::default();
    match order {
        SweepOrder::Sequential => {
            for i in 0..lattice.n_spins {
                tally.record(metropolis_step(lattice, spins, coupling_beta, rng, i));
            }
        }
        SweepOrder::Checkerboard => {
            let sites = lattice.checkerboard_order().ok_or_else(|| {
                IsingError::InvalidShape(format!(
                    "checkerboard order needs every axis to be even, got {:?}",
                    lattice.shape
                ))
            })?;
            for &i in sites {
                tally.record(metropolis_step(lattice, spins, coupling_beta, rng, i as usize));
            }
        }
    }
    Ok(tally)
}
