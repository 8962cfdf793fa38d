use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};
use validator::Validate;

use crate::config::{SimConfig, SweepOrder};
use crate::error::{IsingError, Result};
use crate::spins::IsingLattice;
use crate::statistics::results::{binder_cumulant, specific_heat, susceptibility};
use crate::statistics::{sokal_tau, AutocorrAccum, Statistics, TemperaturePoint};

#[inline]
fn advance(
    lattice: &mut IsingLattice,
    order: SweepOrder,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<()> {
    if interrupted.load(Ordering::Relaxed) {
        return Err(IsingError::Interrupted);
    }
    on_sweep();
    lattice.sweep_ordered(order)
}

/// Thermalize and sample one lattice at inverse temperature `beta`.
///
/// Sets J and beta on the lattice, runs `thermalization_sweeps`, then records
/// observables after every block of `sweeps_per_sample` sweeps. The spin
/// state is left where the run ended, so annealing callers can continue from it.
///
/// `on_sweep` is called once per sweep (useful for progress bars).
pub fn run_temperature(
    lattice: &mut IsingLattice,
    beta: f64,
    config: &SimConfig,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<TemperaturePoint> {
    lattice.set_coupling(config.coupling);
    lattice.set_beta(beta);
    let order = config.sweep_order;

    for _ in 0..config.thermalization_sweeps {
        advance(lattice, order, interrupted, on_sweep)?;
    }

    let accepted_before = lattice.accepted();
    let attempts_before = lattice.attempts();

    let mut mags_stat = Statistics::new(1);
    let mut abs_mags_stat = Statistics::new(1);
    let mut mags2_stat = Statistics::new(2);
    let mut mags4_stat = Statistics::new(4);
    let mut energies_stat = Statistics::new(1);
    let mut energies2_stat = Statistics::new(2);

    let mut m_accum = config
        .autocorrelation_max_lag
        .map(|k| AutocorrAccum::new(k.min(config.n_samples / 4).max(1)));

    for _ in 0..config.n_samples {
        for _ in 0..config.sweeps_per_sample {
            advance(lattice, order, interrupted, on_sweep)?;
        }
        let m = lattice.magnetization();
        let e = lattice.energy_per_site()?;
        mags_stat.update(m);
        abs_mags_stat.update(m.abs());
        mags2_stat.update(m);
        mags4_stat.update(m);
        energies_stat.update(e);
        energies2_stat.update(e);
        if let Some(ref mut acc) = m_accum {
            acc.push(m);
        }
    }

    let attempts = lattice.attempts() - attempts_before;
    let acceptance_ratio = if attempts > 0 {
        Some((lattice.accepted() - accepted_before) as f64 / attempts as f64)
    } else {
        None
    };

    let n_spins = lattice.n_spins();
    let m_abs = abs_mags_stat.average();
    let m2 = mags2_stat.average();
    let m4 = mags4_stat.average();
    let e = energies_stat.average();
    let e2 = energies2_stat.average();

    let point = TemperaturePoint {
        beta,
        temperature: 1.0 / beta,
        magnetization: mags_stat.average(),
        abs_magnetization: m_abs,
        magnetization2: m2,
        magnetization4: m4,
        energy: e,
        energy2: e2,
        susceptibility: susceptibility(beta, n_spins, m2, m_abs),
        specific_heat: specific_heat(beta, n_spins, e, e2),
        binder_cumulant: binder_cumulant(m2, m4),
        acceptance_ratio,
        magnetization_tau: m_accum.map(|acc| sokal_tau(&acc.finish())),
        n_samples: config.n_samples,
    };
    debug!(
        beta,
        magnetization = point.magnetization,
        energy = point.energy,
        acceptance = ?point.acceptance_ratio,
        "temperature point finished"
    );
    Ok(point)
}

/// Run every beta in `config.betas` on a lattice of the given shape.
///
/// With `anneal` a single lattice is carried through the ladder in order.
/// Otherwise each beta gets a fresh lattice seeded `seed + i` and the points
/// run in parallel over rayon, unless `sequential` is set. Results keep the
/// order of `config.betas`.
pub fn run_beta_sweep(
    shape: &[usize],
    config: &SimConfig,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<Vec<TemperaturePoint>> {
    config.validate()?;
    if config.sweep_order == SweepOrder::Checkerboard && shape.iter().any(|l| l % 2 != 0) {
        return Err(IsingError::InvalidShape(format!(
            "checkerboard order needs every axis to be even, got {shape:?}"
        )));
    }

    info!(
        ?shape,
        n_betas = config.betas.len(),
        sweeps_per_point = config.sweeps_per_point(),
        anneal = config.anneal,
        "starting beta sweep"
    );

    let fresh_lattice = |offset: u64| -> Result<IsingLattice> {
        let mut lattice = match config.seed {
            Some(seed) => IsingLattice::with_seed(shape.to_vec(), seed.wrapping_add(offset))?,
            None => IsingLattice::new(shape.to_vec())?,
        };
        if config.cold_start {
            lattice.cold_start();
        }
        Ok(lattice)
    };

    let points = if config.anneal {
        let mut lattice = fresh_lattice(0)?;
        config
            .betas
            .iter()
            .map(|&beta| run_temperature(&mut lattice, beta, config, interrupted, on_sweep))
            .collect::<Result<Vec<_>>>()?
    } else {
        let run_point = |(i, &beta): (usize, &f64)| -> Result<TemperaturePoint> {
            let mut lattice = fresh_lattice(i as u64)?;
            run_temperature(&mut lattice, beta, config, interrupted, on_sweep)
        };
        if config.sequential {
            config
                .betas
                .iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>>>()?
        } else {
            config
                .betas
                .par_iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>>>()?
        }
    };

    info!(n_points = points.len(), "beta sweep finished");
    Ok(points)
}
