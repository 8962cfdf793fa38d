use std::sync::atomic::AtomicBool;
use std::time::Instant;

use ising_sim::{run_beta_sweep, IsingLattice, SimConfig, SweepOrder};

const L: usize = 64;
const N_BETAS: usize = 16;
const N_SWEEPS: usize = 200;

fn main() {
    let mut lattice = IsingLattice::with_seed(vec![L, L], 42).unwrap();
    lattice.set_coupling(1.0);
    lattice.set_beta(0.44);

    println!("Lattice: {L}x{L}  |  Sweeps: {N_SWEEPS}");
    println!("{}", "-".repeat(70));

    for order in [SweepOrder::Sequential, SweepOrder::Checkerboard] {
        let t0 = Instant::now();
        for _ in 0..N_SWEEPS {
            lattice.sweep_ordered(order).unwrap();
        }
        let elapsed = t0.elapsed().as_secs_f64();
        let per_flip = elapsed / (N_SWEEPS * L * L) as f64 * 1e9;
        println!(
            "{order:?}: {:.3} ms/sweep  |  {per_flip:.2} ns/flip",
            elapsed / N_SWEEPS as f64 * 1000.0
        );
    }

    let betas: Vec<f64> = (0..N_BETAS)
        .map(|i| 0.3 + 0.3 * i as f64 / (N_BETAS - 1) as f64)
        .collect();
    let mut config = SimConfig::new(1.0, betas);
    config.anneal = false;
    config.thermalization_sweeps = 50;
    config.n_samples = 15;
    config.sweeps_per_sample = 10;
    config.seed = Some(42);

    let interrupted = AtomicBool::new(false);
    let t0 = Instant::now();
    let points = run_beta_sweep(&[L, L], &config, &interrupted, &|| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "Independent sweep over {} betas: {:.3} s",
        points.len(),
        elapsed
    );
}
