use std::io::Write;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod report;

use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.to_config()?;
    debug!(?config, shape = ?cli.shape, "parsed configuration");

    let total_sweeps = (config.betas.len() * config.sweeps_per_point()) as u64;
    let pb = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total_sweeps)
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message("sweeps");

    let interrupted = AtomicBool::new(false);
    let points = ising_sim::run_beta_sweep(&cli.shape, &config, &interrupted, &|| pb.inc(1))
        .context("simulation failed")?;
    pb.finish_and_clear();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::write_json(&mut out, &points)?;
    } else {
        report::write_table(&mut out, &points)?;
    }
    out.flush()?;
    Ok(())
}
