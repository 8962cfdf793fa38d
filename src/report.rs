use std::io::Write;

use anyhow::Result;
use ising_sim::TemperaturePoint;

/// One line per temperature: `T: <m>` followed by the remaining observables.
pub fn write_table<W: Write>(out: &mut W, points: &[TemperaturePoint]) -> Result<()> {
    writeln!(
        out,
        "# T: m\t|m|\te\tchi\tC\tU4\tacceptance\ttau_m"
    )?;
    for p in points {
        let acceptance = p
            .acceptance_ratio
            .map_or_else(|| "-".to_string(), |a| format!("{a:.4}"));
        let tau = p
            .magnetization_tau
            .map_or_else(|| "-".to_string(), |t| format!("{t:.2}"));
        writeln!(
            out,
            "{}: {}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
            p.temperature,
            p.magnetization,
            p.abs_magnetization,
            p.energy,
            p.susceptibility,
            p.specific_heat,
            p.binder_cumulant,
            acceptance,
            tau,
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, points: &[TemperaturePoint]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, points)?;
    writeln!(out)?;
    Ok(())
}
