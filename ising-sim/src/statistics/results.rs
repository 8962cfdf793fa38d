use serde::Serialize;

/// Observables at one inverse temperature, averaged over the recorded samples.
///
/// `m` is the magnetization per spin and `e` the energy per spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub beta: f64,
    /// `1 / beta`; infinite at `beta = 0`.
    pub temperature: f64,
    /// ⟨m⟩.
    pub magnetization: f64,
    /// ⟨|m|⟩.
    pub abs_magnetization: f64,
    /// ⟨m²⟩.
    pub magnetization2: f64,
    /// ⟨m⁴⟩.
    pub magnetization4: f64,
    /// ⟨e⟩.
    pub energy: f64,
    /// ⟨e²⟩.
    pub energy2: f64,
    /// `beta * N * (⟨m²⟩ - ⟨|m|⟩²)`.
    pub susceptibility: f64,
    /// `beta² * N * (⟨e²⟩ - ⟨e⟩²)`.
    pub specific_heat: f64,
    /// `1 - ⟨m⁴⟩ / (3 ⟨m²⟩²)`.
    pub binder_cumulant: f64,
    /// Accepted fraction of the flips attempted while sampling.
    pub acceptance_ratio: Option<f64>,
    /// Integrated autocorrelation time of m, in samples.
    pub magnetization_tau: Option<f64>,
    pub n_samples: usize,
}

pub fn susceptibility(beta: f64, n_spins: usize, m2: f64, m_abs: f64) -> f64 {
    beta * n_spins as f64 * (m2 - m_abs * m_abs)
}

pub fn specific_heat(beta: f64, n_spins: usize, e: f64, e2: f64) -> f64 {
    beta * beta * n_spins as f64 * (e2 - e * e)
}

pub fn binder_cumulant(m2: f64, m4: f64) -> f64 {
    if m2 <= 0.0 {
        return 0.0;
    }
    1.0 - m4 / (3.0 * m2 * m2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_limits() {
        // Perfectly ordered: |m| = 1 in every sample.
        assert_eq!(susceptibility(0.5, 100, 1.0, 1.0), 0.0);
        assert!((binder_cumulant(1.0, 1.0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(binder_cumulant(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_fluctuation_formulas() {
        assert!((susceptibility(0.5, 16, 0.5, 0.5) - 2.0).abs() < 1e-12);
        assert!((specific_heat(2.0, 10, -1.0, 1.25) - 10.0).abs() < 1e-12);
    }
}
