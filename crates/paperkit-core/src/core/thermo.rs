use super::dos::DensityOfStates;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, PartialEq)]
pub enum ThermoError {
    #[error("Density of states is empty")]
    EmptyDos,
    #[error("Temperature grid is invalid: {0}")]
    InvalidGrid(String),
    #[error("Curves are sampled on different grids ({0} vs {1} points)")]
    GridMismatch(usize, usize),
}

/// Reduced temperatures `kT/ε` at which canonical averages are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    temperatures: Vec<f64>,
}

impl TemperatureGrid {
    /// `dT, 2dT, …, (bins-1)dT` with `dT = max_t / bins`, i.e. every grid
    /// point strictly below `max_t`.
    pub fn new(max_t: f64, bins: usize) -> Result<Self, ThermoError> {
        if !(max_t > 0.0) || bins < 2 {
            return Err(ThermoError::InvalidGrid(format!(
                "max temperature {} with {} bins",
                max_t, bins
            )));
        }
        let dt = max_t / bins as f64;
        let temperatures = (1..bins).map(|i| i as f64 * dt).collect();
        Ok(Self { temperatures })
    }

    pub fn from_values(temperatures: Vec<f64>) -> Result<Self, ThermoError> {
        if temperatures.iter().any(|&t| !(t > 0.0)) {
            return Err(ThermoError::InvalidGrid(
                "temperatures must be positive".to_string(),
            ));
        }
        Ok(Self { temperatures })
    }

    pub fn values(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }
}

/// Internal energy, heat capacity and configurational entropy on a
/// temperature grid (energies in ε, entropy and heat capacity in k).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Thermodynamics {
    pub temperatures: Vec<f64>,
    pub internal_energy: Vec<f64>,
    pub heat_capacity: Vec<f64>,
    pub entropy: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CanonicalPoint {
    u: f64,
    cv: f64,
    s: f64,
}

fn canonical_point(dos: &DensityOfStates, t: f64) -> CanonicalPoint {
    let boltzmann: Vec<f64> = dos
        .ln_dos
        .iter()
        .zip(&dos.energies)
        .map(|(ln_g, e)| ln_g - e / t)
        .collect();
    let shift = boltzmann
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let mut z = 0.0;
    let mut e_sum = 0.0;
    let mut e2_sum = 0.0;
    for (a, &e) in boltzmann.iter().zip(&dos.energies) {
        let w = (a - shift).exp();
        z += w;
        e_sum += e * w;
        e2_sum += e * e * w;
    }

    let u = e_sum / z;
    let cv = (e2_sum / z - u * u) / (t * t);
    let s = u / t + z.ln() + shift;
    CanonicalPoint { u, cv, s }
}

impl Thermodynamics {
    pub fn compute(dos: &DensityOfStates, grid: &TemperatureGrid) -> Result<Self, ThermoError> {
        if dos.is_empty() {
            return Err(ThermoError::EmptyDos);
        }

        #[cfg(not(feature = "parallel"))]
        let iterator = grid.values().iter();

        #[cfg(feature = "parallel")]
        let iterator = grid.values().par_iter();

        let points: Vec<CanonicalPoint> = iterator.map(|&t| canonical_point(dos, t)).collect();

        Ok(Self {
            temperatures: grid.values().to_vec(),
            internal_energy: points.iter().map(|p| p.u).collect(),
            heat_capacity: points.iter().map(|p| p.cv).collect(),
            entropy: points.iter().map(|p| p.s).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// Specific (per-particle) quantities.
    pub fn per_particle(&self, n: u32) -> Self {
        let n = f64::from(n.max(1));
        let scale = |v: &[f64]| v.iter().map(|x| x / n).collect();
        Self {
            temperatures: self.temperatures.clone(),
            internal_energy: scale(&self.internal_energy),
            heat_capacity: scale(&self.heat_capacity),
            entropy: scale(&self.entropy),
        }
    }

    /// Point-wise `self - reference`.
    pub fn difference(&self, reference: &Self) -> Result<Self, ThermoError> {
        if self.len() != reference.len() {
            return Err(ThermoError::GridMismatch(self.len(), reference.len()));
        }
        let sub = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(x, y)| x - y).collect();
        Ok(Self {
            temperatures: self.temperatures.clone(),
            internal_energy: sub(&self.internal_energy, &reference.internal_energy),
            heat_capacity: sub(&self.heat_capacity, &reference.heat_capacity),
            entropy: sub(&self.entropy, &reference.entropy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level(gap: f64, degeneracy: f64) -> DensityOfStates {
        DensityOfStates::new(vec![0.0, -gap], vec![degeneracy.ln(), 0.0])
    }

    #[test]
    fn grid_matches_half_open_range() {
        let grid = TemperatureGrid::new(1.4, 1000).unwrap();
        assert_eq!(grid.len(), 999);
        assert!((grid.values()[0] - 0.0014).abs() < 1e-15);
        assert!(*grid.values().last().unwrap() < 1.4);

        let small = TemperatureGrid::new(1.0, 4).unwrap();
        assert_eq!(small.values(), &[0.25, 0.5, 0.75]);
    }

    #[test]
    fn grid_rejects_degenerate_input() {
        assert!(TemperatureGrid::new(0.0, 10).is_err());
        assert!(TemperatureGrid::new(1.0, 1).is_err());
        assert!(TemperatureGrid::from_values(vec![0.5, -1.0]).is_err());
    }

    #[test]
    fn two_level_system_matches_closed_form() {
        // Ground state E=-1 (non-degenerate), excited state E=0 with degeneracy 3.
        let dos = two_level(1.0, 3.0);
        let grid = TemperatureGrid::from_values(vec![0.5, 1.0, 2.0]).unwrap();
        let thermo = Thermodynamics::compute(&dos, &grid).unwrap();

        for (i, &t) in grid.values().iter().enumerate() {
            let x = 3.0 * (-1.0 / t).exp();
            let z = 1.0 + x;
            let p_excited = x / z;
            let u = -(1.0 - p_excited);
            let cv = p_excited * (1.0 - p_excited) / (t * t);
            let s = u / t + (z.ln() + 1.0 / t);

            assert!((thermo.internal_energy[i] - u).abs() < 1e-12);
            assert!((thermo.heat_capacity[i] - cv).abs() < 1e-12);
            assert!((thermo.entropy[i] - s).abs() < 1e-12);
        }
    }

    #[test]
    fn high_temperature_entropy_approaches_log_of_state_count() {
        let dos = two_level(1.0, 3.0);
        let grid = TemperatureGrid::from_values(vec![1e6]).unwrap();
        let thermo = Thermodynamics::compute(&dos, &grid).unwrap();
        assert!((thermo.entropy[0] - 4f64.ln()).abs() < 1e-5);
    }

    #[test]
    fn large_ln_dos_values_do_not_overflow() {
        let dos = DensityOfStates::new(vec![0.0, -1.0, -2.0], vec![900.0, 850.0, 700.0]);
        let grid = TemperatureGrid::from_values(vec![0.1, 1.0]).unwrap();
        let thermo = Thermodynamics::compute(&dos, &grid).unwrap();
        assert!(thermo.internal_energy.iter().all(|u| u.is_finite()));
        assert!(thermo.entropy.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn empty_dos_is_rejected() {
        let grid = TemperatureGrid::from_values(vec![1.0]).unwrap();
        assert_eq!(
            Thermodynamics::compute(&DensityOfStates::default(), &grid),
            Err(ThermoError::EmptyDos)
        );
    }

    #[test]
    fn difference_and_per_particle_are_pointwise() {
        let grid = TemperatureGrid::from_values(vec![0.5, 1.0]).unwrap();
        let a = Thermodynamics::compute(&two_level(1.0, 3.0), &grid).unwrap();
        let b = Thermodynamics::compute(&two_level(1.0, 2.0), &grid).unwrap();

        let diff = a.per_particle(2).difference(&b.per_particle(2)).unwrap();
        for i in 0..2 {
            let expected = (a.internal_energy[i] - b.internal_energy[i]) / 2.0;
            assert!((diff.internal_energy[i] - expected).abs() < 1e-12);
        }

        let one_point = TemperatureGrid::from_values(vec![1.0]).unwrap();
        let short = Thermodynamics::compute(&two_level(1.0, 2.0), &one_point).unwrap();
        assert_eq!(a.difference(&short), Err(ThermoError::GridMismatch(2, 1)));
    }
}
