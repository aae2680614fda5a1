use crate::cohort::TransmissionParams;
use crate::error::SirError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

/// Parameters of a complete simulation run.
///
/// The defaults describe a moderate respiratory outbreak: 1000 people, 5 initial cases,
/// 90 days, a 50% chance of transmission per contact, 6 contacts per day, and 5 infectious days.
/// Any field missing from a JSON config file takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub population_size: usize,
    pub initial_infections: usize,
    pub simulation_days: u32,
    pub transmission_probability: f64,
    pub contacts_per_day: u32,
    pub infectious_duration_days: u32,
    /// Base seed of the cohort's random source. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            population_size: 1000,
            initial_infections: 5,
            simulation_days: 90,
            transmission_probability: 0.5,
            contacts_per_day: 6,
            infectious_duration_days: 5,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Checks every field, reporting the first one that is out of range.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` naming the offending field.
    pub fn validate(&self) -> Result<(), SirError> {
        if self.population_size == 0 {
            return Err(SirError::invalid_argument(
                "population_size must be positive",
            ));
        }
        if self.initial_infections == 0 || self.initial_infections > self.population_size {
            return Err(SirError::invalid_argument(format!(
                "initial_infections must be in 1..={}, got {}",
                self.population_size, self.initial_infections
            )));
        }
        if self.simulation_days == 0 {
            return Err(SirError::invalid_argument(
                "simulation_days must be positive",
            ));
        }
        self.transmission_params()?;
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if the probability or duration is out of range.
    pub fn transmission_params(&self) -> Result<TransmissionParams, SirError> {
        TransmissionParams::new(
            self.transmission_probability,
            self.contacts_per_day,
            self.infectious_duration_days,
        )
    }

    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns `SirError::JsonError` for malformed JSON (including negative values for
    /// counts) and `SirError::InvalidArgument` for values out of range.
    pub fn from_json_str(json: &str) -> Result<Self, SirError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `SirError::IoError` if the file cannot be read, otherwise as `from_json_str`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SirError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Display for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Population: {}, Initial Infections: {}, Days: {}, Infection Prob: {:.2}, \
             Contacts/Day: {}, Duration: {} days",
            self.population_size,
            self.initial_infections,
            self.simulation_days,
            self.transmission_probability,
            self.contacts_per_day,
            self.infectious_duration_days
        )
    }
}
