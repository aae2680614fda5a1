use crate::error::SirError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// The compartment an individual currently belongs to.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum InfectionStatus {
    Susceptible,
    Infected,
    Recovered,
}

/// A single member of a cohort.
///
/// `remaining_infectious_days` is non-zero exactly when the individual is `Infected`. Only
/// `infect` can leave `Susceptible` and only `advance_one_day` can leave `Infected`;
/// `Recovered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Individual {
    status: InfectionStatus,
    remaining_infectious_days: u32,
}

impl Default for Individual {
    fn default() -> Self {
        Individual {
            status: InfectionStatus::Susceptible,
            remaining_infectious_days: 0,
        }
    }
}

impl Individual {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Infects the individual for `duration` days if, and only if, they are susceptible.
    ///
    /// Returns `Ok(true)` if the individual became infected and `Ok(false)` if they were
    /// already infected or recovered, in which case nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if `duration` is zero.
    pub fn infect(&mut self, duration: u32) -> Result<bool, SirError> {
        let duration = NonZeroU32::new(duration)
            .ok_or_else(|| SirError::invalid_argument("infection duration must be positive"))?;
        Ok(self.infect_for(duration))
    }

    pub(crate) fn infect_for(&mut self, duration: NonZeroU32) -> bool {
        match self.status {
            InfectionStatus::Susceptible => {
                self.status = InfectionStatus::Infected;
                self.remaining_infectious_days = duration.get();
                true
            }
            InfectionStatus::Infected | InfectionStatus::Recovered => false,
        }
    }

    /// Moves an infection one day closer to recovery. Returns `true` if the individual
    /// recovered on this call.
    pub fn advance_one_day(&mut self) -> bool {
        if self.status != InfectionStatus::Infected {
            return false;
        }
        self.remaining_infectious_days = self.remaining_infectious_days.saturating_sub(1);
        if self.remaining_infectious_days == 0 {
            self.status = InfectionStatus::Recovered;
            return true;
        }
        false
    }

    #[must_use]
    #[inline(always)]
    pub fn status(&self) -> InfectionStatus {
        self.status
    }

    #[must_use]
    #[inline(always)]
    pub fn remaining_infectious_days(&self) -> u32 {
        self.remaining_infectious_days
    }

    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        self.status == InfectionStatus::Susceptible
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.status == InfectionStatus::Infected
    }

    #[must_use]
    pub fn is_recovered(&self) -> bool {
        self.status == InfectionStatus::Recovered
    }
}
