use crate::cohort::{Cohort, CompartmentCounts};
use crate::config::SimulationConfig;
use crate::error::SirError;
use crate::log::{info, warn};
use crate::report::{DailyStats, ReportSink};
use std::fmt::{self, Display};

/// Drives a cohort through a whole run described by a `SimulationConfig`.
pub struct Simulation {
    config: SimulationConfig,
    cohort: Cohort,
}

/// The outcome of `Simulation::run`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub population_size: usize,
    pub days_simulated: u32,
    /// The day on which the last infection ended, if that happened within the day budget.
    pub epidemic_end_day: Option<u32>,
    pub final_counts: CompartmentCounts,
}

impl SimulationSummary {
    #[must_use]
    pub fn attack_rate(&self) -> f64 {
        self.final_counts.attack_rate()
    }

    #[must_use]
    pub fn total_affected(&self) -> usize {
        self.population_size - self.final_counts.susceptible
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(count: usize, population: usize) -> f64 {
    100.0 * count as f64 / population as f64
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.population_size;
        if let Some(day) = self.epidemic_end_day {
            writeln!(f, "Epidemic ended on day {day}")?;
        }
        writeln!(
            f,
            "Susceptible: {} ({:.1}%)",
            self.final_counts.susceptible,
            percent(self.final_counts.susceptible, n)
        )?;
        writeln!(
            f,
            "Recovered: {} ({:.1}%)",
            self.final_counts.recovered,
            percent(self.final_counts.recovered, n)
        )?;
        writeln!(
            f,
            "Total Affected: {} ({:.1}%)",
            self.total_affected(),
            percent(self.total_affected(), n)
        )?;
        write!(f, "Attack Rate: {:.1}%", 100.0 * self.attack_rate())
    }
}

impl Simulation {
    /// Validates `config` and builds a configured cohort. Without a seed in the config, the
    /// cohort's seed comes from the OS and is logged so the run can be replayed.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if the config is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, SirError> {
        config.validate()?;
        let params = config.transmission_params()?;
        let mut cohort = match config.seed {
            Some(seed) => Cohort::with_seed(config.population_size, seed)?,
            None => Cohort::new(config.population_size)?,
        };
        cohort.set_params(params);
        info!("simulation configured: {config} (seed {})", cohort.base_seed());

        Ok(Simulation { config, cohort })
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn cohort(&self) -> &Cohort {
        &self.cohort
    }

    /// Seeds the initial infections, then advances day by day until the day budget is spent
    /// or nobody is infected, sending each day's counts to `sink`. A simulation runs once;
    /// build a new one from the same config to replay it.
    ///
    /// # Errors
    ///
    /// Returns any error produced by `sink`.
    pub fn run(mut self, sink: &mut dyn ReportSink) -> Result<SimulationSummary, SirError> {
        for _ in 0..self.config.initial_infections {
            self.cohort.infect_random_individual();
        }
        let seeded = self.cohort.infected_count();
        if seeded < self.config.initial_infections {
            warn!(
                "requested {} initial infections but random seeding infected {seeded}",
                self.config.initial_infections
            );
        }
        sink.record(&DailyStats::from_cohort(&self.cohort))?;

        let mut epidemic_end_day = None;
        for _ in 0..self.config.simulation_days {
            self.cohort.advance_one_day();
            sink.record(&DailyStats::from_cohort(&self.cohort))?;

            if self.cohort.infected_count() == 0 {
                let day = self.cohort.current_day();
                info!("epidemic ended on day {day}");
                epidemic_end_day = Some(day);
                break;
            }
        }
        sink.finish()?;

        let summary = SimulationSummary {
            population_size: self.cohort.population_size(),
            days_simulated: self.cohort.current_day(),
            epidemic_end_day,
            final_counts: self.cohort.counts(),
        };
        info!(
            "simulation finished after {} days, attack rate {:.3}",
            summary.days_simulated,
            summary.attack_rate()
        );
        Ok(summary)
    }
}
