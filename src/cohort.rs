/*!

A closed population of [`Individual`]s advanced one day at a time.

Each day-step evaluates transmission against the state at the start of the day, then progresses
existing infections, then applies the infections staged during transmission. Someone infected
today neither makes contacts nor progresses until tomorrow.

Random draws happen in a fixed order so that seeded runs are reproducible. For each member that
is infected at the start of the day, in ascending index order, and for each of its contact slots:

 1. one `random_range(0..population_size)` draw chooses the contact,
 2. one `random::<f64>()` draw tests transmission, only if the contact is susceptible.

A population with fewer than two members makes no contacts and no draws.
`infect_random_individual` makes exactly one `random_range(0..population_size)` draw.

*/

use crate::error::SirError;
use crate::individual::{InfectionStatus, Individual};
use crate::log::{debug, trace};
use crate::random::RandomSource;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

const DEFAULT_INFECTIOUS_DURATION: NonZeroU32 = NonZeroU32::new(5).unwrap();

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct IndividualId(pub(crate) usize);

impl IndividualId {
    #[must_use]
    pub fn new(index: usize) -> Self {
        IndividualId(index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Validated transmission parameters of a cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionParams {
    transmission_probability: f64,
    contacts_per_infectious_per_day: u32,
    infectious_duration_days: NonZeroU32,
}

impl TransmissionParams {
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if the probability is not in `[0, 1]` or the
    /// duration is zero.
    pub fn new(
        transmission_probability: f64,
        contacts_per_infectious_per_day: u32,
        infectious_duration_days: u32,
    ) -> Result<Self, SirError> {
        // Written so that NaN fails the check.
        if !(0.0..=1.0).contains(&transmission_probability) {
            return Err(SirError::invalid_argument(format!(
                "transmission probability must be in [0, 1], got {transmission_probability}"
            )));
        }
        let infectious_duration_days = NonZeroU32::new(infectious_duration_days)
            .ok_or_else(|| SirError::invalid_argument("infectious duration must be positive"))?;

        Ok(TransmissionParams {
            transmission_probability,
            contacts_per_infectious_per_day,
            infectious_duration_days,
        })
    }

    #[must_use]
    pub fn transmission_probability(&self) -> f64 {
        self.transmission_probability
    }

    #[must_use]
    pub fn contacts_per_infectious_per_day(&self) -> u32 {
        self.contacts_per_infectious_per_day
    }

    #[must_use]
    pub fn infectious_duration_days(&self) -> u32 {
        self.infectious_duration_days.get()
    }
}

impl Default for TransmissionParams {
    fn default() -> Self {
        TransmissionParams {
            transmission_probability: 0.5,
            contacts_per_infectious_per_day: 6,
            infectious_duration_days: DEFAULT_INFECTIOUS_DURATION,
        }
    }
}

/// Number of individuals in each compartment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompartmentCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl CompartmentCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }

    /// Fraction of the population that has ever been infected.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn attack_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.susceptible) as f64 / total as f64
    }

    fn tally<'a>(members: impl IntoIterator<Item = &'a Individual>) -> Self {
        let mut counts = CompartmentCounts::default();
        for individual in members {
            match individual.status() {
                InfectionStatus::Susceptible => counts.susceptible += 1,
                InfectionStatus::Infected => counts.infected += 1,
                InfectionStatus::Recovered => counts.recovered += 1,
            }
        }
        counts
    }
}

/// A fixed-size population together with its transmission parameters and random source.
pub struct Cohort {
    members: Vec<Individual>,
    current_day: u32,
    params: TransmissionParams,
    counts: CompartmentCounts,
    random: RandomSource,
}

impl Cohort {
    /// Creates a cohort of `size` susceptible individuals whose random source is seeded from
    /// the operating system. Use `with_seed` for reproducible runs.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if `size` is zero.
    pub fn new(size: usize) -> Result<Self, SirError> {
        Self::with_random_source(size, RandomSource::from_entropy())
    }

    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if `size` is zero.
    pub fn with_seed(size: usize, seed: u64) -> Result<Self, SirError> {
        Self::with_random_source(size, RandomSource::with_seed(seed))
    }

    fn with_random_source(size: usize, random: RandomSource) -> Result<Self, SirError> {
        if size == 0 {
            return Err(SirError::invalid_argument(
                "population size must be positive",
            ));
        }
        trace!("creating cohort of {size} with base seed {}", random.base_seed());

        Ok(Cohort {
            members: vec![Individual::new(); size],
            current_day: 0,
            params: TransmissionParams::default(),
            counts: CompartmentCounts {
                susceptible: size,
                infected: 0,
                recovered: 0,
            },
            random,
        })
    }

    /// Validates and installs new transmission parameters. Individuals who are already
    /// infected keep their remaining duration.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if the probability is not in `[0, 1]` or the
    /// duration is zero. The previous parameters are kept.
    pub fn configure(
        &mut self,
        transmission_probability: f64,
        contacts_per_infectious_per_day: u32,
        infectious_duration_days: u32,
    ) -> Result<(), SirError> {
        let params = TransmissionParams::new(
            transmission_probability,
            contacts_per_infectious_per_day,
            infectious_duration_days,
        )?;
        self.set_params(params);
        Ok(())
    }

    pub fn set_params(&mut self, params: TransmissionParams) {
        debug!("day {}: transmission parameters set to {params:?}", self.current_day);
        self.params = params;
    }

    /// Picks one member uniformly at random, including members who are not susceptible, and
    /// tries to infect them. Picking someone already infected or recovered wastes the call.
    pub fn infect_random_individual(&mut self) -> IndividualId {
        let index: usize = self.random.sample_range(0..self.members.len());
        let infected = self.members[index].infect_for(self.params.infectious_duration_days);
        if infected {
            trace!("seeded infection in individual {index}");
        } else {
            trace!("random seeding picked individual {index}, who is not susceptible");
        }
        self.recount();
        IndividualId(index)
    }

    /// Infects the given member with the configured duration if they are susceptible.
    ///
    /// # Errors
    ///
    /// Returns `SirError::InvalidArgument` if `id` is not a member of this cohort.
    pub fn infect_individual(&mut self, id: IndividualId) -> Result<bool, SirError> {
        let duration = self.params.infectious_duration_days;
        let population_size = self.members.len();
        let individual = self.members.get_mut(id.0).ok_or_else(|| {
            SirError::invalid_argument(format!(
                "individual {} is outside a cohort of {population_size}",
                id.0
            ))
        })?;
        let infected = individual.infect_for(duration);
        self.recount();
        Ok(infected)
    }

    /// Runs one day-step: transmission, then progression, then the staged infections.
    pub fn advance_one_day(&mut self) {
        let newly_infected = self.simulate_transmission();

        let mut recoveries = 0usize;
        for individual in &mut self.members {
            if individual.advance_one_day() {
                recoveries += 1;
            }
        }

        for id in &newly_infected {
            self.members[id.0].infect_for(self.params.infectious_duration_days);
        }

        self.current_day += 1;
        self.recount();
        debug!(
            "day {}: {} new infections, {} recoveries, counts {:?}",
            self.current_day,
            newly_infected.len(),
            recoveries,
            self.counts
        );
    }

    /// Collects everyone infected by today's contacts without changing anyone's status.
    fn simulate_transmission(&mut self) -> FxHashSet<IndividualId> {
        let mut newly_infected = FxHashSet::default();
        let population_size = self.members.len();
        if population_size < 2 {
            return newly_infected;
        }

        let probability = self.params.transmission_probability;
        for source in 0..population_size {
            if !self.members[source].is_infected() {
                continue;
            }
            for _ in 0..self.params.contacts_per_infectious_per_day {
                let contact: usize = self.random.sample_range(0..population_size);
                if self.members[contact].is_susceptible()
                    && self.random.sample_unit() < probability
                {
                    newly_infected.insert(IndividualId(contact));
                }
            }
        }
        newly_infected
    }

    fn recount(&mut self) {
        self.counts = CompartmentCounts::tally(&self.members);
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    #[must_use]
    pub fn counts(&self) -> CompartmentCounts {
        self.counts
    }

    #[must_use]
    pub fn susceptible_count(&self) -> usize {
        self.counts.susceptible
    }

    #[must_use]
    pub fn infected_count(&self) -> usize {
        self.counts.infected
    }

    #[must_use]
    pub fn recovered_count(&self) -> usize {
        self.counts.recovered
    }

    #[must_use]
    pub fn params(&self) -> TransmissionParams {
        self.params
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.random.base_seed()
    }

    #[must_use]
    pub fn individual(&self, id: IndividualId) -> Option<&Individual> {
        self.members.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndividualId, &Individual)> {
        self.members
            .iter()
            .enumerate()
            .map(|(index, individual)| (IndividualId(index), individual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_counts(cohort: &Cohort, susceptible: usize, infected: usize, recovered: usize) {
        assert_eq!(
            cohort.counts(),
            CompartmentCounts {
                susceptible,
                infected,
                recovered
            },
            "unexpected counts on day {}",
            cohort.current_day()
        );
    }

    #[test]
    fn new_cohort_is_susceptible() {
        let cohort = Cohort::with_seed(25, 42).unwrap();
        assert_eq!(cohort.population_size(), 25);
        assert_eq!(cohort.current_day(), 0);
        assert_counts(&cohort, 25, 0, 0);
        assert!(cohort.iter().all(|(_, individual)| individual.is_susceptible()));
    }

    #[test]
    fn empty_cohort_fails() {
        assert!(matches!(
            Cohort::with_seed(0, 42),
            Err(SirError::InvalidArgument(_))
        ));
        assert!(matches!(Cohort::new(0), Err(SirError::InvalidArgument(_))));
    }

    #[test]
    fn configure_rejects_bad_values() {
        let mut cohort = Cohort::with_seed(10, 42).unwrap();
        cohort.configure(0.25, 3, 4).unwrap();
        let before = cohort.params();

        assert!(matches!(
            cohort.configure(1.5, 3, 4),
            Err(SirError::InvalidArgument(_))
        ));
        assert!(matches!(
            cohort.configure(-0.1, 3, 4),
            Err(SirError::InvalidArgument(_))
        ));
        assert!(matches!(
            cohort.configure(f64::NAN, 3, 4),
            Err(SirError::InvalidArgument(_))
        ));
        assert!(matches!(
            cohort.configure(0.5, 3, 0),
            Err(SirError::InvalidArgument(_))
        ));
        assert_eq!(cohort.params(), before);
    }

    #[test]
    fn configure_accepts_boundaries() {
        let mut cohort = Cohort::with_seed(10, 42).unwrap();
        cohort.configure(0.0, 0, 1).unwrap();
        cohort.configure(1.0, 100, 1).unwrap();
        assert_eq!(cohort.params().transmission_probability(), 1.0);
        assert_eq!(cohort.params().contacts_per_infectious_per_day(), 100);
        assert_eq!(cohort.params().infectious_duration_days(), 1);
    }

    #[test]
    fn infect_individual_out_of_range() {
        let mut cohort = Cohort::with_seed(3, 42).unwrap();
        assert!(matches!(
            cohort.infect_individual(IndividualId::new(3)),
            Err(SirError::InvalidArgument(_))
        ));
        assert_counts(&cohort, 3, 0, 0);
    }

    #[test]
    fn infect_random_individual_updates_counts() {
        let mut cohort = Cohort::with_seed(10, 42).unwrap();
        let id = cohort.infect_random_individual();
        assert!(id.index() < 10);
        assert!(cohort.individual(id).unwrap().is_infected());
        assert_counts(&cohort, 9, 1, 0);
    }

    #[test]
    fn single_member_cohort_only_progresses() {
        let mut cohort = Cohort::with_seed(1, 42).unwrap();
        cohort.configure(1.0, 10, 2).unwrap();
        assert_eq!(cohort.infect_random_individual(), IndividualId::new(0));
        cohort.advance_one_day();
        assert_counts(&cohort, 0, 1, 0);
        cohort.advance_one_day();
        assert_counts(&cohort, 0, 0, 1);
    }

    #[test]
    fn seeding_can_be_wasted() {
        let mut cohort = Cohort::with_seed(2, 42).unwrap();
        cohort.configure(0.0, 0, 5).unwrap();
        for _ in 0..20 {
            cohort.infect_random_individual();
        }
        // Twenty draws over two members: every call after both are infected is a no-op.
        assert_counts(&cohort, 0, 2, 0);
        assert!(cohort.iter().all(|(_, individual)| individual.remaining_infectious_days() == 5));
    }

    #[test]
    fn reconfigure_does_not_touch_existing_infections() {
        let mut cohort = Cohort::with_seed(10, 42).unwrap();
        cohort.configure(0.0, 0, 3).unwrap();
        cohort.infect_individual(IndividualId::new(0)).unwrap();
        cohort.configure(0.0, 0, 10).unwrap();
        assert_eq!(
            cohort
                .individual(IndividualId::new(0))
                .unwrap()
                .remaining_infectious_days(),
            3
        );
        cohort.infect_individual(IndividualId::new(1)).unwrap();
        assert_eq!(
            cohort
                .individual(IndividualId::new(1))
                .unwrap()
                .remaining_infectious_days(),
            10
        );
    }

    #[test]
    fn newly_infected_do_not_progress_same_day() {
        let mut cohort = Cohort::with_seed(2, 42).unwrap();
        cohort.configure(1.0, 200, 1).unwrap();
        cohort.infect_individual(IndividualId::new(0)).unwrap();

        cohort.advance_one_day();
        // Individual 0 recovers today; individual 1 was infected today and has its full duration.
        let first = cohort.individual(IndividualId::new(0)).unwrap();
        let second = cohort.individual(IndividualId::new(1)).unwrap();
        assert!(first.is_recovered());
        assert!(second.is_infected());
        assert_eq!(second.remaining_infectious_days(), 1);
        assert_counts(&cohort, 0, 1, 1);

        cohort.advance_one_day();
        assert_counts(&cohort, 0, 0, 2);
    }

    #[test]
    fn zero_contacts_never_transmit() {
        let mut cohort = Cohort::with_seed(50, 7).unwrap();
        cohort.configure(1.0, 0, 4).unwrap();
        cohort.infect_individual(IndividualId::new(10)).unwrap();
        for _ in 0..4 {
            cohort.advance_one_day();
            assert_eq!(cohort.susceptible_count(), 49);
        }
        assert_counts(&cohort, 49, 0, 1);
    }

    #[test]
    fn seeded_cohorts_are_reproducible() {
        let run = |seed: u64| {
            let mut cohort = Cohort::with_seed(200, seed).unwrap();
            cohort.configure(0.3, 4, 5).unwrap();
            for _ in 0..3 {
                cohort.infect_random_individual();
            }
            let mut history = vec![cohort.counts()];
            for _ in 0..30 {
                cohort.advance_one_day();
                history.push(cohort.counts());
            }
            history
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn attack_rate() {
        let counts = CompartmentCounts {
            susceptible: 25,
            infected: 5,
            recovered: 70,
        };
        assert_eq!(counts.total(), 100);
        assert!((counts.attack_rate() - 0.75).abs() < 1e-12);
        assert_eq!(CompartmentCounts::default().attack_rate(), 0.0);
    }
}
