/*!

A discrete-time stochastic SIR model of a closed population.

A [`Cohort`] owns a fixed number of [`Individual`]s, each of which is susceptible, infected, or
recovered. Every call to [`Cohort::advance_one_day`] lets each infected individual make a fixed
number of random contacts, progresses existing infections, and applies the day's new
infections. [`Simulation`] wraps a cohort with a [`SimulationConfig`] and feeds the daily
counts to a [`ReportSink`].

```rust
use ixa_sir::{Cohort, IndividualId};

let mut cohort = Cohort::with_seed(10, 42)?;
cohort.configure(0.0, 0, 3)?;
cohort.infect_individual(IndividualId::new(0))?;
for _ in 0..3 {
    cohort.advance_one_day();
}
assert_eq!(cohort.recovered_count(), 1);
# Ok::<(), ixa_sir::SirError>(())
```

*/

pub mod cohort;
pub mod config;
pub mod error;
pub mod individual;
pub mod log;
pub mod random;
pub mod report;
pub mod simulation;

pub use cohort::{Cohort, CompartmentCounts, IndividualId, TransmissionParams};
pub use config::SimulationConfig;
pub use error::SirError;
pub use individual::{Individual, InfectionStatus};
pub use report::{ConsoleReport, CsvReport, DailyStats, ReportSink};
pub use simulation::{Simulation, SimulationSummary};
