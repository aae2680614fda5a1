use crate::cohort::Cohort;
use crate::error::SirError;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::Path;

/// The compartment counts of a cohort at the end of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub day: u32,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl DailyStats {
    #[must_use]
    pub fn from_cohort(cohort: &Cohort) -> Self {
        let counts = cohort.counts();
        DailyStats {
            day: cohort.current_day(),
            susceptible: counts.susceptible,
            infected: counts.infected,
            recovered: counts.recovered,
        }
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }
}

/// A consumer of daily statistics. Receives day 0 after seeding and then one record per
/// day-step.
pub trait ReportSink {
    /// # Errors
    ///
    /// Returns a `SirError` if the record could not be written.
    fn record(&mut self, stats: &DailyStats) -> Result<(), SirError>;

    /// Called once after the last record.
    ///
    /// # Errors
    ///
    /// Returns a `SirError` if buffered records could not be written.
    fn finish(&mut self) -> Result<(), SirError> {
        Ok(())
    }
}

impl ReportSink for Vec<DailyStats> {
    fn record(&mut self, stats: &DailyStats) -> Result<(), SirError> {
        self.push(*stats);
        Ok(())
    }
}

/// Writes `Day   3: S= 991, I=   7, R=   2` lines.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        ConsoleReport { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        ConsoleReport { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn record(&mut self, stats: &DailyStats) -> Result<(), SirError> {
        writeln!(
            self.out,
            "Day {:>3}: S={:>4}, I={:>4}, R={:>4}",
            stats.day, stats.susceptible, stats.infected, stats.recovered
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SirError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Writes one CSV row per day with the columns of `DailyStats`.
pub struct CsvReport {
    writer: Writer<File>,
}

impl CsvReport {
    /// Creates the report file and all missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `SirError::ReportError` if the path does not end in `.csv` and
    /// `SirError::IoError` if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SirError> {
        let file = generate_validate_filepath(path.as_ref())?;
        Ok(CsvReport {
            writer: Writer::from_writer(file),
        })
    }
}

// Checks that the path is a CSV and creates it along with its parent directories.
fn generate_validate_filepath(path: &Path) -> Result<File, SirError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(SirError::ReportError(format!(
            "report output files must be CSVs, got {}",
            path.display()
        ))),
    }
}

impl ReportSink for CsvReport {
    fn record(&mut self, stats: &DailyStats) -> Result<(), SirError> {
        self.writer.serialize(stats)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SirError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> DailyStats {
        DailyStats {
            day: 3,
            susceptible: 991,
            infected: 7,
            recovered: 2,
        }
    }

    #[test]
    fn console_format() {
        let mut report = ConsoleReport::new(Vec::new());
        report.record(&sample()).unwrap();
        report.finish().unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(text, "Day   3: S= 991, I=   7, R=   2\n");
    }

    #[test]
    fn stats_from_cohort() {
        let mut cohort = Cohort::with_seed(10, 1).unwrap();
        cohort.configure(0.0, 0, 2).unwrap();
        cohort.infect_random_individual();
        cohort.advance_one_day();
        let stats = DailyStats::from_cohort(&cohort);
        assert_eq!(stats.day, 1);
        assert_eq!((stats.susceptible, stats.infected, stats.recovered), (9, 1, 0));
        assert_eq!(stats.population(), 10);
    }

    #[test]
    fn csv_report_writes_rows() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("daily.csv");
        let mut report = CsvReport::create(&path).unwrap();
        report.record(&sample()).unwrap();
        report
            .record(&DailyStats {
                day: 4,
                susceptible: 990,
                infected: 6,
                recovered: 4,
            })
            .unwrap();
        report.finish().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["day", "susceptible", "infected", "recovered"]
        );
        let rows: Vec<DailyStats> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], sample());
        assert_eq!(rows[1].day, 4);
    }

    #[test]
    fn only_csvs_allowed() {
        let temp_dir = tempdir().unwrap();
        let result = CsvReport::create(temp_dir.path().join("daily.tsv"));
        assert!(matches!(result, Err(SirError::ReportError(_))));
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<DailyStats> = Vec::new();
        sink.record(&sample()).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink, vec![sample()]);
    }
}
