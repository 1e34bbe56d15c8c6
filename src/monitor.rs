use crate::fetcher::{AircraftSource, Fetcher};
use crate::record_log::{CsvLog, LogEntry, RecordLogError};
use crate::region::Region;
use crate::thread_manager::{StopSignal, SteppableTask};
use crate::transcript::Transcript;
use crate::types::{AircraftRecord, ICAOAddress};

/// State that lives for exactly one monitoring session.
#[derive(Debug)]
pub struct Session {
    region: Region,
    seen: std::collections::HashSet<ICAOAddress>,
    csv_log: CsvLog,
    transcript: Transcript,
}

impl Session {
    /// Opens a fresh session: truncates the CSV log, clears the transcript and
    /// starts with an empty seen set.
    ///
    /// # Errors
    ///
    /// Returns `RecordLogError` if the log file cannot be recreated.
    pub fn begin(
        region: Region,
        log_path: &std::path::Path,
        transcript: Transcript,
    ) -> Result<Self, RecordLogError> {
        let csv_log = CsvLog::create(log_path)?;
        transcript.clear();
        Ok(Session {
            region,
            seen: std::collections::HashSet::new(),
            csv_log,
            transcript,
        })
    }

    /// Logs `record` if it has a fix inside the region and has not been logged this session.
    pub fn observe(
        &mut self,
        record: &AircraftRecord,
        now: chrono::DateTime<chrono::Local>,
    ) -> Option<LogEntry> {
        let position = record.position()?;
        if !self.region.contains_position(position) || self.seen.contains(&record.icao_address) {
            return None;
        }

        let entry = LogEntry::new(record, position, now);
        let line = entry.transcript_line();
        log::info!("{line}");
        self.transcript.push(line);
        if let Err(err) = self.csv_log.append(&entry) {
            log::error!("Session: {err}");
        }
        self.seen.insert(record.icao_address);
        Some(entry)
    }

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn has_seen(&self, icao_address: ICAOAddress) -> bool {
        self.seen.contains(&icao_address)
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Polls every tracked aircraft once per step and feeds the results to the session.
pub struct Monitor<S: AircraftSource> {
    tracked: Vec<ICAOAddress>,
    fetcher: Fetcher<S>,
    session: Session,
    cycles: u64,
}

impl<S: AircraftSource> Monitor<S> {
    #[must_use]
    pub fn new(tracked: Vec<ICAOAddress>, fetcher: Fetcher<S>, session: Session) -> Self {
        Monitor {
            tracked,
            fetcher,
            session,
            cycles: 0,
        }
    }

    /// One pass over all tracked aircraft in order. Returns the entries logged.
    pub fn run_cycle(&mut self) -> Vec<LogEntry> {
        self.run_cycle_until(|| false)
    }

    /// Like `run_cycle`, but `should_stop` is checked before each fetch and ends the
    /// pass early once it returns `true`.
    pub fn run_cycle_until(&mut self, should_stop: impl Fn() -> bool) -> Vec<LogEntry> {
        self.cycles += 1;
        log::debug!(
            "Monitor: cycle {} over {} aircraft",
            self.cycles,
            self.tracked.len()
        );

        let mut logged = Vec::new();
        for &icao_address in &self.tracked {
            if should_stop() {
                log::debug!("Monitor: cycle {} interrupted before {icao_address}", self.cycles);
                break;
            }
            let Some(record) = self.fetcher.fetch(icao_address) else {
                continue;
            };
            if let Some(entry) = self.session.observe(&record, chrono::Local::now()) {
                logged.push(entry);
            }
        }
        logged
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl<S: AircraftSource> SteppableTask for Monitor<S> {
    fn step(&mut self, stop: &StopSignal) -> bool {
        self.run_cycle_until(|| stop.is_raised());
        true
    }
}
