use crate::types::{AircraftRecord, ICAOAddress, Position};
use std::io::Write;

pub const CSV_HEADER: [&str; 5] = ["Timestamp", "ICAO", "Callsign", "Latitude", "Longitude"];

// ctime(3) layout, e.g. "Mon Oct  5 09:03:41 2026"
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// One first-seen-inside-region event.
#[derive(Debug, PartialEq, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub icao_address: ICAOAddress,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        record: &AircraftRecord,
        position: Position,
        timestamp: chrono::DateTime<chrono::Local>,
    ) -> Self {
        LogEntry {
            timestamp,
            icao_address: record.icao_address,
            callsign: record.callsign_or_placeholder().to_string(),
            latitude: position.latitude,
            longitude: position.longitude,
        }
    }

    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    #[must_use]
    pub fn transcript_line(&self) -> String {
        format!(
            "{} - ICAO: {} - Callsign: {} - Lat: {} - Lon: {}",
            self.formatted_timestamp(),
            self.icao_address,
            self.callsign,
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }

    #[must_use]
    pub fn csv_row(&self) -> String {
        [
            self.formatted_timestamp(),
            self.icao_address.to_string(),
            self.callsign.clone(),
            format_coordinate(self.latitude),
            format_coordinate(self.longitude),
        ]
        .iter()
        .map(|field| escape_csv_field(field))
        .collect::<Vec<String>>()
        .join(",")
    }
}

// Debug formatting keeps a trailing ".0" on whole degrees.
fn format_coordinate(value: f64) -> String {
    format!("{value:?}")
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Append-only CSV record of log entries. Every write reopens the file.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: std::path::PathBuf,
}

impl CsvLog {
    /// Truncates (or creates) the file at `path` and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns `RecordLogError::Io` if the file cannot be written.
    pub fn create(path: impl Into<std::path::PathBuf>) -> Result<Self, RecordLogError> {
        let path = path.into();
        let mut file = std::fs::File::create(&path).map_err(|error| RecordLogError::Io {
            source: error,
            path: path.clone(),
        })?;
        writeln!(file, "{}", CSV_HEADER.join(",")).map_err(|error| RecordLogError::Io {
            source: error,
            path: path.clone(),
        })?;
        log::info!("CsvLog: Started new log at '{}'", path.display());
        Ok(CsvLog { path })
    }

    /// # Errors
    ///
    /// Returns `RecordLogError::Io` if the file cannot be opened or written.
    pub fn append(&self, entry: &LogEntry) -> Result<(), RecordLogError> {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|error| RecordLogError::Io {
                source: error,
                path: self.path.clone(),
            })?;
        writeln!(file, "{}", entry.csv_row()).map_err(|error| RecordLogError::Io {
            source: error,
            path: self.path.clone(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[derive(Debug)]
pub enum RecordLogError {
    Io {
        source: std::io::Error,
        path: std::path::PathBuf,
    },
}

impl std::fmt::Display for RecordLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordLogError::Io {
                source: error,
                path,
            } => write!(
                f,
                "Failed to write log file '{}': {}",
                path.display(),
                error
            ),
        }
    }
}

impl std::error::Error for RecordLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordLogError::Io { source: error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvLog, LogEntry};
    use crate::types::{AircraftRecord, Position};
    use chrono::TimeZone;

    fn entry(callsign: Option<&str>) -> LogEntry {
        let record = AircraftRecord {
            icao_address: "45211e".parse().unwrap(),
            callsign: callsign.map(String::from),
            latitude: Some(37.0),
            longitude: Some(-116.0),
        };
        let timestamp = chrono::Local
            .with_ymd_and_hms(2026, 10, 5, 9, 3, 41)
            .single()
            .expect("unambiguous local time");
        LogEntry::new(
            &record,
            Position {
                latitude: 37.0,
                longitude: -116.0,
            },
            timestamp,
        )
    }

    #[test]
    fn when_formatting_entry_then_csv_row_matches_ctime_layout() {
        assert_eq!(
            entry(Some("TEST1")).csv_row(),
            "Mon Oct  5 09:03:41 2026,45211e,TEST1,37.0,-116.0"
        );
    }

    #[test]
    fn when_callsign_is_missing_then_placeholder_is_written() {
        assert_eq!(
            entry(None).transcript_line(),
            "Mon Oct  5 09:03:41 2026 - ICAO: 45211e - Callsign: N/A - Lat: 37.0 - Lon: -116.0"
        );
    }

    #[test]
    fn when_callsign_contains_a_comma_then_field_is_quoted() {
        assert!(entry(Some("A,B")).csv_row().contains(",\"A,B\","));
    }

    #[test]
    fn when_log_is_created_over_existing_file_then_it_is_truncated_to_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aircraft_log.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let log = CsvLog::create(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Timestamp,ICAO,Callsign,Latitude,Longitude\n"
        );

        log.append(&entry(Some("TEST1"))).unwrap();
        log.append(&entry(None)).unwrap();
        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with(",45211e,N/A,37.0,-116.0"));
    }

    #[test]
    fn when_directory_does_not_exist_then_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.csv");
        assert!(CsvLog::create(path).is_err());
    }
}
