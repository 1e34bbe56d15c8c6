use crate::controller::MonitorSettings;
use crate::region::{Region, RegionError, RegionInputs};
use crate::types::ICAOAddress;

pub const DEFAULT_ENDPOINT: &str = "https://api.airplanes.live/v2/icao/";
pub const DEFAULT_ICAO_CODES: [&str; 3] = ["45211e", "a12345", "b67890"];
pub const DEFAULT_LOG_PATH: &str = "aircraft_log.csv";

#[derive(serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicationConfig {
    pub tracker: TrackerConfig,
    pub region: RegionConfig,
    pub log: LogConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::Path,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.to_path_buf(),
            })?;

        let config: ApplicationConfig =
            toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: path.to_path_buf(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings serde cannot: ICAO codes and non-zero durations.
    pub fn validate(&self) -> Result<(), errors::ApplicationConfigError> {
        self.tracked_addresses()?;
        let durations = [
            ("tracker.poll_interval_seconds", self.tracker.poll_interval_seconds),
            ("tracker.request_timeout_seconds", self.tracker.request_timeout_seconds),
        ];
        for (field, seconds) in durations {
            if seconds == 0 {
                return Err(errors::ApplicationConfigError::ZeroDuration { field });
            }
        }
        Ok(())
    }

    /// The tracked aircraft, in configured order.
    pub fn tracked_addresses(&self) -> Result<Vec<ICAOAddress>, errors::ApplicationConfigError> {
        self.tracker
            .icao_codes
            .iter()
            .map(|code| {
                code.parse::<ICAOAddress>()
                    .map_err(|source| errors::ApplicationConfigError::InvalidIcao {
                        code: code.clone(),
                        source,
                    })
            })
            .collect()
    }

    pub fn monitor_settings(&self) -> Result<MonitorSettings, errors::ApplicationConfigError> {
        self.validate()?;
        Ok(MonitorSettings {
            tracked: self.tracked_addresses()?,
            poll_interval: std::time::Duration::from_secs(self.tracker.poll_interval_seconds),
            request_timeout: std::time::Duration::from_secs(self.tracker.request_timeout_seconds),
            log_path: self.log.path.clone(),
        })
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub endpoint: String,
    pub icao_codes: Vec<String>,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            endpoint: String::from(DEFAULT_ENDPOINT),
            icao_codes: DEFAULT_ICAO_CODES.iter().map(|code| code.to_string()).collect(),
            poll_interval_seconds: 60,
            request_timeout_seconds: 30,
        }
    }
}

/// Region bounds used to pre-populate the form and for headless sessions.
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegionConfig {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionConfig {
    pub fn to_region(&self) -> Result<Region, RegionError> {
        Region::new(self.min_lat, self.max_lat, self.min_lon, self.max_lon)
    }
}

impl From<&RegionConfig> for RegionInputs {
    fn from(region: &RegionConfig) -> Self {
        RegionInputs {
            min_lat: region.min_lat.to_string(),
            max_lat: region.max_lat.to_string(),
            min_lon: region.min_lon.to_string(),
            max_lon: region.max_lon.to_string(),
        }
    }
}

// Nevada National Security Site
impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            min_lat: 36.5,
            max_lat: 37.5,
            min_lon: -116.5,
            max_lon: -115.5,
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub path: std::path::PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            path: std::path::PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

pub mod errors {
    use crate::types::ICAOAddressError;

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
        InvalidIcao {
            code: String,
            source: ICAOAddressError,
        },
        ZeroDuration {
            field: &'static str,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::InvalidIcao { code, source } => {
                    write!(f, "Invalid tracked ICAO code '{code}': {source}")
                }
                ApplicationConfigError::ZeroDuration { field } => {
                    write!(f, "'{field}' must be at least one second")
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
                ApplicationConfigError::InvalidIcao { source: error, .. } => Some(error),
                ApplicationConfigError::ZeroDuration { .. } => None,
            }
        }
    }
}
