pub const CALLSIGN_PLACEHOLDER: &str = "N/A";

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub struct ICAOAddress(u32);

impl ICAOAddress {
    pub const MAX_VALUE: u32 = 0x00FF_FFFF;

    pub fn new(value: u32) -> Result<Self, ICAOAddressError> {
        if value <= Self::MAX_VALUE {
            Ok(ICAOAddress(value))
        } else {
            Err(ICAOAddressError::InvalidAddress(value))
        }
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::str::FromStr for ICAOAddress {
    type Err = ICAOAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.len() > 6
            || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ICAOAddressError::InvalidHexFormat(s.to_string()));
        }
        let value = u32::from_str_radix(trimmed, 16)
            .map_err(|_| ICAOAddressError::InvalidHexFormat(s.to_string()))?;
        ICAOAddress::new(value)
    }
}

impl std::fmt::Display for ICAOAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub enum ICAOAddressError {
    InvalidHexFormat(String),
    InvalidAddress(u32),
}
impl std::fmt::Display for ICAOAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ICAOAddressError::InvalidHexFormat(string) => {
                write!(f, "Invalid hexadecimal ICAO address '{string}'")
            }
            ICAOAddressError::InvalidAddress(val) => {
                write!(
                    f,
                    "Value 0x{:X} ({}) exceeds 24-bit ICAO address limit (0x{:X})",
                    val,
                    val,
                    ICAOAddress::MAX_VALUE
                )
            }
        }
    }
}
impl std::error::Error for ICAOAddressError {}

/// A latitude/longitude pair that was actually reported. Zero is a real coordinate.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// One aircraft as reported by the upstream API for a single fetch.
#[derive(Debug, PartialEq, Clone)]
pub struct AircraftRecord {
    pub icao_address: ICAOAddress,
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AircraftRecord {
    /// Returns the position only when both coordinates were reported.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn callsign_or_placeholder(&self) -> &str {
        self.callsign.as_deref().unwrap_or(CALLSIGN_PLACEHOLDER)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "Unknown"),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}
