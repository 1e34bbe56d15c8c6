use crate::types::Position;

/// Rectangular latitude/longitude box. Bounds are inclusive and validated on construction.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Region {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Region {
    /// Builds a region, rejecting non-finite values and inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::NotFinite` for NaN or infinite bounds and
    /// `RegionError::InvertedBounds` when a minimum exceeds its maximum.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, RegionError> {
        for (field, value) in [
            ("min_lat", min_lat),
            ("max_lat", max_lat),
            ("min_lon", min_lon),
            ("max_lon", max_lon),
        ] {
            if !value.is_finite() {
                return Err(RegionError::NotFinite { field });
            }
        }
        if min_lat > max_lat {
            return Err(RegionError::InvertedBounds {
                axis: Axis::Latitude,
                min: min_lat,
                max: max_lat,
            });
        }
        if min_lon > max_lon {
            return Err(RegionError::InvertedBounds {
                axis: Axis::Longitude,
                min: min_lon,
                max: max_lon,
            });
        }
        Ok(Region {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Parses the four bounds as typed into the form.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidNumber` naming the first field that is not a number,
    /// or any error `Region::new` returns.
    pub fn from_inputs(bounds: &RegionInputs) -> Result<Self, RegionError> {
        Region::new(
            parse_bound("min_lat", &bounds.min_lat)?,
            parse_bound("max_lat", &bounds.max_lat)?,
            parse_bound("min_lon", &bounds.min_lon)?,
            parse_bound("max_lon", &bounds.max_lon)?,
        )
    }

    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }

    #[must_use]
    pub fn contains_position(&self, position: Position) -> bool {
        self.contains(position.latitude, position.longitude)
    }

    #[must_use]
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }
    #[must_use]
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }
    #[must_use]
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }
    #[must_use]
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat [{}, {}] lon [{}, {}]",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

/// Raw text of the four bound fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionInputs {
    pub min_lat: String,
    pub max_lat: String,
    pub min_lon: String,
    pub max_lon: String,
}

impl From<&Region> for RegionInputs {
    fn from(region: &Region) -> Self {
        RegionInputs {
            min_lat: region.min_lat.to_string(),
            max_lat: region.max_lat.to_string(),
            min_lon: region.min_lon.to_string(),
            max_lon: region.max_lon.to_string(),
        }
    }
}

fn parse_bound(field: &'static str, text: &str) -> Result<f64, RegionError> {
    text.trim()
        .parse::<f64>()
        .map_err(|source| RegionError::InvalidNumber {
            field,
            text: text.to_string(),
            source,
        })
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Axis {
    Latitude,
    Longitude,
}

#[derive(Debug, PartialEq)]
pub enum RegionError {
    InvalidNumber {
        field: &'static str,
        text: String,
        source: std::num::ParseFloatError,
    },
    NotFinite {
        field: &'static str,
    },
    InvertedBounds {
        axis: Axis,
        min: f64,
        max: f64,
    },
}

impl std::fmt::Display for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionError::InvalidNumber { field, text, .. } => {
                write!(f, "Bound '{field}' is not a number: '{text}'")
            }
            RegionError::NotFinite { field } => write!(f, "Bound '{field}' must be finite"),
            RegionError::InvertedBounds { axis, min, max } => {
                write!(f, "{axis:?} minimum {min} is greater than maximum {max}")
            }
        }
    }
}

impl std::error::Error for RegionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegionError::InvalidNumber { source, .. } => Some(source),
            _ => None,
        }
    }
}
