use crate::error::{Error, Result};

/// A WGS84 geographic coordinate in decimal degrees
///
/// Missing values coming from input tables are stored as `NaN`, which makes
/// the coordinate invalid without needing an `Option` at every call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude/longitude in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate from longitude/latitude in degrees
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lat, lon)
    }

    /// Creates a coordinate from optional table cells, using `NaN` for missing values
    pub fn from_optional(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self::new(latitude.unwrap_or(f64::NAN), longitude.unwrap_or(f64::NAN))
    }

    /// A coordinate with both values missing
    pub fn missing() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Returns true when both values are finite and within the legal WGS84 range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Fails with [`Error::InvalidCoordinate`] unless [`Coordinate::is_valid`] holds
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Returns the `(longitude, latitude)` pair used by KML and PROJ
    pub fn lonlat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}
