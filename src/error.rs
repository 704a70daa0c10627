//! Error types for colo-footprints

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for colo-footprints operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while matching towers and generating footprints
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// CSV table could not be read or written
    Csv(csv::Error),

    /// JSON configuration could not be parsed
    Json(serde_json::Error),

    /// Latitude/longitude out of range or not finite
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Travel distance or bearing is negative or not finite
    InvalidDistance(f64),

    /// Footprint radius is not strictly positive
    InvalidRadius(f64),

    /// Too few boundary points to form a polygon
    InvalidPointCount(usize),

    /// Output file could not be created or written
    FileWrite { path: PathBuf, source: io::Error },

    /// Projection error
    Projection(String),

    /// Invalid configuration
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::InvalidCoordinate { latitude, longitude } => {
                write!(f, "Invalid coordinate: lat={}, lon={}", latitude, longitude)
            }
            Error::InvalidDistance(value) => write!(f, "Invalid distance: {}", value),
            Error::InvalidRadius(value) => write!(f, "Invalid radius: {} m", value),
            Error::InvalidPointCount(count) => {
                write!(f, "Invalid point count: {} (at least 3 required)", count)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::FileWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl Error {
    /// Wraps an I/O failure on `path` as a [`Error::FileWrite`]
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileWrite {
            path: path.into(),
            source,
        }
    }
}
