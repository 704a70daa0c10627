use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::footprint::DEFAULT_POINT_COUNT;
use crate::geodesy::WGS84;

/// Default search radius around each site, in meters
pub const DEFAULT_MAX_DISTANCE_M: f64 = 500.0;

/// Default footprint radius around the matched tower, in meters
pub const DEFAULT_RADIUS_M: f64 = 100.0;

/// Default number of identifier characters used when a site has no label
pub const DEFAULT_LABEL_PREFIX_LEN: usize = 5;

/// Configuration for a batch run
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use colo_footprints::batch::BatchConfig;
///
/// let config = BatchConfig::from_json_str(r#"{ "radius_meters": 150.0 }"#)?;
/// assert_eq!(config.radius_meters, 150.0);
/// assert_eq!(config.max_distance_meters, 500.0);
/// # Ok::<(), colo_footprints::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum site-to-tower distance for a match
    pub max_distance_meters: f64,

    /// Radius of the generated footprint
    pub radius_meters: f64,

    /// Number of boundary vertices per footprint
    pub point_count: usize,

    /// Directory receiving one file per matched site
    pub output_dir: PathBuf,

    /// Manifest CSV path
    pub manifest_path: PathBuf,

    /// Identifier prefix length for the fallback label
    pub label_prefix_len: usize,

    /// Worker threads; `None` uses rayon's default pool
    pub workers: Option<usize>,

    /// EPSG code of the input tables' coordinates
    pub source_epsg: u16,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_distance_meters: DEFAULT_MAX_DISTANCE_M,
            radius_meters: DEFAULT_RADIUS_M,
            point_count: DEFAULT_POINT_COUNT,
            output_dir: PathBuf::from("Carregar_poligonos"),
            manifest_path: PathBuf::from("Planilha_Carregar_KML.csv"),
            label_prefix_len: DEFAULT_LABEL_PREFIX_LEN,
            workers: None,
            source_epsg: WGS84,
        }
    }
}

impl BatchConfig {
    /// Parses a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Creates a configuration writing into `output_dir`, with the manifest inside it
    pub fn in_dir<P: AsRef<Path>>(output_dir: P) -> Self {
        let output_dir = output_dir.as_ref();
        Self {
            output_dir: output_dir.to_path_buf(),
            manifest_path: output_dir.join("Planilha_Carregar_KML.csv"),
            ..Self::default()
        }
    }

    /// Checks that every numeric setting is usable
    pub fn validate(&self) -> Result<()> {
        if !self.max_distance_meters.is_finite() || self.max_distance_meters < 0.0 {
            return Err(Error::Config(format!(
                "max_distance_meters must be a non-negative number, got {}",
                self.max_distance_meters
            )));
        }

        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(Error::Config(format!(
                "radius_meters must be positive, got {}",
                self.radius_meters
            )));
        }

        if self.point_count < 3 {
            return Err(Error::Config(format!(
                "point_count must be at least 3, got {}",
                self.point_count
            )));
        }

        if self.label_prefix_len == 0 {
            return Err(Error::Config("label_prefix_len must be at least 1".to_string()));
        }

        if self.workers == Some(0) {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.max_distance_meters, 500.0);
        assert_eq!(config.radius_meters, 100.0);
        assert_eq!(config.point_count, 36);
        assert_eq!(config.label_prefix_len, 5);
        assert_eq!(config.output_dir, PathBuf::from("Carregar_poligonos"));
        assert_eq!(config.manifest_path, PathBuf::from("Planilha_Carregar_KML.csv"));
        assert_eq!(config.workers, None);
        assert_eq!(config.source_epsg, 4326);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = BatchConfig::from_json_str(
            r#"{ "max_distance_meters": 750, "workers": 4, "output_dir": "out" }"#,
        )
        .unwrap();

        assert_eq!(config.max_distance_meters, 750.0);
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.radius_meters, 100.0);
    }

    #[test]
    fn test_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "point_count": 72, "source_epsg": 4674 }}"#).unwrap();

        let config = BatchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.point_count, 72);
        assert_eq!(config.source_epsg, 4674);
    }

    #[test]
    fn test_malformed_json() {
        let result = BatchConfig::from_json_str("{ radius_meters: }");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_validation() {
        let bad = [
            BatchConfig { radius_meters: 0.0, ..BatchConfig::default() },
            BatchConfig { max_distance_meters: f64::NAN, ..BatchConfig::default() },
            BatchConfig { point_count: 2, ..BatchConfig::default() },
            BatchConfig { label_prefix_len: 0, ..BatchConfig::default() },
            BatchConfig { workers: Some(0), ..BatchConfig::default() },
        ];

        for config in bad {
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_in_dir() {
        let config = BatchConfig::in_dir("/tmp/run");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/run"));
        assert_eq!(config.manifest_path, PathBuf::from("/tmp/run/Planilha_Carregar_KML.csv"));
    }
}
