use crate::error::{Error, Result};
use crate::geodesy::coordinate::Coordinate;
use crate::geodesy::WGS84;
use proj::Proj;

/// Transforms geographic coordinates between reference systems
///
/// Input tables are sometimes surveyed in a national datum; matching and
/// footprint generation always run on WGS84, so tables are normalised
/// through this transformer before the batch starts.
pub struct Transformer {
    proj: Proj,
    from_epsg: u16,
    to_epsg: u16,
}

impl Transformer {
    /// Creates a new transformer from source to target CRS using EPSG codes
    pub fn new(from_epsg: u16, to_epsg: u16) -> Result<Self> {
        let from = format!("EPSG:{}", from_epsg);
        let to = format!("EPSG:{}", to_epsg);

        let proj = Proj::new_known_crs(&from, &to, None)
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;

        Ok(Self {
            proj,
            from_epsg,
            to_epsg,
        })
    }

    /// Creates a transformer from `from_epsg` to WGS84
    pub fn to_wgs84(from_epsg: u16) -> Result<Self> {
        Self::new(from_epsg, WGS84)
    }

    /// Transforms a coordinate from source to target CRS
    ///
    /// Invalid (missing) coordinates pass through untouched so that the
    /// matcher can skip them later.
    pub fn transform(&self, coord: Coordinate) -> Result<Coordinate> {
        if !coord.is_valid() {
            return Ok(coord);
        }

        let (lon, lat) = self.proj.convert(coord.lonlat())
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        Ok(Coordinate::from_lonlat(lon, lat))
    }

    /// Transforms multiple coordinates in bulk
    pub fn transform_many(&self, coords: &[Coordinate]) -> Result<Vec<Coordinate>> {
        coords.iter()
            .map(|&coord| self.transform(coord))
            .collect()
    }

    /// Returns the source EPSG code
    pub fn from_epsg(&self) -> u16 {
        self.from_epsg
    }

    /// Returns the target EPSG code
    pub fn to_epsg(&self) -> u16 {
        self.to_epsg
    }
}
