//! CSV loading of the site and candidate tables
//!
//! Headers follow the planning spreadsheets (`ID MASTER`, `Sigla Sugerida`,
//! `Latitude`, `Longitude`, `Proprietário`, `ID Detentora`); lowercase English
//! aliases are accepted too. Coordinate cells that are empty or not numbers
//! load as missing values instead of failing the whole table.

use std::fs::File;
use std::io;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::Result;
#[cfg(feature = "projection")]
use crate::geodesy::transformer::Transformer;
use crate::geodesy::{Coordinate, WGS84};
use crate::types::{CandidateTower, Site};

#[derive(Debug, Deserialize)]
struct SiteRecord {
    #[serde(rename = "ID MASTER", alias = "id", alias = "site_id")]
    id: String,
    #[serde(rename = "Sigla Sugerida", alias = "label", alias = "sigla", default)]
    label: Option<String>,
    #[serde(
        rename = "Latitude",
        alias = "latitude",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    latitude: Option<f64>,
    #[serde(
        rename = "Longitude",
        alias = "longitude",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CandidateRecord {
    #[serde(
        rename = "Latitude",
        alias = "latitude",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    latitude: Option<f64>,
    #[serde(
        rename = "Longitude",
        alias = "longitude",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    longitude: Option<f64>,
    #[serde(rename = "Proprietário", alias = "owner", default)]
    owner: String,
    #[serde(rename = "ID Detentora", alias = "holder_id", default)]
    holder_id: String,
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Reads a site table from CSV
pub fn read_sites<R: io::Read>(reader: R) -> Result<Vec<Site>> {
    let mut sites = Vec::new();

    for record in csv_reader(reader).deserialize() {
        let record: SiteRecord = record?;
        sites.push(Site::new(
            record.id,
            record.label,
            Coordinate::from_optional(record.latitude, record.longitude),
        ));
    }

    Ok(sites)
}

/// Reads a candidate tower table from CSV
pub fn read_candidates<R: io::Read>(reader: R) -> Result<Vec<CandidateTower>> {
    let mut candidates = Vec::new();

    for record in csv_reader(reader).deserialize() {
        let record: CandidateRecord = record?;
        candidates.push(CandidateTower::new(
            Coordinate::from_optional(record.latitude, record.longitude),
            record.owner,
            record.holder_id,
        ));
    }

    Ok(candidates)
}

/// Reads a site table from a CSV file
pub fn read_sites_path<P: AsRef<Path>>(path: P) -> Result<Vec<Site>> {
    let sites = read_sites(File::open(path.as_ref())?)?;
    info!("Loaded {} sites from {}", sites.len(), path.as_ref().display());
    Ok(sites)
}

/// Reads a candidate tower table from a CSV file
pub fn read_candidates_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateTower>> {
    let candidates = read_candidates(File::open(path.as_ref())?)?;
    info!(
        "Loaded {} candidate towers from {}",
        candidates.len(),
        path.as_ref().display()
    );
    Ok(candidates)
}

/// Converts both tables from `source_epsg` to WGS84 in place
///
/// Does nothing when the tables are already WGS84.
#[cfg(feature = "projection")]
pub fn normalize_to_wgs84(
    source_epsg: u16,
    sites: &mut [Site],
    candidates: &mut [CandidateTower],
) -> Result<()> {
    if source_epsg == WGS84 {
        return Ok(());
    }

    info!("Converting input coordinates from EPSG:{} to WGS84", source_epsg);
    let transformer = Transformer::to_wgs84(source_epsg)?;

    for site in sites.iter_mut() {
        site.coordinate = transformer.transform(site.coordinate)?;
    }
    for candidate in candidates.iter_mut() {
        candidate.coordinate = transformer.transform(candidate.coordinate)?;
    }

    Ok(())
}

/// Accepts WGS84 tables only; built without the `projection` feature
#[cfg(not(feature = "projection"))]
pub fn normalize_to_wgs84(
    source_epsg: u16,
    _sites: &mut [Site],
    _candidates: &mut [CandidateTower],
) -> Result<()> {
    if source_epsg == WGS84 {
        return Ok(());
    }

    Err(crate::error::Error::Projection(format!(
        "EPSG:{} input needs the `projection` feature",
        source_epsg
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::SIRGAS_2000;

    #[test]
    fn test_read_sites_spreadsheet_headers() {
        let data = "ID MASTER,Sigla Sugerida,Latitude,Longitude\n\
                    SPCAS0001,SPCAS,-23.5505,-46.6333\n\
                    RJNIT0002,,-22.8832,-43.1034\n";

        let sites = read_sites(data.as_bytes()).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].id, "SPCAS0001");
        assert_eq!(sites[0].label.as_deref(), Some("SPCAS"));
        assert_eq!(sites[0].coordinate, Coordinate::new(-23.5505, -46.6333));
        assert_eq!(sites[1].label, None);
        assert_eq!(sites[1].output_label(5), "RJNIT");
    }

    #[test]
    fn test_read_sites_english_headers_without_label() {
        let data = "id,latitude,longitude\nS1,0,0\n";

        let sites = read_sites(data.as_bytes()).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].label, None);
        assert!(sites[0].coordinate.is_valid());
    }

    #[test]
    fn test_missing_and_garbage_coordinates() {
        let data = "ID MASTER,Latitude,Longitude\nS1,,\nS2,abc,-46.6\nS3, -23.5 , -46.6 \n";

        let sites = read_sites(data.as_bytes()).unwrap();
        assert_eq!(sites.len(), 3);
        assert!(!sites[0].coordinate.is_valid());
        assert!(!sites[1].coordinate.is_valid());
        assert!(sites[2].coordinate.is_valid());
    }

    #[test]
    fn test_read_candidates() {
        let data = "UF,ID Detentora,Latitude,Longitude,Proprietário,Compartilhável\n\
                    SP,D-100,-23.55,-46.63,TowerCo,Não\n\
                    SP,D-101,,,Broken,Sim\n";

        let candidates = read_candidates(data.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].owner, "TowerCo");
        assert_eq!(candidates[0].holder_id, "D-100");
        assert!(candidates[0].coordinate.is_valid());
        assert!(!candidates[1].coordinate.is_valid());
    }

    #[test]
    fn test_read_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sites.csv");
        std::fs::write(&path, "id,label,latitude,longitude\nS1,AASIG1,0,0\n").unwrap();

        let sites = read_sites_path(&path).unwrap();
        assert_eq!(sites[0].label.as_deref(), Some("AASIG1"));

        assert!(read_sites_path(dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_normalize_wgs84_is_noop() {
        let mut sites = vec![Site::new("S1", None, Coordinate::new(1.0, 2.0))];
        let mut candidates: Vec<CandidateTower> = vec![];

        normalize_to_wgs84(WGS84, &mut sites, &mut candidates).unwrap();
        assert_eq!(sites[0].coordinate, Coordinate::new(1.0, 2.0));
    }

    #[cfg(feature = "projection")]
    #[test]
    fn test_normalize_sirgas() {
        let mut sites = vec![
            Site::new("S1", None, Coordinate::new(-15.79, -47.88)),
            Site::new("S2", None, Coordinate::missing()),
        ];
        let mut candidates = vec![CandidateTower::new(Coordinate::new(-15.8, -47.9), "A", "1")];

        normalize_to_wgs84(SIRGAS_2000, &mut sites, &mut candidates).unwrap();

        assert!((sites[0].coordinate.latitude + 15.79).abs() < 1e-5);
        assert!(!sites[1].coordinate.is_valid());
        assert!((candidates[0].coordinate.longitude + 47.9).abs() < 1e-5);
    }

    #[cfg(not(feature = "projection"))]
    #[test]
    fn test_normalize_without_projection_rejects_other_crs() {
        let mut sites = vec![Site::new("S1", None, Coordinate::new(-15.79, -47.88))];
        let mut candidates: Vec<CandidateTower> = vec![];

        let result = normalize_to_wgs84(SIRGAS_2000, &mut sites, &mut candidates);
        assert!(matches!(result, Err(crate::error::Error::Projection(_))));
    }
}
