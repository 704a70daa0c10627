//! Per-site outcome table handed to the downstream KML loader

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Column headers expected by the downstream loader
pub const HEADER_SITE_ID: &str = "ID MASTER";
pub const HEADER_LABEL: &str = "UFSIGLA";
pub const HEADER_STATUS: &str = "Processado pela Automação";

/// Terminal state of one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    /// A footprint file was written
    Success,
    /// No tower within the search radius, or the site had no usable coordinate
    NoCandidateFound,
    /// Matching, geometry or writing failed for this site
    GenerationError(String),
}

impl ManifestStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ManifestStatus::Success)
    }
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestStatus::Success => write!(f, "Sim"),
            ManifestStatus::NoCandidateFound => write!(f, "Sem colo no raio"),
            ManifestStatus::GenerationError(msg) => write!(f, "Erro: {}", msg),
        }
    }
}

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub site_id: String,
    pub label: String,
    pub status: ManifestStatus,
}

// Field order follows the header columns
#[derive(Serialize)]
struct ManifestRecord<'a> {
    site_id: &'a str,
    label: &'a str,
    status: String,
}

/// Ordered outcome of a batch, one row per input site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
}

impl Manifest {
    pub fn new(rows: Vec<ManifestRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of sites whose footprint was written
    pub fn success_count(&self) -> usize {
        self.rows.iter().filter(|row| row.status.is_success()).count()
    }

    /// Number of sites without a tower in range
    pub fn unmatched_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == ManifestStatus::NoCandidateFound)
            .count()
    }

    /// Number of sites that failed
    pub fn error_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.status, ManifestStatus::GenerationError(_)))
            .count()
    }

    /// Serializes the manifest as CSV into any writer
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        // Header is written by hand so an empty batch still yields the columns
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record([HEADER_SITE_ID, HEADER_LABEL, HEADER_STATUS])?;

        for row in &self.rows {
            csv_writer.serialize(ManifestRecord {
                site_id: &row.site_id,
                label: &row.label,
                status: row.status.to_string(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the manifest to `path`, creating parent directories as needed
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::file_write(parent, e))?;
        }

        let file = fs::File::create(path).map_err(|e| Error::file_write(path, e))?;
        self.write_csv(io::BufWriter::new(file)).map_err(|e| match e {
            Error::Io(source) => Error::file_write(path, source),
            Error::Csv(source) => Error::file_write(path, source.into()),
            other => other,
        })
    }
}
