//! Core records for colo-footprints

use crate::geodesy::Coordinate;

/// A network site that needs a collocation tower
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Site identifier ("ID MASTER")
    pub id: String,
    /// Suggested label ("sigla"); may be absent or blank
    pub label: Option<String>,
    pub coordinate: Coordinate,
}

impl Site {
    /// Creates a new site
    pub fn new(id: impl Into<String>, label: Option<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            label,
            coordinate,
        }
    }

    /// Returns the label used for output file names and the manifest
    ///
    /// The provided label wins when it is non-blank; otherwise the first
    /// `prefix_len` characters of the identifier are used.
    pub fn output_label(&self, prefix_len: usize) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.id.chars().take(prefix_len).collect(),
        }
    }
}

/// An existing tower that a site could be collocated on
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTower {
    pub coordinate: Coordinate,
    /// Tower owner ("Proprietário")
    pub owner: String,
    /// Holder identifier ("ID Detentora")
    pub holder_id: String,
}

impl CandidateTower {
    /// Creates a new candidate tower
    pub fn new(
        coordinate: Coordinate,
        owner: impl Into<String>,
        holder_id: impl Into<String>,
    ) -> Self {
        Self {
            coordinate,
            owner: owner.into(),
            holder_id: holder_id.into(),
        }
    }
}

/// Outcome of a nearest-candidate search
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    NoMatch,
    Matched {
        tower: CandidateTower,
        /// Position of the tower in the candidate list
        index: usize,
        distance_meters: f64,
    },
}

impl MatchResult {
    /// Returns true if a tower was found
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}
