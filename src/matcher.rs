//! Nearest collocation candidate search
//!
//! Every call is a full linear scan over the candidates, so a batch costs
//! O(sites × candidates) distance evaluations. That is fine for the hundreds
//! to low thousands of rows this tool handles; larger inputs would need a
//! grid or k-d tree bucketing candidates by coordinate.

use log::debug;

use crate::error::Result;
use crate::geodesy::{distance, Coordinate};
use crate::types::{CandidateTower, MatchResult};

/// Finds the candidate closest to `site` within `max_distance_meters`
///
/// An invalid site coordinate or an empty candidate list yields
/// [`MatchResult::NoMatch`]. Candidates with invalid coordinates are skipped.
/// A candidate exactly at `max_distance_meters` is accepted, and on equal
/// distances the earliest candidate in input order wins.
///
/// # Example
///
/// ```
/// use colo_footprints::geodesy::{destination, Coordinate};
/// use colo_footprints::matcher::find_nearest;
/// use colo_footprints::types::{CandidateTower, MatchResult};
///
/// let site = Coordinate::new(0.0, 0.0);
/// let tower = CandidateTower::new(destination(site, 90.0, 300.0)?, "TowerCo", "D-1");
///
/// let result = find_nearest(site, &[tower], 500.0)?;
/// assert!(matches!(result, MatchResult::Matched { index: 0, .. }));
/// # Ok::<(), colo_footprints::Error>(())
/// ```
pub fn find_nearest(
    site: Coordinate,
    candidates: &[CandidateTower],
    max_distance_meters: f64,
) -> Result<MatchResult> {
    if !site.is_valid() || candidates.is_empty() {
        return Ok(MatchResult::NoMatch);
    }

    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        if !candidate.coordinate.is_valid() {
            debug!("Skipping candidate {} with invalid coordinate", index);
            continue;
        }

        let d = distance(site, candidate.coordinate)?;
        if d > max_distance_meters {
            continue;
        }

        // Strict comparison keeps the first of equally distant candidates
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((index, d));
        }
    }

    Ok(match best {
        Some((index, distance_meters)) => MatchResult::Matched {
            tower: candidates[index].clone(),
            index,
            distance_meters,
        },
        None => MatchResult::NoMatch,
    })
}
