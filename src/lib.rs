//! colo-footprints - collocation tower matching and KML footprint generation
//!
//! For every network site, colo-footprints looks for the nearest existing
//! tower within a search radius (geodesic distance on WGS84), draws a circular
//! footprint around that tower, writes it as a KML polygon and records the
//! outcome of each site in a manifest for the downstream loader.
//!
//! # Examples
//!
//! ## Running a batch
//!
//! ```no_run
//! use colo_footprints::{BatchConfig, BatchProcessor, tables};
//!
//! let sites = tables::read_sites_path("sites.csv")?;
//! let towers = tables::read_candidates_path("towers.csv")?;
//!
//! let processor = BatchProcessor::new(BatchConfig::default());
//! let report = processor.run(&sites, &towers)?;
//! println!("{}", report.summary());
//! # Ok::<(), colo_footprints::Error>(())
//! ```
//!
//! ## Geometry only
//!
//! ```
//! use colo_footprints::{build_circle, destination, distance, Coordinate};
//!
//! let tower = Coordinate::new(-23.5505, -46.6333);
//! let footprint = build_circle(tower, 100.0, 36)?;
//! assert_eq!(footprint.ring.len(), 37);
//!
//! let edge = destination(tower, 45.0, 100.0)?;
//! assert!((distance(tower, edge)? - 100.0).abs() < 1e-3);
//! # Ok::<(), colo_footprints::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod geodesy;
pub mod matcher;
pub mod footprint;
pub mod batch;
pub mod tables;

pub use error::{Error, Result};
pub use types::{CandidateTower, MatchResult, Site};
pub use geodesy::{destination, distance, Coordinate};
#[cfg(feature = "projection")]
pub use geodesy::Transformer;
pub use matcher::find_nearest;
pub use footprint::{build_circle, Footprint, FootprintSink, KmlStyle, KmlWriter, Metadata};
pub use batch::{BatchConfig, BatchProcessor, BatchReport, Manifest, ManifestRow, ManifestStatus};
