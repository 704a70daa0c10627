//! Geodesic computations on the WGS84 ellipsoid
//!
//! Distances and destinations use Vincenty's formulae, which are accurate to
//! well under a millimetre for the footprint and matching radii this crate
//! works with.

pub mod coordinate;
#[cfg(feature = "projection")]
pub mod transformer;
pub mod vincenty;

pub use coordinate::Coordinate;
#[cfg(feature = "projection")]
pub use transformer::Transformer;
pub use vincenty::{destination, distance, initial_bearing, inverse, Inverse};

/// EPSG code of WGS84 geographic coordinates
pub const WGS84: u16 = 4326;

/// EPSG code of SIRGAS 2000 geographic coordinates
pub const SIRGAS_2000: u16 = 4674;
