use crate::error::{Error, Result};
use crate::geodesy::{destination, Coordinate};

/// Default number of boundary vertices (one every 10 degrees)
pub const DEFAULT_POINT_COUNT: usize = 36;

/// Minimum number of distinct vertices for a polygon
pub const MIN_POINT_COUNT: usize = 3;

/// A circular footprint approximated by a closed geodesic ring
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub center: Coordinate,
    pub radius_meters: f64,
    /// Boundary points; the first point is repeated as the last one
    pub ring: Vec<Coordinate>,
}

impl Footprint {
    /// Number of distinct vertices (ring length minus the closing point)
    pub fn vertex_count(&self) -> usize {
        self.ring.len().saturating_sub(1)
    }

    /// Returns true if the ring ends where it starts
    pub fn is_closed(&self) -> bool {
        self.ring.len() > MIN_POINT_COUNT && self.ring.first() == self.ring.last()
    }

    /// Ring with longitudes kept on the center's side of the antimeridian
    ///
    /// A footprint touching +/-180 degrees would otherwise jump from about
    /// +179.999 to -179.999 and be drawn around the globe. Shifted points
    /// may lie slightly outside [-180, 180].
    pub fn continuous_ring(&self) -> Vec<Coordinate> {
        self.ring
            .iter()
            .map(|point| {
                let offset = point.longitude - self.center.longitude;
                let longitude = if offset > 180.0 {
                    point.longitude - 360.0
                } else if offset < -180.0 {
                    point.longitude + 360.0
                } else {
                    point.longitude
                };
                Coordinate::new(point.latitude, longitude)
            })
            .collect()
    }
}

/// Builds a circle of `radius_meters` around `center` with `point_count` vertices
///
/// Vertices sit at bearings `0, 360/n, 2*360/n, ...` degrees, each placed with
/// the geodesic direct solution, so the circle keeps its true ground radius
/// at any latitude.
pub fn build_circle(
    center: Coordinate,
    radius_meters: f64,
    point_count: usize,
) -> Result<Footprint> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        return Err(Error::InvalidRadius(radius_meters));
    }
    if point_count < MIN_POINT_COUNT {
        return Err(Error::InvalidPointCount(point_count));
    }
    center.validate()?;

    let step = 360.0 / point_count as f64;
    let mut ring = Vec::with_capacity(point_count + 1);

    for i in 0..point_count {
        ring.push(destination(center, i as f64 * step, radius_meters)?);
    }
    ring.push(ring[0]);

    Ok(Footprint {
        center,
        radius_meters,
        ring,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::{distance, initial_bearing};

    #[test]
    fn test_default_ring_shape() {
        let center = Coordinate::new(-15.7939, -47.8828);
        let footprint = build_circle(center, 100.0, DEFAULT_POINT_COUNT).unwrap();

        assert_eq!(footprint.ring.len(), 37);
        assert_eq!(footprint.vertex_count(), 36);
        assert!(footprint.is_closed());
        assert_eq!(footprint.ring[0], footprint.ring[36]);
        assert_eq!(footprint.center, center);
    }

    #[test]
    fn test_points_at_radius() {
        let centers = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(62.0, 25.0),
            Coordinate::new(-33.9, 151.2),
        ];
        for center in centers {
            let footprint = build_circle(center, 100.0, 36).unwrap();
            for point in &footprint.ring {
                let d = distance(center, *point).unwrap();
                assert!((d - 100.0).abs() < 0.01, "point at {d} m");
            }
        }
    }

    #[test]
    fn test_first_point_is_north() {
        let center = Coordinate::new(10.0, 10.0);
        let footprint = build_circle(center, 250.0, 8).unwrap();

        assert!(footprint.ring[0].latitude > center.latitude);
        assert!((footprint.ring[0].longitude - center.longitude).abs() < 1e-12);

        let second = initial_bearing(center, footprint.ring[1]).unwrap();
        assert!((second - 45.0).abs() < 1e-4, "got {second}");
    }

    #[test]
    fn test_continuous_ring_across_antimeridian() {
        let footprint = build_circle(Coordinate::new(0.0, 180.0), 100.0, 36).unwrap();
        assert!(footprint.ring.iter().any(|p| p.longitude < 0.0));

        let ring = footprint.continuous_ring();
        assert_eq!(ring.len(), footprint.ring.len());
        for point in &ring {
            assert!((point.longitude - 180.0).abs() < 0.01, "lon {}", point.longitude);
        }
        assert!(ring.iter().any(|p| p.longitude > 180.0));
    }

    #[test]
    fn test_continuous_ring_leaves_ordinary_rings_alone() {
        let footprint = build_circle(Coordinate::new(-15.7939, -47.8828), 100.0, 36).unwrap();
        assert_eq!(footprint.continuous_ring(), footprint.ring);
    }

    #[test]
    fn test_custom_point_count() {
        let footprint = build_circle(Coordinate::new(1.0, 1.0), 50.0, 3).unwrap();
        assert_eq!(footprint.ring.len(), 4);
        assert!(footprint.is_closed());
    }

    #[test]
    fn test_invalid_radius() {
        let center = Coordinate::new(0.0, 0.0);
        assert!(matches!(build_circle(center, 0.0, 36), Err(Error::InvalidRadius(_))));
        assert!(matches!(build_circle(center, -5.0, 36), Err(Error::InvalidRadius(_))));
        assert!(matches!(build_circle(center, f64::NAN, 36), Err(Error::InvalidRadius(_))));
    }

    #[test]
    fn test_invalid_point_count() {
        let center = Coordinate::new(0.0, 0.0);
        assert!(matches!(build_circle(center, 100.0, 2), Err(Error::InvalidPointCount(2))));
        assert!(matches!(build_circle(center, 100.0, 0), Err(Error::InvalidPointCount(0))));
    }

    #[test]
    fn test_invalid_center() {
        let result = build_circle(Coordinate::missing(), 100.0, 36);
        assert!(matches!(result, Err(Error::InvalidCoordinate { .. })));
    }
}
