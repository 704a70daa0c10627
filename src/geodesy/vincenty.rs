//! Vincenty's inverse and direct solutions on the WGS84 ellipsoid

use std::f64::consts::PI;

use crate::error::{Error, Result};
use super::coordinate::Coordinate;

/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS84 semi-minor axis in meters
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// IUGG mean Earth radius, used for the spherical fallback
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const CONVERGENCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;

/// Result of the inverse problem between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Ellipsoidal distance in meters
    pub distance: f64,
    /// Forward azimuth at the first point, degrees clockwise from north in [0, 360)
    pub initial_bearing: f64,
}

/// Geodesic distance in meters between two coordinates
///
/// # Example
///
/// ```
/// use colo_footprints::geodesy::{distance, Coordinate};
///
/// let brasilia = Coordinate::new(-15.7939, -47.8828);
/// let goiania = Coordinate::new(-16.6869, -49.2648);
/// let d = distance(brasilia, goiania)?;
/// assert!((d - 177_700.0).abs() < 3_000.0);
/// # Ok::<(), colo_footprints::Error>(())
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> Result<f64> {
    inverse(a, b).map(|solution| solution.distance)
}

/// Initial bearing in degrees (0 = north, clockwise) for the geodesic from `a` to `b`
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> Result<f64> {
    inverse(a, b).map(|solution| solution.initial_bearing)
}

/// Solves the inverse problem: distance and forward azimuth from `a` to `b`
pub fn inverse(a: Coordinate, b: Coordinate) -> Result<Inverse> {
    a.validate()?;
    b.validate()?;

    let l = normalize_longitude(b.longitude - a.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;

    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;
    let mut sin_lambda = 0.0;
    let mut cos_lambda = 0.0;

    for _ in 0..MAX_ITERATIONS {
        (sin_lambda, cos_lambda) = lambda.sin_cos();

        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();

        if sin_sigma == 0.0 {
            // Coincident points
            return Ok(Inverse {
                distance: 0.0,
                initial_bearing: 0.0,
            });
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // Equatorial line: cos²α = 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if lambda.abs() > PI {
            break;
        }

        if (lambda - previous).abs() < CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Ok(spherical_inverse(a, b));
    }

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let (big_a, big_b) = series_coefficients(u_sq);
    let delta_sigma = delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);

    let distance = WGS84_B * big_a * (sigma - delta_sigma);
    let azimuth = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);

    Ok(Inverse {
        distance,
        initial_bearing: normalize_bearing(azimuth.to_degrees()),
    })
}

/// Point reached from `origin` travelling `distance_m` meters along `bearing_deg`
///
/// # Example
///
/// ```
/// use colo_footprints::geodesy::{destination, distance, Coordinate};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let east = destination(origin, 90.0, 300.0)?;
/// assert!(east.longitude > 0.0);
/// assert!((distance(origin, east)? - 300.0).abs() < 0.001);
/// # Ok::<(), colo_footprints::Error>(())
/// ```
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Result<Coordinate> {
    origin.validate()?;

    if !bearing_deg.is_finite() {
        return Err(Error::InvalidDistance(bearing_deg));
    }
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(Error::InvalidDistance(distance_m));
    }
    if distance_m == 0.0 {
        return Ok(origin);
    }

    let (sin_alpha1, cos_alpha1) = bearing_deg.to_radians().sin_cos();

    let tan_u1 = (1.0 - WGS84_F) * origin.latitude.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let (big_a, big_b) = series_coefficients(u_sq);

    let base_sigma = distance_m / (WGS84_B * big_a);
    let mut sigma = base_sigma;
    let mut sin_sigma;
    let mut cos_sigma;
    let mut cos_2sigma_m;
    let mut iterations = 0;

    loop {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        (sin_sigma, cos_sigma) = sigma.sin_cos();
        let previous = sigma;
        sigma = base_sigma + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);

        iterations += 1;
        if (sigma - previous).abs() < CONVERGENCE || iterations >= MAX_ITERATIONS {
            break;
        }
    }

    cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    (sin_sigma, cos_sigma) = sigma.sin_cos();

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - WGS84_F) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda =
        (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * WGS84_F
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let lon2 = normalize_longitude(origin.longitude + l.to_degrees());

    Ok(Coordinate::new(lat2.to_degrees(), lon2))
}

fn series_coefficients(u_sq: f64) -> (f64, f64) {
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    (a, b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * c2)))
}

/// Haversine fallback for nearly antipodal points where Vincenty does not converge
fn spherical_inverse(a: Coordinate, b: Coordinate) -> Inverse {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let distance = 2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    Inverse {
        distance,
        initial_bearing: normalize_bearing(y.atan2(x).to_degrees()),
    }
}

fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // Keep +180 instead of folding it onto -180
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_relative(actual: f64, expected: f64, tolerance: f64) {
        let err = ((actual - expected) / expected).abs();
        assert!(err < tolerance, "expected {expected}, got {actual} (rel err {err})");
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinate::new(-23.5505, -46.6333);
        assert_eq!(distance(p, p).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let pairs = [
            (Coordinate::new(-23.5505, -46.6333), Coordinate::new(-22.9068, -43.1729)),
            (Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0027)),
            (Coordinate::new(60.0, 179.9), Coordinate::new(60.1, -179.9)),
            (Coordinate::new(-33.9249, 18.4241), Coordinate::new(51.5074, -0.1278)),
        ];

        for (a, b) in pairs {
            let ab = distance(a, b).unwrap();
            let ba = distance(b, a).unwrap();
            assert!((ab - ba).abs() < 1e-6, "{ab} vs {ba}");
        }
    }

    #[test]
    fn test_known_distance_flinders_peak_buninyong() {
        // Reference pair from Vincenty's paper tables (GRS80 ~ WGS84)
        let flinders = Coordinate::new(-37.951_033_416, 144.424_867_889);
        let buninyong = Coordinate::new(-37.652_821_139, 143.926_495_528);
        let d = distance(flinders, buninyong).unwrap();
        assert!((d - 54_972.271).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_equator_one_degree() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)).unwrap();
        assert!((d - 111_319.491).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_meridian_one_degree() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)).unwrap();
        assert!((d - 110_574.389).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_near_antipodal_distance() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.5, 179.7)).unwrap();
        assert!(d > 19_900_000.0 && d < 20_100_000.0, "got {d}");
    }

    #[test]
    fn test_invalid_inputs() {
        let ok = Coordinate::new(0.0, 0.0);
        assert!(distance(ok, Coordinate::new(f64::NAN, 0.0)).is_err());
        assert!(distance(Coordinate::new(0.0, 200.0), ok).is_err());
        assert!(destination(Coordinate::new(95.0, 0.0), 0.0, 10.0).is_err());
        assert!(matches!(destination(ok, 0.0, -1.0), Err(Error::InvalidDistance(_))));
        assert!(matches!(destination(ok, f64::NAN, 1.0), Err(Error::InvalidDistance(_))));
    }

    #[test]
    fn test_destination_roundtrip_distance() {
        let origins = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-15.7939, -47.8828),
            Coordinate::new(64.1466, -21.9426),
            Coordinate::new(-3.119, -60.0217),
        ];

        for origin in origins {
            for bearing in (0..360).step_by(15) {
                for d in [100.0, 500.0, 25_000.0, 80_000.0] {
                    let dest = destination(origin, bearing as f64, d).unwrap();
                    assert!(dest.is_valid());
                    assert_relative(distance(origin, dest).unwrap(), d, 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_destination_bearing_directions() {
        let origin = Coordinate::new(0.0, 0.0);

        let north = destination(origin, 0.0, 1000.0).unwrap();
        assert!(north.latitude > 0.0);
        assert!(north.longitude.abs() < 1e-12);

        let east = destination(origin, 90.0, 1000.0).unwrap();
        assert!(east.longitude > 0.0);
        assert!(east.latitude.abs() < 1e-9);

        let south = destination(origin, 180.0, 1000.0).unwrap();
        assert!(south.latitude < 0.0);

        let west = destination(origin, 270.0, 1000.0).unwrap();
        assert!(west.longitude < 0.0);
    }

    #[test]
    fn test_destination_zero_distance() {
        let origin = Coordinate::new(-10.0, 20.0);
        assert_eq!(destination(origin, 45.0, 0.0).unwrap(), origin);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let origin = Coordinate::new(0.0, 179.999);
        let dest = destination(origin, 90.0, 1000.0).unwrap();
        assert!(dest.longitude < -179.0);
        assert!(dest.is_valid());
    }

    #[test]
    fn test_initial_bearing() {
        let origin = Coordinate::new(0.0, 0.0);
        let east = destination(origin, 90.0, 300.0).unwrap();
        let bearing = initial_bearing(origin, east).unwrap();
        assert!((bearing - 90.0).abs() < 1e-6, "got {bearing}");

        let sw = destination(origin, 225.0, 5000.0).unwrap();
        let bearing = initial_bearing(origin, sw).unwrap();
        assert!((bearing - 225.0).abs() < 1e-6, "got {bearing}");
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
    }
}
