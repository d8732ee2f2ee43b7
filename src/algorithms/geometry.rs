//! Distance primitives between two geodetic points.
//!
//! Four models trade fidelity for cost:
//! - geodesic distance on an oblate ellipsoid (Karney's algorithm)
//! - great-circle distance on a sphere
//! - vertical distance between two altitudes
//! - straight-line distance after projecting onto a sphere of radius
//!   `radius + altitude`
//!
//! The euclidean projection adds altitude directly to the sphere radius. It is
//! not an ellipsoidal-height model.

use crate::validation::data::{validate_altitude, validate_latitude, validate_longitude, validate_positive};
use crate::validation::error::SeparationResult;
use geographiclib_rs::{Geodesic, InverseGeodesic};
use nalgebra::Vector3;

fn validate_coordinates(lat: f64, lon: f64) -> SeparationResult<()> {
    validate_latitude(lat)?;
    validate_longitude(lon)
}

/// Geodesic distance in metres on the ellipsoid `(major_semiaxis, flattening)`
pub fn geodesic_distance(
    from_lat: f64,
    from_lon: f64,
    to_lat: f64,
    to_lon: f64,
    major_semiaxis: f64,
    flattening: f64,
) -> SeparationResult<f64> {
    validate_positive(major_semiaxis, "major_semiaxis")?;
    validate_positive(flattening, "flattening")?;

    let geodesic = Geodesic::new(major_semiaxis, flattening);
    geodesic_distance_on(&geodesic, from_lat, from_lon, to_lat, to_lon)
}

/// [`geodesic_distance`] on a prebuilt ellipsoid, for repeated queries
pub fn geodesic_distance_on(
    geodesic: &Geodesic,
    from_lat: f64,
    from_lon: f64,
    to_lat: f64,
    to_lon: f64,
) -> SeparationResult<f64> {
    validate_coordinates(from_lat, from_lon)?;
    validate_coordinates(to_lat, to_lon)?;

    let s12: f64 = geodesic.inverse(from_lat, from_lon, to_lat, to_lon);
    Ok(s12)
}

/// Great-circle distance in metres on a sphere of the given radius
pub fn great_circle_distance(
    from_lat: f64,
    from_lon: f64,
    to_lat: f64,
    to_lon: f64,
    radius: f64,
) -> SeparationResult<f64> {
    validate_coordinates(from_lat, from_lon)?;
    validate_coordinates(to_lat, to_lon)?;
    validate_positive(radius, "radius")?;

    let (sin_lat1, cos_lat1) = from_lat.to_radians().sin_cos();
    let (sin_lat2, cos_lat2) = to_lat.to_radians().sin_cos();
    let (sin_dlon, cos_dlon) = (to_lon - from_lon).to_radians().sin_cos();

    // atan2 form stays accurate for both tiny and near-antipodal separations
    let y = (cos_lat2 * sin_dlon).hypot(cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon);
    let x = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;

    Ok(radius * y.atan2(x))
}

/// Absolute altitude difference in metres
pub fn vertical_distance(from_alt: f64, to_alt: f64) -> SeparationResult<f64> {
    validate_altitude(from_alt)?;
    validate_altitude(to_alt)?;
    Ok((from_alt - to_alt).abs())
}

/// Project a geodetic point onto a sphere of radius `radius + alt`.
///
/// No validation; callers check their inputs.
pub fn to_cartesian(lat: f64, lon: f64, alt: f64, radius: f64) -> Vector3<f64> {
    let r = radius + alt;
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();

    Vector3::new(r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat)
}

/// Inverse of [`to_cartesian`]: returns `(lat, lon, alt)`
pub fn from_cartesian(point: &Vector3<f64>, radius: f64) -> (f64, f64, f64) {
    let lat = point.z.atan2(point.x.hypot(point.y)).to_degrees();
    let lon = point.y.atan2(point.x).to_degrees();
    (lat, lon, point.norm() - radius)
}

/// Straight-line distance in metres between two projected points
pub fn euclidean_distance(
    from_lat: f64,
    from_lon: f64,
    from_alt: f64,
    to_lat: f64,
    to_lon: f64,
    to_alt: f64,
    radius: f64,
) -> SeparationResult<f64> {
    validate_coordinates(from_lat, from_lon)?;
    validate_altitude(from_alt)?;
    validate_coordinates(to_lat, to_lon)?;
    validate_altitude(to_alt)?;
    validate_positive(radius, "radius")?;

    let from = to_cartesian(from_lat, from_lon, from_alt, radius);
    let to = to_cartesian(to_lat, to_lon, to_alt, radius);
    Ok((from - to).norm())
}
