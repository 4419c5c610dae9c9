use geo::Point;

use crate::core::error::{TransformError, TransformResult};

/// Earth's radius in meters (spherical approximation)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two points in meters
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in meters. Non-finite input yields NaN; use [`distance`] for a
/// checked variant.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Great-circle distance in meters between two `(longitude, latitude)` points
///
/// Fails with `InvalidInput` when a coordinate is not finite or a latitude
/// lies outside [-90, 90].
pub fn distance(a: Point<f64>, b: Point<f64>) -> TransformResult<f64> {
    validate_coordinate(a)?;
    validate_coordinate(b)?;

    Ok(haversine_distance(a.y(), a.x(), b.y(), b.x()))
}

/// Check that a point is a usable WGS84 `(longitude, latitude)` pair
pub fn validate_coordinate(point: Point<f64>) -> TransformResult<()> {
    let (lon, lat) = (point.x(), point.y());

    if !lon.is_finite() || !lat.is_finite() {
        return Err(TransformError::InvalidInput(format!(
            "coordinate [{}, {}] is not finite",
            lon, lat
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(TransformError::InvalidInput(format!(
            "latitude {} is outside [-90, 90]",
            lat
        )));
    }

    Ok(())
}
