use std::f64::consts::PI;

use geo::Point;

use crate::core::distance::{haversine_distance, validate_coordinate};
use crate::core::error::{TransformError, TransformResult};
use crate::core::round_to;
use crate::models::{EstablishmentFeature, RingDensity};

/// Ring radii used by the competition-density chart, in meters
pub const DEFAULT_RADII_M: [f64; 6] = [100.0, 250.0, 500.0, 1000.0, 2000.0, 5000.0];

/// Count establishments within each radius of `origin` and derive densities
///
/// Counts are cumulative: a point 80 m away is counted in every ring.
/// Radii must be positive and strictly ascending.
///
/// # Arguments
/// * `points` - Establishment features with `Point` geometries
/// * `origin` - Site location as (longitude, latitude)
/// * `radii` - Ring radii in meters
pub fn radial_density(
    points: &[EstablishmentFeature],
    origin: Point<f64>,
    radii: &[f64],
) -> TransformResult<Vec<RingDensity>> {
    validate_radii(radii)?;
    validate_coordinate(origin)?;

    // One distance per point, reused across rings
    let distances = points
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let point = feature.point().ok_or_else(|| {
                TransformError::InvalidInput(format!(
                    "feature #{} ('{}') has no point geometry",
                    index, feature.properties.nom_estab
                ))
            })?;
            validate_coordinate(point)?;
            Ok(haversine_distance(origin.y(), origin.x(), point.y(), point.x()))
        })
        .collect::<TransformResult<Vec<f64>>>()?;

    tracing::debug!(
        "Computing radial density for {} points over {} rings",
        distances.len(),
        radii.len()
    );

    Ok(radii
        .iter()
        .map(|&radius| {
            let count = distances.iter().filter(|&&d| d <= radius).count();
            let area_km2 = PI * (radius / 1000.0).powi(2);

            RingDensity {
                radius_label: format!("{}m", radius),
                radius_m: radius,
                count,
                area_km2: round_to(area_km2, 2),
                density: round_to(count as f64 / area_km2, 1),
            }
        })
        .collect())
}

/// Same as [`radial_density`] with [`DEFAULT_RADII_M`]
pub fn radial_density_default(
    points: &[EstablishmentFeature],
    origin: Point<f64>,
) -> TransformResult<Vec<RingDensity>> {
    radial_density(points, origin, &DEFAULT_RADII_M)
}

fn validate_radii(radii: &[f64]) -> TransformResult<()> {
    if radii.is_empty() {
        return Err(TransformError::EmptyInput("no radii supplied".to_string()));
    }

    for (index, &radius) in radii.iter().enumerate() {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(TransformError::InvalidInput(format!(
                "radius #{} must be a positive number of meters, got {}",
                index, radius
            )));
        }
        if index > 0 && radius <= radii[index - 1] {
            return Err(TransformError::InvalidInput(format!(
                "radii must be strictly ascending: {} follows {}",
                radius,
                radii[index - 1]
            )));
        }
    }

    Ok(())
}
