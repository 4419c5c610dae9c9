use std::f64::consts::PI;

use crate::core::error::{TransformError, TransformResult};
use crate::core::{round_to, strip_keys};
use crate::models::{
    AgebFeature, AgebRecord, ExtraFeaturePolicy, FeatureCollection, IsochroneFeature,
    IsochroneRecord, NseComponentProperties, NseComponentScores, NseComponents,
};

/// Flatten AGEBs into records ordered by distance to the site
///
/// Uses the precomputed `distancia_sitio_m`; equal distances keep input order.
pub fn sort_by_distance(features: &[AgebFeature]) -> TransformResult<Vec<AgebRecord>> {
    let mut keyed = features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let distance = required(index, "distancia_sitio_m", feature.properties.distancia_sitio_m)?;
            let mut properties = feature.properties.clone();
            strip_keys(&mut properties.extra, &AgebRecord::DERIVED_KEYS);
            Ok((
                distance,
                AgebRecord {
                    properties,
                    geometry: feature.geometry.clone(),
                },
            ))
        })
        .collect::<TransformResult<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// Compare each isochrone's area against the circle of its approximate radius
///
/// `eficiencia` is `area_km2` as a percentage of that circle's area. Records
/// are ordered by `tiempo_min`; equal times keep input order.
pub fn compute_isochrone_efficiency(
    features: &[IsochroneFeature],
) -> TransformResult<Vec<IsochroneRecord>> {
    let mut keyed = features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let props = &feature.properties;
            let minutes = required(index, "tiempo_min", props.tiempo_min)?;
            let area_km2 = required(index, "area_km2", props.area_km2)?;
            let radius_m = required(index, "radio_aprox_m", props.radio_aprox_m)?;
            if radius_m <= 0.0 {
                return Err(TransformError::invalid_property(index, "radio_aprox_m", radius_m));
            }

            let area_buffer_equiv = PI * (radius_m / 1000.0).powi(2);
            let efficiency = (area_km2 / area_buffer_equiv) * 100.0;

            let mut properties = props.clone();
            strip_keys(&mut properties.extra, &IsochroneRecord::DERIVED_KEYS);
            Ok((
                minutes,
                IsochroneRecord {
                    properties,
                    geometry: feature.geometry.clone(),
                    eficiencia: round_to(efficiency, 1),
                    area_buffer_equiv: round_to(area_buffer_equiv, 2),
                },
            ))
        })
        .collect::<TransformResult<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// Read the NSE index and its four components from a single-feature collection
///
/// Returns `None` for an empty collection. Only the first feature is read;
/// what happens to the rest is decided by `policy`.
pub fn extract_nse_components(
    collection: &FeatureCollection<NseComponentProperties>,
    policy: ExtraFeaturePolicy,
) -> TransformResult<Option<NseComponents>> {
    let Some(first) = collection.features.first() else {
        return Ok(None);
    };

    let extra = collection.len() - 1;
    if extra > 0 {
        match policy {
            ExtraFeaturePolicy::UseFirst => {
                tracing::warn!(
                    "NSE components collection has {} features; ignoring {} after the first",
                    collection.len(),
                    extra
                );
            }
            ExtraFeaturePolicy::Reject => {
                return Err(TransformError::InvalidInput(format!(
                    "expected a single NSE components feature, got {}",
                    collection.len()
                )));
            }
        }
    }

    let props = &first.properties;
    Ok(Some(NseComponents {
        nse_index: required(0, "nse_index", props.nse_index)?,
        componentes: NseComponentScores {
            educacion: required(0, "nse_education", props.nse_education)?,
            vivienda: required(0, "nse_housing", props.nse_housing)?,
            bienes: required(0, "nse_assets", props.nse_assets)?,
            economico: required(0, "nse_economic", props.nse_economic)?,
        },
        geometry: first.geometry.clone(),
    }))
}

fn required(index: usize, property: &str, value: Option<f64>) -> TransformResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(TransformError::invalid_property(index, property, v)),
        None => Err(TransformError::missing_property(index, property)),
    }
}
