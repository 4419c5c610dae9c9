use crate::core::error::{TransformError, TransformResult};
use crate::core::strip_keys;
use crate::models::{BufferFeature, BufferRecord, NseLevel, NseShares};

/// Dominant NSE tier: strict maximum share, first tier wins ties
///
/// Tiers are compared in `AB, C+, C, D+, DE` order; when no share is above
/// zero the result is `C`.
pub fn dominant_nse(shares: &NseShares) -> NseLevel {
    let mut max_level = NseLevel::C;
    let mut max_share = 0.0;

    for (level, share) in shares.entries() {
        if share > max_share {
            max_share = share;
            max_level = level;
        }
    }

    max_level
}

/// Derive population density and dominant NSE for each buffer ring
///
/// Output keeps every input property except those named like a derived
/// field, which the derived value replaces. Records are sorted by `radio_m` ascending;
/// rings with equal radius keep their input order.
pub fn process_buffers(features: &[BufferFeature]) -> TransformResult<Vec<BufferRecord>> {
    let mut records = features
        .iter()
        .enumerate()
        .map(|(index, feature)| process_buffer(index, feature))
        .collect::<TransformResult<Vec<_>>>()?;

    records.sort_by(|a, b| radius_of(a).total_cmp(&radius_of(b)));

    tracing::debug!("Processed {} buffer rings", records.len());

    Ok(records)
}

fn process_buffer(index: usize, feature: &BufferFeature) -> TransformResult<BufferRecord> {
    let props = &feature.properties;

    let radio_m = props
        .radio_m
        .ok_or_else(|| TransformError::missing_property(index, "radio_m"))?;
    if !radio_m.is_finite() {
        return Err(TransformError::invalid_property(index, "radio_m", radio_m));
    }
    let population = props
        .poblacion_total
        .ok_or_else(|| TransformError::missing_property(index, "poblacion_total"))?;
    let area_km2 = props
        .area_km2
        .ok_or_else(|| TransformError::missing_property(index, "area_km2"))?;
    if !area_km2.is_finite() || area_km2 <= 0.0 {
        return Err(TransformError::invalid_property(index, "area_km2", area_km2));
    }

    let mut properties = props.clone();
    strip_keys(&mut properties.extra, &BufferRecord::DERIVED_KEYS);

    Ok(BufferRecord {
        properties,
        densidad_pob: (population / area_km2).round() as i64,
        nse_dominante: dominant_nse(&props.nse_shares()),
        radio_display: props.radio_label.clone(),
    })
}

fn radius_of(record: &BufferRecord) -> f64 {
    // Validated in process_buffer
    record.properties.radio_m.unwrap_or(0.0)
}
