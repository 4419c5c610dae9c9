use geo::Point;

use crate::core::{
    buffers::process_buffers,
    density::radial_density,
    enrichment::{compute_isochrone_efficiency, extract_nse_components, sort_by_distance},
    establishments::group_establishments,
    error::TransformResult,
};
use crate::models::{ExtraFeaturePolicy, SiteReport, SiteReportRequest};

/// Values resolved by the caller before building a report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Site location used for radial density, if known
    pub origin: Option<Point<f64>>,
    pub radii: Vec<f64>,
    pub extra_features: ExtraFeaturePolicy,
}

/// Run every transform whose input is present
///
/// Radial density needs both establishments and an origin. The first
/// failing transform aborts the whole report.
pub fn build_site_report(
    input: &SiteReportRequest,
    options: &ReportOptions,
) -> TransformResult<SiteReport> {
    let mut report = SiteReport::default();

    if let Some(buffers) = &input.buffers {
        report.buffers = Some(process_buffers(&buffers.features)?);
    }

    if let Some(establishments) = &input.establishments {
        report.establishments = Some(group_establishments(&establishments.features));

        if let Some(origin) = options.origin {
            report.radial_density = Some(radial_density(
                &establishments.features,
                origin,
                &options.radii,
            )?);
        } else {
            tracing::debug!("No site origin available, skipping radial density");
        }
    }

    if let Some(agebs) = &input.agebs {
        report.agebs = Some(sort_by_distance(&agebs.features)?);
    }

    if let Some(isochrones) = &input.isochrones {
        report.isochrones = Some(compute_isochrone_efficiency(&isochrones.features)?);
    }

    if let Some(components) = &input.nse_components {
        report.nse_components = extract_nse_components(components, options.extra_features)?;
    }

    Ok(report)
}
