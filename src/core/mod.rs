// Core transform exports
pub mod buffers;
pub mod density;
pub mod distance;
pub mod enrichment;
pub mod error;
pub mod establishments;
pub mod report;

pub use buffers::{dominant_nse, process_buffers};
pub use density::{radial_density, radial_density_default, DEFAULT_RADII_M};
pub use distance::{distance, haversine_distance, EARTH_RADIUS_M};
pub use enrichment::{compute_isochrone_efficiency, extract_nse_components, sort_by_distance};
pub use error::{TransformError, TransformResult};
pub use establishments::{
    group_establishments, group_establishments_by, ScianSector, ScianSubsector, SectorKey,
};
pub use report::{build_site_report, ReportOptions};

use serde_json::{Map, Value};

/// Round half away from zero to a fixed number of decimals
#[inline]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Drop pass-through properties that a derived record writes itself
pub(crate) fn strip_keys(extra: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        extra.remove(*key);
    }
}
