use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{
    AgebProperties, BufferProperties, EstablishmentProperties, FeatureCollection,
    IsochroneProperties, NseComponentProperties,
};

/// Request to compute establishment density rings around a site
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RadialDensityRequest {
    pub features: FeatureCollection<EstablishmentProperties>,
    /// `[longitude, latitude]`; falls back to the configured site
    #[serde(default)]
    pub origin: Option<[f64; 2]>,
    /// Ring radii in meters; falls back to the configured radii
    #[validate(length(min = 1))]
    #[serde(default)]
    pub radii: Option<Vec<f64>>,
}

/// Request to build every derived table for a site in one call
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SiteReportRequest {
    #[serde(default)]
    pub buffers: Option<FeatureCollection<BufferProperties>>,
    #[serde(default)]
    pub establishments: Option<FeatureCollection<EstablishmentProperties>>,
    #[serde(default)]
    pub agebs: Option<FeatureCollection<AgebProperties>>,
    #[serde(default)]
    pub isochrones: Option<FeatureCollection<IsochroneProperties>>,
    #[serde(default)]
    pub nse_components: Option<FeatureCollection<NseComponentProperties>>,
    #[serde(default)]
    pub origin: Option<[f64; 2]>,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub radii: Option<Vec<f64>>,
}
