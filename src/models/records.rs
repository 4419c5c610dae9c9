use geojson::Geometry;
use serde::Serialize;

use crate::models::domain::{
    AgebProperties, BufferProperties, EstablishmentFeature, IsochroneProperties, NseLevel,
};

/// Establishment count and density within one radius of the site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingDensity {
    #[serde(rename = "radio")]
    pub radius_label: String,
    #[serde(rename = "radio_m")]
    pub radius_m: f64,
    pub count: usize,
    pub area_km2: f64,
    #[serde(rename = "densidad")]
    pub density: f64,
}

/// Buffer ring with derived population density and dominant NSE tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferRecord {
    #[serde(flatten)]
    pub properties: BufferProperties,
    pub densidad_pob: i64,
    pub nse_dominante: NseLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio_display: Option<String>,
}

impl BufferRecord {
    /// Output keys owned by the record; input properties with these names are dropped
    pub const DERIVED_KEYS: [&'static str; 3] = ["densidad_pob", "nse_dominante", "radio_display"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorGroup {
    pub sector: String,
    pub count: usize,
    #[serde(rename = "nombres")]
    pub names: Vec<String>,
    #[serde(rename = "establecimientos")]
    pub members: Vec<EstablishmentFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCount {
    #[serde(rename = "actividad")]
    pub activity: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeCount {
    #[serde(rename = "tamano")]
    pub size: String,
    pub count: usize,
}

/// Rollups of DENUE establishments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstablishmentSummary {
    #[serde(rename = "bySector")]
    pub by_sector: Vec<SectorGroup>,
    #[serde(rename = "byActividad")]
    pub by_activity: Vec<ActivityCount>,
    #[serde(rename = "byTamano")]
    pub by_size: Vec<SizeCount>,
    pub total: usize,
    pub raw: Vec<EstablishmentFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgebRecord {
    #[serde(flatten)]
    pub properties: AgebProperties,
    pub geometry: Option<Geometry>,
}

impl AgebRecord {
    pub const DERIVED_KEYS: [&'static str; 1] = ["geometry"];
}

/// Isochrone with its coverage efficiency against the equivalent circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneRecord {
    #[serde(flatten)]
    pub properties: IsochroneProperties,
    pub geometry: Option<Geometry>,
    pub eficiencia: f64,
    pub area_buffer_equiv: f64,
}

impl IsochroneRecord {
    pub const DERIVED_KEYS: [&'static str; 3] = ["geometry", "eficiencia", "area_buffer_equiv"];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NseComponentScores {
    pub educacion: f64,
    pub vivienda: f64,
    pub bienes: f64,
    pub economico: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NseComponents {
    pub nse_index: f64,
    pub componentes: NseComponentScores,
    pub geometry: Option<Geometry>,
}

/// Every derived table for a site; a section is omitted when its input was not supplied
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SiteReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffers: Option<Vec<BufferRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishments: Option<EstablishmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_density: Option<Vec<RingDensity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agebs: Option<Vec<AgebRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isochrones: Option<Vec<IsochroneRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nse_components: Option<NseComponents>,
}
