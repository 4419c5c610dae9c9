use geo::Point;
use geojson::Geometry;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `"type"` member of a GeoJSON feature; any other value fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// GeoJSON feature with a typed property bag
///
/// `"properties": null` (or an absent member) parses as `P::default()`, so
/// missing required values surface from the transform that needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de> + Default"))]
pub struct Feature<P> {
    #[serde(rename = "type")]
    kind: FeatureType,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: P,
}

fn null_as_default<'de, D, P>(deserializer: D) -> Result<P, D::Error>
where
    D: Deserializer<'de>,
    P: Deserialize<'de> + Default,
{
    Option::<P>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl<P> Feature<P> {
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry,
            properties,
        }
    }

    /// Coordinates of a `Point` geometry as (x = longitude, y = latitude)
    pub fn point(&self) -> Option<Point<f64>> {
        match self.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Point(coords)) if coords.len() >= 2 => {
                Some(Point::new(coords[0], coords[1]))
            }
            _ => None,
        }
    }
}

/// GeoJSON feature collection; order carries no meaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de> + Default"))]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    kind: FeatureCollectionType,
    #[serde(default = "Vec::new")]
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Socioeconomic level (AMAI NSE tiers), in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NseLevel {
    #[serde(rename = "AB")]
    Ab,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "DE")]
    De,
}

impl NseLevel {
    pub const ALL: [NseLevel; 5] = [
        NseLevel::Ab,
        NseLevel::CPlus,
        NseLevel::C,
        NseLevel::DPlus,
        NseLevel::De,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NseLevel::Ab => "AB",
            NseLevel::CPlus => "C+",
            NseLevel::C => "C",
            NseLevel::DPlus => "D+",
            NseLevel::De => "DE",
        }
    }
}

impl std::fmt::Display for NseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population share per NSE tier; absent shares count as zero
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NseShares {
    pub ab: f64,
    pub c_plus: f64,
    pub c: f64,
    pub d_plus: f64,
    pub de: f64,
}

impl NseShares {
    /// Shares paired with their tier, in `NseLevel::ALL` order
    pub fn entries(&self) -> [(NseLevel, f64); 5] {
        [
            (NseLevel::Ab, self.ab),
            (NseLevel::CPlus, self.c_plus),
            (NseLevel::C, self.c),
            (NseLevel::DPlus, self.d_plus),
            (NseLevel::De, self.de),
        ]
    }
}

/// Properties of a concentric buffer ring around the site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BufferProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poblacion_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
    #[serde(rename = "nse_share_AB", default, skip_serializing_if = "Option::is_none")]
    pub nse_share_ab: Option<f64>,
    #[serde(rename = "nse_share_C_plus", default, skip_serializing_if = "Option::is_none")]
    pub nse_share_c_plus: Option<f64>,
    #[serde(rename = "nse_share_C", default, skip_serializing_if = "Option::is_none")]
    pub nse_share_c: Option<f64>,
    #[serde(rename = "nse_share_D_plus", default, skip_serializing_if = "Option::is_none")]
    pub nse_share_d_plus: Option<f64>,
    #[serde(rename = "nse_share_DE", default, skip_serializing_if = "Option::is_none")]
    pub nse_share_de: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BufferProperties {
    pub fn nse_shares(&self) -> NseShares {
        NseShares {
            ab: self.nse_share_ab.unwrap_or(0.0),
            c_plus: self.nse_share_c_plus.unwrap_or(0.0),
            c: self.nse_share_c.unwrap_or(0.0),
            d_plus: self.nse_share_d_plus.unwrap_or(0.0),
            de: self.nse_share_de.unwrap_or(0.0),
        }
    }
}

/// DENUE establishment (point of interest)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EstablishmentProperties {
    /// SCIAN activity code; its prefix identifies the sector
    pub codigo_act: String,
    pub nom_estab: String,
    pub nombre_act: String,
    /// Employee-count bucket, e.g. "0 a 5 personas"
    pub per_ocu: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// AGEB (census block group) with a precomputed distance to the site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgebProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distancia_sitio_m: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Drive-time isochrone polygon
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsochroneProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
    /// Radius of the circle with the same reach, in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_aprox_m: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// NSE index decomposition for the site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NseComponentProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nse_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nse_education: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nse_housing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nse_assets: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nse_economic: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type BufferFeature = Feature<BufferProperties>;
pub type EstablishmentFeature = Feature<EstablishmentProperties>;
pub type AgebFeature = Feature<AgebProperties>;
pub type IsochroneFeature = Feature<IsochroneProperties>;
pub type NseComponentFeature = Feature<NseComponentProperties>;

/// What to do when a single-feature collection carries more than one feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFeaturePolicy {
    /// Keep the first feature and log the dropped count
    #[default]
    UseFirst,
    /// Fail with `InvalidInput`
    Reject,
}
