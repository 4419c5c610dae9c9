// Model exports
pub mod domain;
pub mod records;
pub mod requests;
pub mod responses;

pub use domain::{
    AgebFeature, AgebProperties, BufferFeature, BufferProperties, EstablishmentFeature,
    EstablishmentProperties, ExtraFeaturePolicy, Feature, FeatureCollection, IsochroneFeature,
    IsochroneProperties, NseComponentFeature, NseComponentProperties, NseLevel, NseShares,
};
pub use records::{
    ActivityCount, AgebRecord, BufferRecord, EstablishmentSummary, IsochroneRecord,
    NseComponentScores, NseComponents, RingDensity, SectorGroup, SiteReport, SizeCount,
};
pub use requests::{RadialDensityRequest, SiteReportRequest};
pub use responses::{ErrorResponse, HealthResponse};
