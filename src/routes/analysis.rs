use actix_web::{web, HttpResponse, Responder};
use geo::Point;
use validator::Validate;

use crate::config::AnalysisSettings;
use crate::core::{
    build_site_report, compute_isochrone_efficiency, extract_nse_components,
    group_establishments, process_buffers, radial_density, sort_by_distance, ReportOptions,
    TransformError,
};
use crate::models::{
    AgebProperties, BufferProperties, EstablishmentProperties, ErrorResponse, FeatureCollection,
    HealthResponse, IsochroneProperties, NseComponentProperties, RadialDensityRequest,
    SiteReportRequest,
};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub analysis: AnalysisSettings,
}

impl AppState {
    pub fn new(analysis: AnalysisSettings) -> Self {
        Self { analysis }
    }

    /// Request origin wins over the configured site
    fn resolve_origin(&self, origin: Option<[f64; 2]>) -> Option<Point<f64>> {
        origin
            .map(|[lon, lat]| Point::new(lon, lat))
            .or_else(|| self.analysis.site.map(|site| site.point()))
    }

    fn resolve_radii(&self, radii: Option<&Vec<f64>>) -> Vec<f64> {
        radii.cloned().unwrap_or_else(|| self.analysis.radii_m.clone())
    }
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/buffers", web::post().to(buffers))
        .route("/establishments", web::post().to(establishments))
        .route("/establishments/density", web::post().to(establishment_density))
        .route("/agebs", web::post().to(agebs))
        .route("/isochrones", web::post().to(isochrones))
        .route("/nse-components", web::post().to(nse_components))
        .route("/report", web::post().to(site_report));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Buffer indicators endpoint
///
/// POST /api/v1/buffers
///
/// Body: FeatureCollection of buffer rings. Returns the rings with
/// `densidad_pob`, `nse_dominante` and `radio_display`, ordered by `radio_m`.
async fn buffers(req: web::Json<FeatureCollection<BufferProperties>>) -> impl Responder {
    tracing::info!("Processing {} buffer rings", req.len());

    match process_buffers(&req.features) {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => transform_error_response("Failed to process buffers", e),
    }
}

/// DENUE grouping endpoint
///
/// POST /api/v1/establishments
async fn establishments(
    req: web::Json<FeatureCollection<EstablishmentProperties>>,
) -> impl Responder {
    tracing::info!("Grouping {} establishments", req.len());

    HttpResponse::Ok().json(group_establishments(&req.features))
}

/// Radial establishment density endpoint
///
/// POST /api/v1/establishments/density
///
/// Request body:
/// ```json
/// {
///   "features": { "type": "FeatureCollection", "features": [] },
///   "origin": [-103.3496, 20.6597],
///   "radii": [100, 250, 500]
/// }
/// ```
async fn establishment_density(
    state: web::Data<AppState>,
    req: web::Json<RadialDensityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for density request: field_errors={:?}", errors);
        return validation_error_response(errors.to_string());
    }

    let Some(origin) = state.resolve_origin(req.origin) else {
        return validation_error_response(
            "origin is required when no site is configured".to_string(),
        );
    };
    let radii = state.resolve_radii(req.radii.as_ref());

    tracing::info!(
        "Computing radial density for {} establishments over {} rings",
        req.features.len(),
        radii.len()
    );

    match radial_density(&req.features.features, origin, &radii) {
        Ok(rings) => HttpResponse::Ok().json(rings),
        Err(e) => transform_error_response("Failed to compute radial density", e),
    }
}

/// AGEB distance ordering endpoint
///
/// POST /api/v1/agebs
async fn agebs(req: web::Json<FeatureCollection<AgebProperties>>) -> impl Responder {
    tracing::info!("Sorting {} AGEBs by distance", req.len());

    match sort_by_distance(&req.features) {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => transform_error_response("Failed to sort AGEBs", e),
    }
}

/// Isochrone efficiency endpoint
///
/// POST /api/v1/isochrones
async fn isochrones(req: web::Json<FeatureCollection<IsochroneProperties>>) -> impl Responder {
    tracing::info!("Computing efficiency for {} isochrones", req.len());

    match compute_isochrone_efficiency(&req.features) {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => transform_error_response("Failed to process isochrones", e),
    }
}

/// NSE components endpoint; responds `null` for an empty collection
///
/// POST /api/v1/nse-components
async fn nse_components(
    state: web::Data<AppState>,
    req: web::Json<FeatureCollection<NseComponentProperties>>,
) -> impl Responder {
    tracing::info!("Extracting NSE components from {} features", req.len());

    match extract_nse_components(&req, state.analysis.extra_features) {
        Ok(components) => HttpResponse::Ok().json(components),
        Err(e) => transform_error_response("Failed to extract NSE components", e),
    }
}

/// Full site report endpoint
///
/// POST /api/v1/report
async fn site_report(
    state: web::Data<AppState>,
    req: web::Json<SiteReportRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for report request: field_errors={:?}", errors);
        return validation_error_response(errors.to_string());
    }

    let options = ReportOptions {
        origin: state.resolve_origin(req.origin),
        radii: state.resolve_radii(req.radii.as_ref()),
        extra_features: state.analysis.extra_features,
    };

    match build_site_report(&req, &options) {
        Ok(report) => {
            tracing::debug!("Site report built");
            HttpResponse::Ok().json(report)
        }
        Err(e) => transform_error_response("Failed to build site report", e),
    }
}

fn validation_error_response(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn transform_error_response(context: &str, err: TransformError) -> HttpResponse {
    tracing::info!("{}: {}", context, err);

    HttpResponse::UnprocessableEntity().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 422,
    })
}
