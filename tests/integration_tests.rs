// Integration tests for Site Insights

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use site_insights::config::{AnalysisSettings, SiteSettings};
use site_insights::models::ExtraFeaturePolicy;
use site_insights::routes::{self, AppState, DEFAULT_MAX_PAYLOAD_BYTES};

const SITE: [f64; 2] = [-103.3496, 20.6597];

fn analysis_settings(site: Option<[f64; 2]>, extra_features: ExtraFeaturePolicy) -> AnalysisSettings {
    AnalysisSettings {
        site: site.map(|[longitude, latitude]| SiteSettings { longitude, latitude }),
        extra_features,
        ..Default::default()
    }
}

macro_rules! init_app {
    ($settings:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($settings)))
                .app_data(routes::json_config(DEFAULT_MAX_PAYLOAD_BYTES))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn establishment(code: &str, name: &str, activity: &str, size: &str, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": {
            "codigo_act": code,
            "nom_estab": name,
            "nombre_act": activity,
            "per_ocu": size,
            "id": name
        }
    })
}

fn denue_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            establishment("722511", "Tacos El Charro", "Restaurantes a la carta", "0 a 5 personas", -103.3496, 20.6597),
            establishment("722514", "Cafe Centro", "Cafeterias", "6 a 10 personas", -103.3496, 20.6617),
            establishment("461110", "Abarrotes Lupita", "Tiendas de abarrotes", "0 a 5 personas", -103.3496, 20.6687),
            establishment("722511", "Birria Don Chuy", "Restaurantes a la carta", "0 a 5 personas", -103.3496, 20.6997)
        ]
    })
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!(AnalysisSettings::default());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_buffers_endpoint() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "radio_m": 1000, "radio_label": "1 km", "poblacion_total": 5000,
                    "area_km2": 3.14, "nse_share_AB": 0.1, "nse_share_C": 0.6, "hogares": 1400
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "radio_m": 500, "radio_label": "500 m", "poblacion_total": 1000,
                    "area_km2": 0.79, "nse_share_C_plus": 0.5, "nse_share_D_plus": 0.3
                }
            }
        ]
    });

    let req = test::TestRequest::post().uri("/api/v1/buffers").set_json(&payload).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body[0]["radio_m"], 500.0);
    assert_eq!(body[0]["nse_dominante"], "C+");
    assert_eq!(body[0]["densidad_pob"], 1266);
    assert_eq!(body[1]["densidad_pob"], 1592);
    assert_eq!(body[1]["nse_dominante"], "C");
    assert_eq!(body[1]["radio_display"], "1 km");
    assert_eq!(body[1]["hogares"], 1400);
}

#[actix_web::test]
async fn test_buffers_missing_area_is_unprocessable() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": null, "properties": { "radio_m": 100, "poblacion_total": 10 } }
        ]
    });

    let req = test::TestRequest::post().uri("/api/v1/buffers").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 422);
    assert!(body["message"].as_str().unwrap().contains("area_km2"));
}

#[actix_web::test]
async fn test_buffers_derived_fields_win_over_input() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": null,
            "properties": {
                "radio_m": 1000, "poblacion_total": 5000, "area_km2": 3.14,
                "nse_share_C": 0.6, "densidad_pob": 7, "nse_dominante": "AB"
            }
        }]
    });

    let req = test::TestRequest::post().uri("/api/v1/buffers").set_json(&payload).to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert_eq!(text.matches("\"densidad_pob\"").count(), 1);

    let body: Value = serde_json::from_str(text).unwrap();
    assert_eq!(body[0]["densidad_pob"], 1592);
    assert_eq!(body[0]["nse_dominante"], "C");
    assert!(body[0].get("radio_display").is_none());
}

#[actix_web::test]
async fn test_buffers_null_properties_name_missing_field() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "type": "FeatureCollection",
        "features": [{ "type": "Feature", "geometry": null, "properties": null }]
    });

    let req = test::TestRequest::post().uri("/api/v1/buffers").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("radio_m"));
}

#[actix_web::test]
async fn test_wrong_geojson_type_is_rejected() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Point", "geometry": null, "properties": { "cvegeo": "A", "distancia_sitio_m": 1 } }
        ]
    });

    let req = test::TestRequest::post().uri("/api/v1/agebs").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let untyped = json!({ "features": [] });
    let req = test::TestRequest::post().uri("/api/v1/agebs").set_json(&untyped).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_establishments_endpoint() {
    let app = init_app!(AnalysisSettings::default());

    let req = test::TestRequest::post()
        .uri("/api/v1/establishments")
        .set_json(&denue_collection())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 4);
    assert_eq!(body["bySector"][0]["sector"], "72");
    assert_eq!(body["bySector"][0]["count"], 3);
    assert_eq!(
        body["bySector"][0]["nombres"],
        json!(["Tacos El Charro", "Cafe Centro", "Birria Don Chuy"])
    );
    assert_eq!(body["byActividad"][0], json!({ "actividad": "Restaurantes a la carta", "count": 2 }));
    assert_eq!(body["byTamano"][0], json!({ "tamano": "0 a 5 personas", "count": 3 }));
    assert_eq!(body["raw"].as_array().unwrap().len(), 4);
    assert_eq!(body["raw"][0]["properties"]["id"], "Tacos El Charro");
}

#[actix_web::test]
async fn test_density_uses_configured_site() {
    let app = init_app!(analysis_settings(Some(SITE), ExtraFeaturePolicy::UseFirst));

    let req = test::TestRequest::post()
        .uri("/api/v1/establishments/density")
        .set_json(&json!({ "features": denue_collection(), "radii": [100, 500, 5000] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // Points sit at ~0 m, ~222 m, ~1001 m and ~4448 m north of the site
    let counts: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|ring| ring["count"].as_u64().unwrap())
        .collect();
    assert_eq!(counts, vec![1, 2, 4]);
    assert_eq!(body[0]["radio"], "100m");
    assert_eq!(body[2]["area_km2"], 78.54);
}

#[actix_web::test]
async fn test_density_without_origin_is_rejected() {
    let app = init_app!(AnalysisSettings::default());

    let req = test::TestRequest::post()
        .uri("/api/v1/establishments/density")
        .set_json(&json!({ "features": denue_collection() }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_density_rejects_unordered_radii() {
    let app = init_app!(AnalysisSettings::default());

    let req = test::TestRequest::post()
        .uri("/api/v1/establishments/density")
        .set_json(&json!({ "features": denue_collection(), "origin": SITE, "radii": [500, 100] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_isochrones_and_agebs_endpoints() {
    let app = init_app!(AnalysisSettings::default());

    let isochrones = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": null, "properties": { "tiempo_min": 10, "area_km2": 12.0, "radio_aprox_m": 2000 } },
            { "type": "Feature", "geometry": null, "properties": { "tiempo_min": 5, "area_km2": 5.0, "radio_aprox_m": 1000 } }
        ]
    });
    let req = test::TestRequest::post().uri("/api/v1/isochrones").set_json(&isochrones).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body[0]["tiempo_min"], 5.0);
    assert_eq!(body[0]["eficiencia"], 159.2);
    assert_eq!(body[0]["area_buffer_equiv"], 3.14);
    assert_eq!(body[1]["area_buffer_equiv"], 12.57);

    let agebs = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": null, "properties": { "cvegeo": "B", "distancia_sitio_m": 800 } },
            { "type": "Feature", "geometry": null, "properties": { "cvegeo": "A", "distancia_sitio_m": 120 } }
        ]
    });
    let req = test::TestRequest::post().uri("/api/v1/agebs").set_json(&agebs).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body[0]["cvegeo"], "A");
    assert_eq!(body[1]["cvegeo"], "B");
    assert!(body[0]["geometry"].is_null());
}

fn nse_feature(index: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": SITE },
        "properties": {
            "nse_index": index, "nse_education": 0.71, "nse_housing": 0.64,
            "nse_assets": 0.58, "nse_economic": 0.49
        }
    })
}

#[actix_web::test]
async fn test_nse_components_policies() {
    let two = json!({ "type": "FeatureCollection", "features": [nse_feature(0.62), nse_feature(0.3)] });
    let empty = json!({ "type": "FeatureCollection", "features": [] });

    let app = init_app!(AnalysisSettings::default());
    let req = test::TestRequest::post().uri("/api/v1/nse-components").set_json(&two).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["nse_index"], 0.62);
    assert_eq!(body["componentes"]["vivienda"], 0.64);
    assert_eq!(body["geometry"]["type"], "Point");

    let req = test::TestRequest::post().uri("/api/v1/nse-components").set_json(&empty).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_null());

    let strict = init_app!(analysis_settings(None, ExtraFeaturePolicy::Reject));
    let req = test::TestRequest::post().uri("/api/v1/nse-components").set_json(&two).to_request();
    let resp = test::call_service(&strict, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_site_report() {
    let app = init_app!(AnalysisSettings::default());

    let payload = json!({
        "establishments": denue_collection(),
        "nse_components": { "type": "FeatureCollection", "features": [nse_feature(0.62)] },
        "origin": SITE
    });
    let req = test::TestRequest::post().uri("/api/v1/report").set_json(&payload).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["establishments"]["total"], 4);
    assert_eq!(body["radial_density"].as_array().unwrap().len(), 6);
    assert_eq!(body["nse_components"]["nse_index"], 0.62);
    assert!(body.get("buffers").is_none());
    assert!(body.get("isochrones").is_none());
}

#[actix_web::test]
async fn test_malformed_json_returns_json_error() {
    let app = init_app!(AnalysisSettings::default());

    let req = test::TestRequest::post()
        .uri("/api/v1/buffers")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}
