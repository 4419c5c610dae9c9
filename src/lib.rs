//! Site Insights - geodata derivation for commercial site analysis reports
//!
//! This library turns pre-computed GeoJSON (buffer rings, DENUE establishments,
//! AGEBs, isochrones and NSE components) into the tables the report renders.
//! Every transform is a pure function over caller-supplied data.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    build_site_report, compute_isochrone_efficiency, distance, dominant_nse,
    extract_nse_components, group_establishments, haversine_distance, process_buffers,
    radial_density, sort_by_distance, TransformError,
};
pub use crate::models::{Feature, FeatureCollection, NseLevel, SiteReport};
