use config::{Config, ConfigError, Environment, File};
use geo::Point;
use serde::Deserialize;
use std::path::Path;

use crate::core::DEFAULT_RADII_M;
use crate::models::ExtraFeaturePolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Maximum accepted JSON body, in bytes
    pub max_payload_bytes: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_payload_bytes: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_radii")]
    pub radii_m: Vec<f64>,
    /// Site analysed by this deployment; requests may override it
    #[serde(default)]
    pub site: Option<SiteSettings>,
    #[serde(default)]
    pub extra_features: ExtraFeaturePolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            radii_m: default_radii(),
            site: None,
            extra_features: ExtraFeaturePolicy::default(),
        }
    }
}

fn default_radii() -> Vec<f64> { DEFAULT_RADII_M.to_vec() }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SiteSettings {
    pub longitude: f64,
    pub latitude: f64,
}

impl SiteSettings {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SITE_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SITE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Site origin from configuration, if one is set
    pub fn site_origin(&self) -> Option<Point<f64>> {
        self.analysis.site.map(|site| site.point())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SITE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("analysis.radii_m")
}
