use serde::Deserialize;

use crate::error::{CustlysisError, CustlysisResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `CUSTLYSIS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub ml: MlBridgeConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// External segmentation model invocation: `<program> <script> --action ...`.
#[derive(Debug, Clone, Deserialize)]
pub struct MlBridgeConfig {
    #[serde(default = "default_ml_program")]
    pub program: String,
    #[serde(default = "default_ml_script")]
    pub script: String,
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Wall-clock limit for one model process; the child is killed on expiry.
    #[serde(default = "default_ml_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of model processes running at once. Further calls wait.
    #[serde(default = "default_ml_max_concurrent")]
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Optional JSON document loaded into the record store at startup.
    #[serde(default)]
    pub seed_path: Option<String>,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_ml_program() -> String {
    "python".to_string()
}
fn default_ml_script() -> String {
    "customer_segmentation_model.py".to_string()
}
fn default_ml_timeout_secs() -> u64 {
    600
}
fn default_ml_max_concurrent() -> usize {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for MlBridgeConfig {
    fn default() -> Self {
        Self {
            program: default_ml_program(),
            script: default_ml_script(),
            working_dir: None,
            timeout_secs: default_ml_timeout_secs(),
            max_concurrent: default_ml_max_concurrent(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            ml: MlBridgeConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> CustlysisResult<Self> {
        Self::from_environment(config::Environment::with_prefix("CUSTLYSIS"))
    }

    fn from_environment(env: config::Environment) -> CustlysisResult<Self> {
        config::Config::builder()
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| CustlysisError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 8080);
        assert_eq!(config.ml.program, "python");
        assert_eq!(config.ml.script, "customer_segmentation_model.py");
        assert_eq!(config.ml.timeout_secs, 600);
        assert_eq!(config.ml.max_concurrent, 2);
        assert!(config.store.seed_path.is_none());
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"ml": {"program": "python3"}}"#).unwrap();
        assert_eq!(config.ml.program, "python3");
        assert_eq!(config.ml.timeout_secs, 600);
        assert_eq!(config.node_id, "node-01");
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("CUSTLYSIS").source(Some(map))
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_environment(env(&[
            ("CUSTLYSIS__NODE_ID", "node-07"),
            ("CUSTLYSIS__ML__TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.node_id, "node-07");
        assert_eq!(config.ml.timeout_secs, 30);
        assert_eq!(config.ml.max_concurrent, 2);
    }

    #[test]
    fn test_invalid_value_is_a_config_error() {
        let err = AppConfig::from_environment(env(&[("CUSTLYSIS__API__HTTP_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, CustlysisError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
