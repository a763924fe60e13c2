use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Locations of the fitted artifacts loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: String,
}

/// Human-readable strings for the two predicted classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_positive_label")]
    pub positive: String,
    #[serde(default = "default_negative_label")]
    pub negative: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            positive: default_positive_label(),
            negative: default_negative_label(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model_path() -> String {
    "loan_model.json".to_string()
}

fn default_scaler_path() -> String {
    "scaler.json".to_string()
}

fn default_positive_label() -> String {
    "✅ Will Take Loan".to_string()
}

fn default_negative_label() -> String {
    "❌ Will Not Take Loan".to_string()
}
