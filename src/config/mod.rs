mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration named by `CONFIG_PATH`, falling back to
/// `config.yaml`. Only a missing default file yields built-in defaults; an
/// explicitly named file must exist.
pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(config_path) => load_from(&config_path).await,
        Err(_) => match load_from(DEFAULT_CONFIG_PATH).await {
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Ok(Config::default())
            }
            other => other,
        },
    }
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to an all-defaults struct.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.model.model_path.trim().is_empty() || config.model.scaler_path.trim().is_empty() {
        return Err(Error::config("model.model_path and model.scaler_path must not be empty"));
    }
    if config.labels.positive == config.labels.negative {
        return Err(Error::config(format!(
            "labels.positive and labels.negative must differ, both are '{}'",
            config.labels.positive
        )));
    }
    Ok(())
}
