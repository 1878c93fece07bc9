use std::path::{Path, PathBuf};

use pr_metrics_core::config::{load_pr_metrics_config, MetricsConfig};
use pr_metrics_core::errors::ConfigLoadError;
use tracing::{debug, info};

use crate::errors::CliError;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".pr-metrics.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Get the path to the configuration file
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}

/// Load the metrics settings for a run.
///
/// A missing file is only an error when the path was given explicitly.
/// Otherwise the default settings are used.
pub fn load_metrics_config(config_path: Option<&str>) -> Result<MetricsConfig, CliError> {
    let path = get_config_path(config_path);
    load_metrics_config_from(&path, config_path.is_some())
}

/// Load the metrics settings from a specific file.
fn load_metrics_config_from(path: &Path, required: bool) -> Result<MetricsConfig, CliError> {
    debug!("Loading configuration from {:?}", path);

    match load_pr_metrics_config(path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            Ok(config.to_metrics_config())
        }
        Err(ConfigLoadError::NotFound(_)) if !required => {
            info!(
                "No configuration found at {:?}. Using the default settings.",
                path
            );
            Ok(MetricsConfig::default())
        }
        Err(e) => Err(CliError::ConfigError(format!(
            "Failed to load configuration: {}",
            e
        ))),
    }
}
