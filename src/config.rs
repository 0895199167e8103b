use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "UFO_LENS_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "ufo-lens.json";

/// User-tunable settings.  Every field has a default, so `{}` is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Sightings CSV opened at startup.
    pub data_path: Option<PathBuf>,
    /// GeoJSON state boundaries for the map.
    pub geometry_path: Option<PathBuf>,
    /// Country whose raw points and per-year totals are shown.
    pub target_country: String,
    /// Year selected after loading; the latest year when unset.
    pub initial_year: Option<i32>,
    /// Domain of the threshold colour scale (sighting counts).
    pub count_thresholds: [f64; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            geometry_path: None,
            target_country: "us".to_string(),
            initial_year: None,
            count_thresholds: [50.0, 150.0, 250.0],
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: ViewerConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.target_country = config.target_country.trim().to_ascii_lowercase();
        Ok(config)
    }

    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the config from `UFO_LENS_CONFIG` or `./ufo-lens.json`.
    ///
    /// A missing default file is not an error.  An unreadable or malformed
    /// file is logged and replaced by defaults.
    pub fn discover() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = match explicit {
            Some(path) => path,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Self::default();
                }
                default
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = ViewerConfig::from_json(
            r#"{"target_country": " CA ", "initial_year": 1995, "count_thresholds": [1, 2, 3],
                "data_path": "data/scrubbed.csv"}"#,
        )
        .unwrap();

        assert_eq!(config.target_country, "ca");
        assert_eq!(config.initial_year, Some(1995));
        assert_eq!(config.count_thresholds, [1.0, 2.0, 3.0]);
        assert_eq!(config.data_path, Some(PathBuf::from("data/scrubbed.csv")));
        assert_eq!(config.geometry_path, None);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(ViewerConfig::from_json(r#"{"count_thresholds": "many"}"#).is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_year": 2001}}"#).unwrap();
        assert_eq!(ViewerConfig::load(file.path()).unwrap().initial_year, Some(2001));
    }
}
