//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Environment variable overriding `dataset.location`
pub const ENV_DATASET: &str = "WAYFARER_DATASET";

/// Environment variable overriding `matching.threshold`
pub const ENV_THRESHOLD: &str = "WAYFARER_THRESHOLD";

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or the standard locations.
    ///
    /// An explicit path must exist; standard locations are optional and
    /// fall back to defaults. Environment overrides are applied last, then
    /// the result is validated.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema, |key| std::env::var(key).ok())?;
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".wayfarer.toml", "wayfarer.toml", ".config/wayfarer.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path))
}

fn apply_env_overrides(
    schema: &mut ConfigSchema,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(location) = lookup(ENV_DATASET).filter(|v| !v.trim().is_empty()) {
        schema.dataset.location = location;
    }

    if let Some(raw) = lookup(ENV_THRESHOLD) {
        schema.matching.threshold = raw
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value("matching.threshold", format!("{ENV_THRESHOLD}={raw} is not a number")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.search.debounce_ms, 300);
    }

    #[test]
    fn test_config_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dataset]\nlocation = \"https://example.com/db.json\"").unwrap();

        let path = file.path().to_str().unwrap();
        let config = Config::load(Some(path)).unwrap();

        assert_eq!(config.path.as_deref(), Some(path));
        assert_eq!(config.schema.dataset.location, "https://example.com/db.json");
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let err = Config::load(Some("/definitely/not/here/wayfarer.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search\ntop_n = ").unwrap();

        let err = Config::load(Some(file.path().to_str().unwrap())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_env_overrides() {
        let mut schema = ConfigSchema::default();
        apply_env_overrides(&mut schema, |key| match key {
            ENV_DATASET => Some("/srv/data.json".to_string()),
            ENV_THRESHOLD => Some(" 0.25 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(schema.dataset.location, "/srv/data.json");
        assert_eq!(schema.matching.threshold, 0.25);
    }

    #[test]
    fn test_env_override_rejects_garbage_threshold() {
        let mut schema = ConfigSchema::default();
        let err = apply_env_overrides(&mut schema, |key| {
            (key == ENV_THRESHOLD).then(|| "loose".to_string())
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }
}
