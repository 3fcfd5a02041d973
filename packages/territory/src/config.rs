//! Configuration loading.
//!
//! The default layout is compiled in from `config/default.toml`. A file
//! passed on the command line or through `SENIAURA_CONFIG` replaces it,
//! and `SENIAURA_DATA_DIR` rebases every relative path.

use std::path::{Path, PathBuf};

use seniaura_territory_models::SourceConfig;

use crate::LoadError;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "SENIAURA_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SENIAURA_DATA_DIR";

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`LoadError::Config`] if the text is not a valid configuration.
pub fn parse_config(text: &str) -> Result<SourceConfig, LoadError> {
    Ok(toml::from_str(text)?)
}

/// Returns the compiled-in default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is invalid, which is a build defect.
#[must_use]
pub fn default_config() -> SourceConfig {
    parse_config(DEFAULT_CONFIG).expect("embedded default config must parse")
}

/// Loads the configuration.
///
/// Reads `path` if given, else the file named by [`CONFIG_ENV`], else the
/// compiled-in default. [`DATA_DIR_ENV`] then overrides the data
/// directory.
///
/// # Errors
///
/// Returns [`LoadError`] if the configuration file cannot be read or
/// parsed.
pub fn load_config(path: Option<&Path>) -> Result<SourceConfig, LoadError> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let path = path.map(Path::to_path_buf).or(from_env);

    let mut config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            let text = std::fs::read_to_string(&path)?;
            parse_config(&text)?
        }
        None => default_config(),
    };

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        config.sources.data_dir = Some(PathBuf::from(dir));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = default_config();
        assert_eq!(config.fields.indicator_code, "CODE_EPCI");
        assert_eq!(config.fields.boundary_code, "EPCI_CODE");
        assert_eq!(config.fields.name, "nom_EPCI");
        assert_eq!(config.sources.delimiter, ',');
        assert!(config.sources.overlay.is_some());
    }

    #[test]
    fn minimal_config() {
        let text = r#"
            [sources]
            boundaries = "b.geojson"
            indicators = "i.csv"
            metadata = "m.csv"

            [fields]
            boundary_code = "code"
            indicator_code = "code"
            name = "name"
        "#;
        let config = parse_config(text).unwrap();
        assert!(config.sources.data_dir.is_none());
        assert!(config.sources.overlay.is_none());
        assert_eq!(config.sources.delimiter, ',');
        assert!(config.fields.boundary_name.is_none());
    }

    #[test]
    fn invalid_config() {
        let err = parse_config("[sources]\nboundaries = 3\n").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }
}
