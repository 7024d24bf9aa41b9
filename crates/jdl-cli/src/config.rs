//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML import settings from the explicit
//! path, the local project directory or the platform configuration directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use jdl::{JdlError, config::ImportConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for JdlError {
    fn from(err: ConfigError) -> Self {
        JdlError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Layout of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    import: ImportConfig,
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (jdl/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<ImportConfig, JdlError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("jdl/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "jdl", "jdl") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(ImportConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<ImportConfig, JdlError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<ImportConfig, JdlError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(file.import)
}

#[cfg(test)]
mod tests {
    use jdl_core::application::{ApplicationType, DatabaseType};

    use super::*;

    #[test]
    fn test_parse_import_section() {
        let config = parse_config(
            r#"
            [import]
            application_name = "store"
            application_type = "microservice"
            database_type = "mongodb"
            blueprints = ["vuejs"]
            skip_validation = true
            "#,
        )
        .unwrap();

        assert_eq!(config.application_name(), Some("store"));
        assert_eq!(config.application_type(), Some(ApplicationType::Microservice));
        assert_eq!(config.database_type(), Some(DatabaseType::Mongodb));
        assert_eq!(config.blueprints(), Some(&["vuejs".to_string()][..]));
        assert!(config.skip_validation());
        assert!(!config.unidirectional_relationships());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), ImportConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config("[import]\ncolour = \"red\"\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[import]\nunidirectional_relationships = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.unidirectional_relationships());
    }
}
