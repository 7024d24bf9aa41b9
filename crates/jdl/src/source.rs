//! Collaborators that supply JDL text and the configuration of an existing project.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde::Deserialize;

use jdl_core::application::{ApplicationType, DatabaseType};

use crate::error::JdlError;

/// Supplies the JDL source of one import.
pub trait SourceReader {
    /// Read the complete source text.
    ///
    /// # Errors
    ///
    /// Returns [`JdlError::Read`] when a file cannot be read.
    fn read_source(&self) -> Result<String, JdlError>;
}

/// Reads and concatenates JDL files in the given order.
#[derive(Debug, Clone)]
pub struct FileSourceReader {
    paths: Vec<PathBuf>,
}

impl FileSourceReader {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl SourceReader for FileSourceReader {
    fn read_source(&self) -> Result<String, JdlError> {
        let mut source = String::new();
        for path in &self.paths {
            let content = fs::read_to_string(path).map_err(|err| JdlError::Read {
                path: path.clone(),
                source: err,
            })?;
            trace!(path:? = path, bytes = content.len(); "Read JDL file");
            source.push_str(&content);
            if !source.ends_with('\n') {
                source.push('\n');
            }
        }
        debug!(files = self.paths.len(), bytes = source.len(); "JDL sources read");
        Ok(source)
    }
}

/// JDL text held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSource(String);

impl InlineSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }
}

impl SourceReader for InlineSource {
    fn read_source(&self) -> Result<String, JdlError> {
        Ok(self.0.clone())
    }
}

/// Settings of an already generated application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub base_name: Option<String>,
    pub application_type: Option<ApplicationType>,
    pub database_type: Option<DatabaseType>,
    pub blueprints: Vec<String>,
}

/// Supplies the configuration of an existing project, when there is one.
pub trait ProjectConfigReader {
    /// Read the project configuration; `Ok(None)` means no project exists.
    ///
    /// # Errors
    ///
    /// Returns an error when a configuration exists but cannot be read.
    fn read_project_config(&self) -> Result<Option<ProjectConfig>, JdlError>;
}

/// Reads the `generator-jhipster` section of a `.yo-rc.json` file.
#[derive(Debug, Clone)]
pub struct JsonProjectConfigReader {
    path: PathBuf,
}

impl JsonProjectConfigReader {
    pub const FILE_NAME: &str = ".yo-rc.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reader for the `.yo-rc.json` of the project rooted at `directory`.
    pub fn in_directory(directory: impl AsRef<Path>) -> Self {
        Self::new(directory.as_ref().join(Self::FILE_NAME))
    }
}

#[derive(Deserialize)]
struct YoRc {
    #[serde(rename = "generator-jhipster")]
    generator: Option<GeneratorSection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratorSection {
    base_name: Option<String>,
    application_type: Option<ApplicationType>,
    database_type: Option<DatabaseType>,
    #[serde(default)]
    blueprints: Vec<Blueprint>,
}

/// Blueprints are listed either by name or as `{ "name": ... }` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum Blueprint {
    Name(String),
    Entry { name: String },
}

impl From<Blueprint> for String {
    fn from(blueprint: Blueprint) -> Self {
        match blueprint {
            Blueprint::Name(name) | Blueprint::Entry { name } => name,
        }
    }
}

impl ProjectConfigReader for JsonProjectConfigReader {
    fn read_project_config(&self) -> Result<Option<ProjectConfig>, JdlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path:? = self.path; "No existing project config");
                return Ok(None);
            }
            Err(source) => {
                return Err(JdlError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let yo_rc: YoRc = serde_json::from_str(&content)?;
        let Some(generator) = yo_rc.generator else {
            return Ok(None);
        };
        let config = ProjectConfig {
            base_name: generator.base_name,
            application_type: generator.application_type,
            database_type: generator.database_type,
            blueprints: generator.blueprints.into_iter().map(String::from).collect(),
        };
        debug!(config:?; "Existing project config read");
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sources_are_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.jdl");
        let second = dir.path().join("b.jdl");
        fs::write(&first, "entity A").unwrap();
        fs::write(&second, "entity B\n").unwrap();

        let source = FileSourceReader::new([&first, &second]).read_source().unwrap();
        assert_eq!(source, "entity A\nentity B\n");
    }

    #[test]
    fn test_missing_file_names_path() {
        let reader = FileSourceReader::new(["does/not/exist.jdl"]);
        let err = reader.read_source().unwrap_err();
        assert!(matches!(err, JdlError::Read { .. }));
        assert!(err.to_string().contains("does/not/exist.jdl"));
    }

    #[test]
    fn test_project_config() {
        let dir = tempfile::tempdir().unwrap();
        let reader = JsonProjectConfigReader::in_directory(dir.path());
        assert_eq!(reader.read_project_config().unwrap(), None);

        fs::write(
            dir.path().join(".yo-rc.json"),
            r#"{
                "generator-jhipster": {
                    "baseName": "store",
                    "applicationType": "microservice",
                    "databaseType": "mongodb",
                    "blueprints": ["vuejs", { "name": "kotlin", "version": "1.0.0" }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            reader.read_project_config().unwrap(),
            Some(ProjectConfig {
                base_name: Some("store".to_string()),
                application_type: Some(ApplicationType::Microservice),
                database_type: Some(DatabaseType::Mongodb),
                blueprints: vec!["vuejs".to_string(), "kotlin".to_string()],
            })
        );
    }
}
