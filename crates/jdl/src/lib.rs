//! JDL - import pipeline for the JDL application description language
//!
//! This library drives a JDL import from source text to per-application
//! entity descriptors: parsing and conversion (via `jdl-parser`), semantic
//! validation, relationship resolution and projection, and persistence.
//!
//! ```text
//! Source Text
//!     ↓ parse
//! JdlObject
//!     ↓ validate
//! JdlObject (checked)
//!     ↓ project
//! Projection
//!     ↓ export
//! .jhipster/<Entity>.json
//! ```

pub mod config;
pub mod export;
pub mod projection;
pub mod source;
pub mod validate;

mod error;

pub use jdl_core::JdlObject;
pub use jdl_parser::{ParseError, Runtime};

pub use error::JdlError;

use std::sync::Arc;

use log::{debug, info, trace};

use jdl_core::application::{ApplicationType, DatabaseType};
use jdl_parser::{ConvertConfig, runtime};

use config::ImportConfig;
use projection::{Projection, ProjectionConfig};
use source::{ProjectConfig, SourceReader};
use validate::{LogLogger, Logger, ValidationContext, ValidationSettings};

/// Application name used when neither the caller nor the project names one.
pub const DEFAULT_APPLICATION_NAME: &str = "jhipster";

/// The outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    pub jdl: JdlObject,
    pub projection: Projection,
}

/// Runs JDL imports with one set of caller settings.
///
/// # Examples
///
/// ```rust
/// use jdl::{JdlImporter, config::ImportConfig};
///
/// let importer = JdlImporter::new(ImportConfig::default())
///     .expect("Failed to resolve the vocabulary");
///
/// let result = importer
///     .import("entity Book { title String required }")
///     .expect("Failed to import");
///
/// let book = result.projection.entity("jhipster", "Book").unwrap();
/// assert_eq!(book.fields[0].field_validate_rules, vec!["required"]);
/// ```
pub struct JdlImporter {
    config: ImportConfig,
    runtime: Arc<Runtime>,
    project: Option<ProjectConfig>,
    logger: Arc<dyn Logger>,
}

impl JdlImporter {
    /// Create an importer, resolving the vocabulary for the configured extension.
    ///
    /// # Arguments
    ///
    /// * `config` - Caller settings of the import.
    ///
    /// # Errors
    ///
    /// Returns [`JdlError::Runtime`] when the vocabulary extension is invalid.
    pub fn new(config: ImportConfig) -> Result<Self, JdlError> {
        let runtime = runtime::resolve(config.definition())?;
        Ok(Self {
            config,
            runtime,
            project: None,
            logger: Arc::new(LogLogger),
        })
    }

    /// Use the settings of an existing project as fallbacks.
    pub fn with_project_config(mut self, project: Option<ProjectConfig>) -> Self {
        self.project = project;
        self
    }

    /// Route validation warnings to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Parse `source` into the domain model.
    ///
    /// # Errors
    ///
    /// Returns [`JdlError::Parse`] with the first lexical, syntax or
    /// conversion diagnostic.
    pub fn parse(&self, source: &str) -> Result<JdlObject, JdlError> {
        info!("Parsing JDL");
        let convert = ConvertConfig::new(
            self.explicit_application_name().map(str::to_string),
            Some(self.application_type()),
        );
        let jdl = jdl_parser::parse(source, &self.runtime, &convert)
            .map_err(|err| JdlError::new_parse_error(err, source))?;
        debug!(
            applications = jdl.application_count(),
            entities = jdl.entity_count(),
            relationships = jdl.relationship_count();
            "JDL parsed",
        );
        trace!(jdl:?; "Domain model");
        Ok(jdl)
    }

    /// Validate `jdl` with the caller's settings.
    ///
    /// # Errors
    ///
    /// Returns [`JdlError::Validation`] with the first violated rule.
    pub fn validate(&self, jdl: &JdlObject) -> Result<(), JdlError> {
        info!("Validating JDL");
        let settings = ValidationSettings {
            application_type: Some(self.application_type()),
            database_type: Some(self.database_type()),
            blueprints: self.blueprints(),
        };
        let ctx = ValidationContext::new(&self.runtime, self.logger.as_ref());
        validate::validate(jdl, &settings, &ctx)?;
        debug!("JDL validated");
        Ok(())
    }

    /// Project `jdl` into entity descriptors.
    pub fn project(&self, jdl: &JdlObject) -> Projection {
        info!("Projecting entities");
        let config = ProjectionConfig {
            application_name: self.application_name().to_string(),
            application_type: self.application_type(),
            unidirectional_relationships: self.config.unidirectional_relationships(),
        };
        let projection = projection::project(jdl, &config);
        info!(applications = projection.len(); "Entities projected");
        projection
    }

    /// Run the whole pipeline over `source`.
    ///
    /// # Errors
    ///
    /// Returns the first parse or validation error.
    pub fn import(&self, source: &str) -> Result<ImportResult, JdlError> {
        let jdl = self.parse(source)?;
        if self.config.skip_validation() {
            info!("Skipping validation");
        } else {
            self.validate(&jdl)?;
        }
        let projection = self.project(&jdl);
        Ok(ImportResult { jdl, projection })
    }

    /// Read the source from `reader` and import it.
    ///
    /// # Errors
    ///
    /// Returns a read error, or the first parse or validation error.
    pub fn import_from(&self, reader: &dyn SourceReader) -> Result<ImportResult, JdlError> {
        let source = reader.read_source()?;
        self.import(&source)
    }

    fn explicit_application_name(&self) -> Option<&str> {
        self.config.application_name().or_else(|| {
            self.project
                .as_ref()
                .and_then(|project| project.base_name.as_deref())
        })
    }

    fn application_name(&self) -> &str {
        self.explicit_application_name()
            .unwrap_or(DEFAULT_APPLICATION_NAME)
    }

    fn application_type(&self) -> ApplicationType {
        self.config
            .application_type()
            .or_else(|| self.project.as_ref()?.application_type)
            .unwrap_or(ApplicationType::Monolith)
    }

    fn database_type(&self) -> DatabaseType {
        self.config
            .database_type()
            .or_else(|| self.project.as_ref()?.database_type)
            .unwrap_or(DatabaseType::Sql)
    }

    fn blueprints(&self) -> Vec<String> {
        match self.config.blueprints() {
            Some(blueprints) => blueprints.to_vec(),
            None => self
                .project
                .as_ref()
                .map(|project| project.blueprints.clone())
                .unwrap_or_default(),
        }
    }
}
