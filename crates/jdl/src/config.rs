use serde::Deserialize;

use jdl_core::application::{ApplicationType, DatabaseType};
use jdl_parser::JdlDefinition;

/// Caller settings of an import, loadable from a TOML file.
///
/// Every setting is optional; unset values fall back to the existing project
/// configuration and then to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Base name of the application when the JDL declares none
    application_name: Option<String>,

    /// Application type when the JDL declares no application
    application_type: Option<ApplicationType>,

    /// Database type when the JDL declares no application
    database_type: Option<DatabaseType>,

    /// Blueprints of the target application
    blueprints: Option<Vec<String>>,

    /// Only materialize relationship sides carrying an injected field
    unidirectional_relationships: bool,

    /// Skip the validation phase entirely
    skip_validation: bool,

    /// Vocabulary extension merged into the built-in one
    definition: Option<JdlDefinition>,
}

impl ImportConfig {
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    pub fn application_type(&self) -> Option<ApplicationType> {
        self.application_type
    }

    pub fn database_type(&self) -> Option<DatabaseType> {
        self.database_type
    }

    pub fn blueprints(&self) -> Option<&[String]> {
        self.blueprints.as_deref()
    }

    pub fn unidirectional_relationships(&self) -> bool {
        self.unidirectional_relationships
    }

    pub fn skip_validation(&self) -> bool {
        self.skip_validation
    }

    pub fn definition(&self) -> Option<&JdlDefinition> {
        self.definition.as_ref()
    }

    /// Override the application name.
    ///
    /// # Arguments
    ///
    /// * `name` - The base name used when the JDL declares no application.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_application_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = Some(application_type);
        self
    }

    pub fn with_database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = Some(database_type);
        self
    }

    pub fn with_blueprints(mut self, blueprints: Vec<String>) -> Self {
        self.blueprints = Some(blueprints);
        self
    }

    pub fn with_unidirectional_relationships(mut self, unidirectional: bool) -> Self {
        self.unidirectional_relationships = unidirectional;
        self
    }

    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    pub fn with_definition(mut self, definition: JdlDefinition) -> Self {
        self.definition = Some(definition);
        self
    }
}
