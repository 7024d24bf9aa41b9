//! Semantic validation of a converted [`JdlObject`].
//!
//! Validation is fail-fast: the first violated rule is returned as a
//! [`ValidationError`]. Findings that do not invalidate the model are handed
//! to a [`Logger`] as warnings.

mod application;
mod deployment;
mod entity;
mod enumeration;
mod error;
mod field;
mod logger;
mod option;
mod relationship;
mod validation;

use log::{debug, info};

use jdl_core::{
    JdlObject,
    application::{ApplicationType, DatabaseType, JdlApplication, NO},
    option::JdlOption,
};
use jdl_parser::Runtime;

pub use error::ValidationError;
pub use logger::{LogLogger, Logger, MemoryLogger};

use self::{
    application::validate_application,
    deployment::{DeploymentContext, validate_deployment},
    entity::validate_entity,
    enumeration::validate_enums,
    option::{validate_option, validate_option_entities},
    relationship::{validate_cross_application, validate_relationship},
};

pub(crate) type Result<T> = std::result::Result<T, ValidationError>;

const BLUEPRINT_WARNING: &str = "Blueprints are being used, the JDL validation phase is skipped.";

/// Caller settings used when the JDL declares no application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSettings {
    pub application_type: Option<ApplicationType>,
    pub database_type: Option<DatabaseType>,
    pub blueprints: Vec<String>,
}

/// Shared collaborators of a validation run.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub runtime: &'a Runtime,
    pub logger: &'a dyn Logger,
}

impl<'a> ValidationContext<'a> {
    pub fn new(runtime: &'a Runtime, logger: &'a dyn Logger) -> Self {
        Self { runtime, logger }
    }
}

/// What the entity and field rules need to know about the owning application.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntityContext<'a> {
    pub(crate) application_type: ApplicationType,
    pub(crate) database_type: DatabaseType,
    pub(crate) reactive: bool,
    pub(crate) jhi_prefix: &'a str,
}

/// Validate `jdl`, choosing the strategy from the presence of application blocks.
///
/// # Arguments
///
/// * `jdl` - The converted object, read-only.
/// * `settings` - Caller settings, only consulted without application blocks.
/// * `ctx` - Runtime vocabulary and warning sink.
///
/// # Errors
///
/// Returns the first rule the object violates.
pub fn validate(
    jdl: &JdlObject,
    settings: &ValidationSettings,
    ctx: &ValidationContext<'_>,
) -> Result<()> {
    if jdl.application_count() == 0 {
        validate_without_application(jdl, settings, ctx)
    } else {
        validate_with_applications(jdl, ctx)
    }
}

fn validate_without_application(
    jdl: &JdlObject,
    settings: &ValidationSettings,
    ctx: &ValidationContext<'_>,
) -> Result<()> {
    let application_type = settings
        .application_type
        .ok_or(ValidationError::MissingApplicationType)?;
    let database_type = settings
        .database_type
        .ok_or(ValidationError::MissingDatabaseType)?;

    if !settings.blueprints.is_empty() {
        ctx.logger.warn(BLUEPRINT_WARNING);
        return Ok(());
    }
    debug!(
        application_type = application_type.as_str(),
        database_type = database_type.as_str();
        "Validating without application",
    );

    let entity_ctx = EntityContext {
        application_type,
        database_type,
        reactive: false,
        jhi_prefix: "jhi",
    };
    for entity in jdl.entities() {
        validate_entity(entity, jdl, &entity_ctx, ctx.logger)?;
    }
    for relationship in jdl.relationships() {
        validate_relationship(relationship, jdl)?;
    }
    validate_enums(jdl)?;

    let deployment_ctx = DeploymentContext {
        application_type,
        database_type,
        search_engine: None,
    };
    for deployment in jdl.deployments() {
        validate_deployment(deployment, &deployment_ctx)?;
    }
    for option in jdl.options() {
        validate_option(option, jdl, ctx.runtime, database_type)?;
    }
    Ok(())
}

fn validate_with_applications(jdl: &JdlObject, ctx: &ValidationContext<'_>) -> Result<()> {
    let mut validated = 0;
    for application in jdl.applications() {
        let base_name = application.base_name();
        if !application.blueprints().is_empty() {
            info!(base_name; "Skipping validation of a blueprint application");
            ctx.logger.warn(BLUEPRINT_WARNING);
            continue;
        }
        debug!(base_name; "Validating application");
        validate_application(application, ctx.runtime)?;
        validate_application_content(jdl, application, ctx)?;
        validated += 1;
    }
    if validated == 0 {
        return Ok(());
    }

    // Global options reaching no application still name declared entities
    for option in jdl.options() {
        validate_option_entities(option, jdl)?;
    }
    validate_cross_application(jdl)
}

fn validate_application_content(
    jdl: &JdlObject,
    application: &JdlApplication,
    ctx: &ValidationContext<'_>,
) -> Result<()> {
    let database_type = application.database_type();
    let entity_ctx = EntityContext {
        application_type: application.application_type(),
        database_type,
        reactive: application.reactive(),
        jhi_prefix: application.jhi_prefix(),
    };

    for entity in jdl
        .entities()
        .filter(|entity| application.has_entity(&entity.name))
    {
        validate_entity(entity, jdl, &entity_ctx, ctx.logger)?;
    }

    let touches = |entity: &str| application.has_entity(entity) || !jdl.has_entity(entity);
    for relationship in jdl.relationships().filter(|relationship| {
        touches(&relationship.from.entity) || touches(&relationship.to.entity)
    }) {
        validate_relationship(relationship, jdl)?;
    }

    validate_enums(jdl)?;

    let deployment_ctx = DeploymentContext {
        application_type: application.application_type(),
        database_type,
        search_engine: application.search_engine().filter(|engine| *engine != NO),
    };
    for deployment in jdl.deployments() {
        validate_deployment(deployment, &deployment_ctx)?;
    }

    for option in application_options(jdl, application) {
        validate_option(option, jdl, ctx.runtime, database_type)?;
    }
    Ok(())
}

/// Global options that reach an entity of `application`, then its own options.
fn application_options<'a>(
    jdl: &'a JdlObject,
    application: &'a JdlApplication,
) -> impl Iterator<Item = &'a JdlOption> {
    jdl.options()
        .iter()
        .filter(move |option| {
            application
                .entity_names()
                .iter()
                .any(|entity| option.scope().includes(entity))
        })
        .chain(application.options())
}
