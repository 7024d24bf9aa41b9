//! Relationship resolution and projection into per-application descriptors.
//!
//! The projection assumes a validated [`JdlObject`]: every relationship
//! endpoint that is not a built-in entity is declared, and option scopes name
//! declared entities only.

mod descriptor;
mod option;
mod relationship;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use jdl_core::{
    JdlObject,
    application::ApplicationType,
    entity::JdlEntity,
    option::JdlOption,
};

pub use descriptor::{
    EntityDescriptor, FieldDescriptor, RelationshipDescriptor, RelationshipSideKind,
};

use self::{option::apply_option, relationship::materialize};

/// Caller settings for the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Base name of the implicit application used when the JDL declares none.
    pub application_name: String,
    /// Type of the implicit application.
    pub application_type: ApplicationType,
    /// Only materialize relationship sides that carry an injected field.
    pub unidirectional_relationships: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            application_name: "jhipster".to_string(),
            application_type: ApplicationType::Monolith,
            unidirectional_relationships: false,
        }
    }
}

/// Entity descriptors grouped by application base name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Projection {
    applications: IndexMap<String, Vec<EntityDescriptor>>,
}

impl Projection {
    pub fn applications(&self) -> impl Iterator<Item = (&str, &[EntityDescriptor])> {
        self.applications
            .iter()
            .map(|(name, entities)| (name.as_str(), entities.as_slice()))
    }

    pub fn entities(&self, application: &str) -> Option<&[EntityDescriptor]> {
        self.applications.get(application).map(Vec::as_slice)
    }

    pub fn entity(&self, application: &str, name: &str) -> Option<&EntityDescriptor> {
        self.entities(application)?
            .iter()
            .find(|entity| entity.name == name)
    }

    /// Number of projected applications.
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// One application being projected.
struct Target<'a> {
    base_name: &'a str,
    application_type: ApplicationType,
    jhi_prefix: &'a str,
    entities: Vec<&'a JdlEntity>,
    options: &'a [JdlOption],
}

/// Project `jdl` into entity descriptors.
///
/// # Arguments
///
/// * `jdl` - A validated JDL object.
/// * `config` - The implicit application and the relationship mode.
pub fn project(jdl: &JdlObject, config: &ProjectionConfig) -> Projection {
    let mut projection = Projection::default();

    if jdl.application_count() == 0 {
        let target = Target {
            base_name: &config.application_name,
            application_type: config.application_type,
            jhi_prefix: "jhi",
            entities: jdl.entities().collect(),
            options: &[],
        };
        let entities = project_application(jdl, &target, config);
        projection
            .applications
            .insert(config.application_name.clone(), entities);
        return projection;
    }

    for application in jdl.applications() {
        let target = Target {
            base_name: application.base_name(),
            application_type: application.application_type(),
            jhi_prefix: application.jhi_prefix(),
            entities: jdl
                .entities()
                .filter(|entity| application.has_entity(&entity.name))
                .collect(),
            options: application.options(),
        };
        let entities = project_application(jdl, &target, config);
        projection
            .applications
            .insert(application.base_name().to_string(), entities);
    }
    projection
}

fn project_application(
    jdl: &JdlObject,
    target: &Target<'_>,
    config: &ProjectionConfig,
) -> Vec<EntityDescriptor> {
    let mut descriptors: IndexMap<&str, EntityDescriptor> = IndexMap::new();

    for entity in &target.entities {
        let mut descriptor = EntityDescriptor::new(entity, jdl.enums(), target.jhi_prefix);
        descriptor.applications = if jdl.application_count() == 0 {
            vec![target.base_name.to_string()]
        } else {
            jdl.applications_of(&entity.name)
                .map(|application| application.base_name().to_string())
                .collect()
        };
        if target.application_type == ApplicationType::Microservice {
            descriptor.microservice_name = Some(target.base_name.to_string());
        }
        descriptors.insert(entity.name.as_str(), descriptor);
    }

    for option in jdl.options().iter().chain(target.options) {
        for descriptor in descriptors.values_mut() {
            apply_option(descriptor, option);
        }
    }

    for declared in jdl.relationships() {
        for entry in materialize(declared, config.unidirectional_relationships) {
            if let Some(descriptor) = descriptors.get_mut(entry.entity.as_str()) {
                trace!(
                    entity = entry.entity.as_str(),
                    relationship = entry.descriptor.relationship_name.as_str();
                    "Relationship materialized",
                );
                descriptor.relationships.push(entry.descriptor);
            }
        }
    }

    debug!(application = target.base_name, entities = descriptors.len(); "Application projected");
    descriptors.into_values().collect()
}
