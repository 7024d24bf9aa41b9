//! The root domain graph for one JDL unit.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    application::{ConfigMap, JdlApplication, QUOTED_OPTIONS},
    deployment::JdlDeployment,
    entity::JdlEntity,
    enumeration::{JdlEnum, JdlEnums},
    option::JdlOption,
    relationship::JdlRelationship,
};

/// Everything declared by one JDL unit, after conversion.
///
/// Maps keep declaration order. Equality ignores the order of applications,
/// entities, relationships and deployments but not the order of options,
/// because later options override earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JdlObject {
    applications: IndexMap<String, JdlApplication>,
    entities: IndexMap<String, JdlEntity>,
    relationships: IndexMap<String, JdlRelationship>,
    enums: JdlEnums,
    deployments: IndexMap<String, JdlDeployment>,
    options: Vec<JdlOption>,
}

impl JdlObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_application(&mut self, application: JdlApplication) {
        self.applications
            .insert(application.base_name().to_string(), application);
    }

    pub fn applications(&self) -> impl Iterator<Item = &JdlApplication> {
        self.applications.values()
    }

    pub fn application(&self, base_name: &str) -> Option<&JdlApplication> {
        self.applications.get(base_name)
    }

    pub fn has_application(&self, base_name: &str) -> bool {
        self.applications.contains_key(base_name)
    }

    pub fn application_count(&self) -> usize {
        self.applications.len()
    }

    pub fn add_entity(&mut self, entity: JdlEntity) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn entities(&self) -> impl Iterator<Item = &JdlEntity> {
        self.entities.values()
    }

    pub fn entity(&self, name: &str) -> Option<&JdlEntity> {
        self.entities.get(name)
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Find a declared entity whose name equals `name` ignoring case.
    pub fn entity_ignoring_case(&self, name: &str) -> Option<&JdlEntity> {
        self.entities
            .values()
            .find(|entity| entity.name.eq_ignore_ascii_case(name))
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add a relationship; an identical declaration is kept once.
    pub fn add_relationship(&mut self, relationship: JdlRelationship) {
        self.relationships
            .entry(relationship.id())
            .or_insert(relationship);
    }

    pub fn relationships(&self) -> impl Iterator<Item = &JdlRelationship> {
        self.relationships.values()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn add_enum(&mut self, jdl_enum: JdlEnum) {
        self.enums.add(jdl_enum);
    }

    pub fn enums(&self) -> &JdlEnums {
        &self.enums
    }

    pub fn add_deployment(&mut self, deployment: JdlDeployment) {
        self.deployments
            .insert(deployment.kind().as_str().to_string(), deployment);
    }

    pub fn deployments(&self) -> impl Iterator<Item = &JdlDeployment> {
        self.deployments.values()
    }

    pub fn add_option(&mut self, option: JdlOption) {
        self.options.push(option);
    }

    pub fn options(&self) -> &[JdlOption] {
        &self.options
    }

    /// Applications owning `entity`, in declaration order.
    pub fn applications_of(&self, entity: &str) -> impl Iterator<Item = &JdlApplication> {
        self.applications()
            .filter(move |application| application.has_entity(entity))
    }

    /// Write the object as JDL source.
    ///
    /// `is_quoted` names the configuration options whose values are always
    /// written as string literals.
    pub fn write_jdl(
        &self,
        f: &mut dyn fmt::Write,
        is_quoted: &dyn Fn(&str) -> bool,
    ) -> fmt::Result {
        let mut started = false;

        for application in self.applications() {
            section_break(f, &mut started)?;
            write_application(f, application, is_quoted)?;
        }
        for deployment in self.deployments() {
            section_break(f, &mut started)?;
            f.write_str("deployment {\n")?;
            write_config(f, deployment.config(), "  ", is_quoted)?;
            f.write_str("}\n")?;
        }
        for entity in self.entities() {
            section_break(f, &mut started)?;
            writeln!(f, "{entity}")?;
        }
        for jdl_enum in self.enums.iter() {
            section_break(f, &mut started)?;
            writeln!(f, "{jdl_enum}")?;
        }

        let relationships: Vec<&JdlRelationship> = self.relationships().collect();
        for group in relationships.chunk_by(|left, right| left.kind == right.kind) {
            section_break(f, &mut started)?;
            writeln!(f, "relationship {} {{", group[0].kind)?;
            for (index, relationship) in group.iter().enumerate() {
                relationship.write_body(f, "  ")?;
                if index + 1 < group.len() {
                    f.write_str(",")?;
                }
                f.write_str("\n")?;
            }
            f.write_str("}\n")?;
        }

        if !self.options.is_empty() {
            section_break(f, &mut started)?;
            for option in &self.options {
                writeln!(f, "{option}")?;
            }
        }
        Ok(())
    }
}

fn section_break(f: &mut dyn fmt::Write, started: &mut bool) -> fmt::Result {
    if *started {
        f.write_str("\n")?;
    }
    *started = true;
    Ok(())
}

fn write_application(
    f: &mut dyn fmt::Write,
    application: &JdlApplication,
    is_quoted: &dyn Fn(&str) -> bool,
) -> fmt::Result {
    f.write_str("application {\n  config {\n")?;
    write_config(f, application.config(), "    ", is_quoted)?;
    f.write_str("  }\n")?;
    for (blueprint, config) in application.blueprint_configs() {
        writeln!(f, "  config({blueprint}) {{")?;
        write_config(f, config, "    ", is_quoted)?;
        f.write_str("  }\n")?;
    }
    if !application.entity_names().is_empty() {
        let names: Vec<&str> = application.entity_names().iter().map(String::as_str).collect();
        writeln!(f, "  entities {}", names.join(", "))?;
    }
    for option in application.options() {
        writeln!(f, "  {option}")?;
    }
    f.write_str("}\n")
}

fn write_config(
    f: &mut dyn fmt::Write,
    config: &ConfigMap,
    indent: &str,
    is_quoted: &dyn Fn(&str) -> bool,
) -> fmt::Result {
    for (name, value) in config {
        write!(f, "{indent}{name} ")?;
        value.write_jdl(f, is_quoted(name))?;
        f.write_str("\n")?;
    }
    Ok(())
}

/// Writes canonical JDL using the built-in quoted option names.
impl fmt::Display for JdlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_jdl(f, &|name| QUOTED_OPTIONS.contains(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::OptionValue,
        option::{EntityScope, UnaryOption},
        relationship::{RelationshipKind, RelationshipSide},
    };

    fn relationship(kind: RelationshipKind, from: &str, to: &str) -> JdlRelationship {
        JdlRelationship::new(
            kind,
            RelationshipSide::new(from).with_injected_field(crate::naming::lower_first(to)),
            RelationshipSide::new(to),
        )
    }

    #[test]
    fn test_duplicate_relationships_are_kept_once() {
        let mut object = JdlObject::new();
        object.add_relationship(relationship(RelationshipKind::ManyToOne, "A", "B"));
        object.add_relationship(relationship(RelationshipKind::ManyToOne, "A", "B"));
        object.add_relationship(relationship(RelationshipKind::OneToOne, "A", "B"));

        assert_eq!(object.relationship_count(), 2);
    }

    #[test]
    fn test_entity_ignoring_case() {
        let mut object = JdlObject::new();
        object.add_entity(JdlEntity::new("Employee"));

        assert!(object.entity_ignoring_case("EMPLOYEE").is_some());
        assert!(object.entity_ignoring_case("Job").is_none());
    }

    #[test]
    fn test_applications_of() {
        let mut first = ConfigMap::new();
        first.insert("baseName".to_string(), OptionValue::text("first"));
        let mut first = JdlApplication::new(first);
        first.add_entity_name("A");

        let mut second = ConfigMap::new();
        second.insert("baseName".to_string(), OptionValue::text("second"));
        let second = JdlApplication::new(second);

        let mut object = JdlObject::new();
        object.add_application(first);
        object.add_application(second);

        let owners: Vec<&str> = object.applications_of("A").map(|app| app.base_name()).collect();
        assert_eq!(owners, ["first"]);
    }

    #[test]
    fn test_display_groups_relationships_by_kind() {
        let mut object = JdlObject::new();
        object.add_entity(JdlEntity::new("A"));
        object.add_relationship(relationship(RelationshipKind::ManyToOne, "A", "B"));
        object.add_relationship(relationship(RelationshipKind::ManyToOne, "B", "C"));
        object.add_option(JdlOption::unary(UnaryOption::SkipClient, EntityScope::all()));

        assert_eq!(
            object.to_string(),
            "entity A (a)\n\nrelationship ManyToOne {\n  A{b} to B,\n  B{c} to C\n}\n\nskipClient *\n"
        );
    }
}
