//! Relationship rules, including the cross-application check.

use indexmap::IndexSet;
use log::trace;

use jdl_core::{
    JdlObject,
    relationship::{JdlRelationship, RelationshipKind},
};

use super::{Result, ValidationError};

pub(super) fn validate_relationship(relationship: &JdlRelationship, jdl: &JdlObject) -> Result<()> {
    let kind = relationship.kind;
    let from = &relationship.from.entity;
    let to = &relationship.to.entity;
    trace!(kind = kind.as_jdl(), from = from.as_str(), to = to.as_str(); "Validating relationship");

    if relationship.from.injected_field.is_none() && relationship.to.injected_field.is_none() {
        return Err(ValidationError::MissingInjectedField {
            kind: kind.to_string(),
            from: from.clone(),
            to: to.clone(),
        });
    }
    if kind == RelationshipKind::OneToOne && relationship.from.injected_field.is_none() {
        return Err(ValidationError::OneToOneWithoutSourceField {
            from: from.clone(),
            to: to.clone(),
        });
    }
    if relationship.is_reflexive() && (relationship.from.required || relationship.to.required) {
        return Err(ValidationError::RequiredReflexive {
            from: from.clone(),
            to: to.clone(),
        });
    }
    if !jdl.has_entity(from) {
        return Err(ValidationError::UndeclaredSource {
            kind: kind.to_string(),
            entity: from.clone(),
            to: to.clone(),
        });
    }
    if !jdl.has_entity(to) && !relationship.targets_built_in() {
        return Err(ValidationError::UndeclaredDestination {
            kind: kind.to_string(),
            from: from.clone(),
            entity: to.clone(),
        });
    }
    Ok(())
}

/// Every application owning the source entity must also own the destination.
pub(super) fn validate_cross_application(jdl: &JdlObject) -> Result<()> {
    for relationship in jdl.relationships() {
        let source: IndexSet<&str> = jdl
            .applications_of(&relationship.from.entity)
            .map(|application| application.base_name())
            .collect();
        let destination: IndexSet<&str> = jdl
            .applications_of(&relationship.to.entity)
            .map(|application| application.base_name())
            .collect();
        if source.is_empty() || destination.is_empty() {
            continue;
        }

        if !source.is_subset(&destination) {
            return Err(ValidationError::CrossApplication {
                kind: relationship.kind.to_string(),
                from: relationship.from.entity.clone(),
                to: relationship.to.entity.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jdl_core::{entity::JdlEntity, relationship::RelationshipSide};

    use super::*;

    fn jdl_with(entities: &[&str]) -> JdlObject {
        let mut jdl = JdlObject::new();
        for name in entities {
            jdl.add_entity(JdlEntity::new(*name));
        }
        jdl
    }

    fn relationship(kind: RelationshipKind, from: RelationshipSide, to: &str) -> JdlRelationship {
        JdlRelationship::new(kind, from, RelationshipSide::new(to))
    }

    #[test]
    fn test_built_in_destination() {
        let jdl = jdl_with(&["Post"]);
        let mut to_account = relationship(
            RelationshipKind::ManyToOne,
            RelationshipSide::new("Post").with_injected_field("account"),
            "Account",
        );
        assert!(matches!(
            validate_relationship(&to_account, &jdl),
            Err(ValidationError::UndeclaredDestination { .. })
        ));

        to_account.built_in_entity = true;
        assert_eq!(validate_relationship(&to_account, &jdl), Ok(()));

        let to_user = relationship(
            RelationshipKind::ManyToOne,
            RelationshipSide::new("Post").with_injected_field("author"),
            "User",
        );
        assert_eq!(validate_relationship(&to_user, &jdl), Ok(()));
    }

    #[test]
    fn test_one_to_one_needs_source_field() {
        let jdl = jdl_with(&["A", "B"]);
        let mut one_to_one =
            relationship(RelationshipKind::OneToOne, RelationshipSide::new("A"), "B");
        one_to_one.to.injected_field = Some("a".to_string());
        assert_eq!(
            validate_relationship(&one_to_one, &jdl),
            Err(ValidationError::OneToOneWithoutSourceField {
                from: "A".to_string(),
                to: "B".to_string()
            })
        );
    }

    #[test]
    fn test_required_reflexive() {
        let jdl = jdl_with(&["Employee"]);
        let manager = relationship(
            RelationshipKind::ManyToOne,
            RelationshipSide::new("Employee")
                .with_injected_field("manager")
                .with_required(true),
            "Employee",
        );
        assert!(matches!(
            validate_relationship(&manager, &jdl),
            Err(ValidationError::RequiredReflexive { .. })
        ));
    }

    #[test]
    fn test_undeclared_source() {
        let jdl = jdl_with(&["B"]);
        let dangling = relationship(
            RelationshipKind::OneToMany,
            RelationshipSide::new("A").with_injected_field("b"),
            "B",
        );
        assert!(matches!(
            validate_relationship(&dangling, &jdl),
            Err(ValidationError::UndeclaredSource { .. })
        ));
    }
}
