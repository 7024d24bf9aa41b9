//! Turns one declared relationship into the entries of the entities it links.

use jdl_core::{
    annotation::Annotations,
    naming::lower_first,
    relationship::{JdlRelationship, RelationshipSide},
};

use super::descriptor::{RelationshipDescriptor, RelationshipSideKind};

/// A relationship entry together with the entity that carries it.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Materialized {
    pub entity: String,
    pub descriptor: RelationshipDescriptor,
}

/// Materialize the sides of `relationship`.
///
/// Bidirectional mode materializes both sides; unidirectional mode only the
/// sides carrying an injected field. The destination side of a relationship
/// to a built-in entity never materializes.
pub(super) fn materialize(
    relationship: &JdlRelationship,
    unidirectional: bool,
) -> Vec<Materialized> {
    let from = &relationship.from;
    let to = &relationship.to;
    let built_in = relationship.targets_built_in();

    let from_side = !unidirectional || from.injected_field.is_some();
    let to_side = !built_in && (!unidirectional || to.injected_field.is_some());

    let from_name = relationship_name(from, to);
    let to_name = relationship_name(to, from);

    let mut entries = Vec::with_capacity(2);
    if from_side {
        entries.push(Materialized {
            entity: from.entity.clone(),
            descriptor: RelationshipDescriptor {
                relationship_name: from_name.clone(),
                relationship_type: relationship.kind.as_json().to_string(),
                other_entity_name: lower_first(&to.entity),
                other_entity_relationship_name: to_side.then(|| to_name.clone()),
                relationship_side: RelationshipSideKind::Left,
                other_entity_field: from.display_field.clone(),
                relationship_validate_rules: validate_rules(from),
                documentation: from.documentation.clone(),
                options: side_options(from, relationship),
                relationship_with_built_in_entity: built_in,
            },
        });
    }
    if to_side {
        entries.push(Materialized {
            entity: to.entity.clone(),
            descriptor: RelationshipDescriptor {
                relationship_name: to_name,
                relationship_type: relationship.kind.reverse().as_json().to_string(),
                other_entity_name: lower_first(&from.entity),
                other_entity_relationship_name: from_side.then_some(from_name),
                relationship_side: RelationshipSideKind::Right,
                other_entity_field: to.display_field.clone(),
                relationship_validate_rules: validate_rules(to),
                documentation: to.documentation.clone(),
                options: side_options(to, relationship),
                relationship_with_built_in_entity: false,
            },
        });
    }
    entries
}

fn relationship_name(side: &RelationshipSide, other: &RelationshipSide) -> String {
    side.injected_field
        .clone()
        .unwrap_or_else(|| lower_first(&other.entity))
}

fn validate_rules(side: &RelationshipSide) -> Vec<String> {
    if side.required {
        vec!["required".to_string()]
    } else {
        Vec::new()
    }
}

fn side_options(side: &RelationshipSide, relationship: &JdlRelationship) -> Annotations {
    let mut options = side.annotations.clone();
    for (name, value) in &relationship.annotations {
        options.insert(name.clone(), value.clone());
    }
    options
}

#[cfg(test)]
mod tests {
    use jdl_core::{annotation::AnnotationValue, relationship::RelationshipKind};

    use super::*;

    fn many_to_one() -> JdlRelationship {
        JdlRelationship::new(
            RelationshipKind::ManyToOne,
            RelationshipSide::new("Book").with_injected_field("author"),
            RelationshipSide::new("Author").with_injected_field("book"),
        )
    }

    #[test]
    fn test_bidirectional_sides_name_each_other() {
        let entries = materialize(&many_to_one(), false);
        assert_eq!(entries.len(), 2);

        let book = &entries[0];
        assert_eq!(book.entity, "Book");
        assert_eq!(book.descriptor.relationship_type, "many-to-one");
        assert_eq!(book.descriptor.other_entity_name, "author");
        assert_eq!(book.descriptor.other_entity_relationship_name.as_deref(), Some("book"));
        assert_eq!(book.descriptor.relationship_side, RelationshipSideKind::Left);

        let author = &entries[1];
        assert_eq!(author.entity, "Author");
        assert_eq!(author.descriptor.relationship_type, "one-to-many");
        assert_eq!(author.descriptor.relationship_name, "book");
        assert_eq!(author.descriptor.other_entity_relationship_name.as_deref(), Some("author"));
        assert_eq!(author.descriptor.relationship_side, RelationshipSideKind::Right);
    }

    #[test]
    fn test_unidirectional_keeps_injected_sides() {
        let mut relationship = many_to_one();
        relationship.to.injected_field = None;

        let entries = materialize(&relationship, true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity, "Book");
        assert_eq!(entries[0].descriptor.other_entity_relationship_name, None);

        let both = materialize(&relationship, false);
        assert_eq!(both[1].descriptor.relationship_name, "book");
    }

    #[test]
    fn test_built_in_destination_stays_one_sided() {
        let mut relationship = JdlRelationship::new(
            RelationshipKind::OneToMany,
            RelationshipSide::new("Post").with_injected_field("user"),
            RelationshipSide::new("User"),
        );
        relationship.built_in_entity = true;
        relationship
            .annotations
            .insert("onDelete".to_string(), AnnotationValue::Text("CASCADE".to_string()));

        let entries = materialize(&relationship, false);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].descriptor.relationship_with_built_in_entity);
        assert_eq!(
            entries[0].descriptor.options.get("onDelete"),
            Some(&AnnotationValue::Text("CASCADE".to_string()))
        );
    }
}
