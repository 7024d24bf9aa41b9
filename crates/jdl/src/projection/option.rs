use jdl_core::{
    annotation::AnnotationValue,
    option::{BinaryOption, JdlOption, UnaryOption},
};

use super::descriptor::EntityDescriptor;

/// Apply `option` to `descriptor` when its scope reaches the entity.
///
/// Options are applied in declaration order, so a later option for the same
/// key overwrites an earlier one.
pub(super) fn apply_option(descriptor: &mut EntityDescriptor, option: &JdlOption) {
    if !option.scope().includes(&descriptor.name) {
        return;
    }

    match option {
        JdlOption::Unary { option, .. } => match option {
            UnaryOption::SkipClient => descriptor.skip_client = true,
            UnaryOption::SkipServer => descriptor.skip_server = true,
            UnaryOption::NoFluentMethod => descriptor.fluent_methods = false,
            UnaryOption::Filter => descriptor.jpa_metamodel_filtering = true,
            UnaryOption::ReadOnly => descriptor.read_only = true,
            UnaryOption::Embedded => descriptor.embedded = true,
            UnaryOption::Custom(name) => {
                descriptor
                    .annotations
                    .insert(name.clone(), AnnotationValue::Flag);
            }
        },
        JdlOption::Binary { option, value, .. } => {
            let value = value.clone();
            match option {
                BinaryOption::Dto => descriptor.dto = value,
                BinaryOption::Service => descriptor.service = value,
                BinaryOption::Pagination => descriptor.pagination = value,
                BinaryOption::Search => descriptor.search_engine = Some(value),
                BinaryOption::Microservice => descriptor.microservice_name = Some(value),
                BinaryOption::AngularSuffix => descriptor.angular_js_suffix = Some(value),
                BinaryOption::ClientRootFolder => descriptor.client_root_folder = Some(value),
                BinaryOption::Custom(name) => {
                    descriptor
                        .annotations
                        .insert(name.clone(), AnnotationValue::coerce(&value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use jdl_core::{
        entity::JdlEntity,
        enumeration::JdlEnums,
        option::{EntityScope, EntitySelection},
    };

    use super::*;

    fn descriptor(name: &str) -> EntityDescriptor {
        EntityDescriptor::new(&JdlEntity::new(name), &JdlEnums::default(), "jhi")
    }

    #[test]
    fn test_later_options_override() {
        let mut book = descriptor("Book");
        apply_option(
            &mut book,
            &JdlOption::binary(BinaryOption::Service, "serviceClass", EntityScope::all()),
        );
        apply_option(
            &mut book,
            &JdlOption::binary(BinaryOption::Service, "serviceImpl", EntityScope::names(["Book"])),
        );
        assert_eq!(book.service, "serviceImpl");
    }

    #[test]
    fn test_excluded_entities_untouched() {
        let scope = EntityScope::new(EntitySelection::All, IndexSet::from(["Book".to_string()]));
        let filter = JdlOption::unary(UnaryOption::Filter, scope);

        let mut book = descriptor("Book");
        let mut author = descriptor("Author");
        apply_option(&mut book, &filter);
        apply_option(&mut author, &filter);
        assert!(!book.jpa_metamodel_filtering);
        assert!(author.jpa_metamodel_filtering);
    }

    #[test]
    fn test_custom_options_become_annotations() {
        let mut book = descriptor("Book");
        apply_option(
            &mut book,
            &JdlOption::unary(UnaryOption::Custom("skipTests".to_string()), EntityScope::all()),
        );
        apply_option(
            &mut book,
            &JdlOption::binary(
                BinaryOption::Custom("cqrs".to_string()),
                "axon",
                EntityScope::all(),
            ),
        );
        assert_eq!(book.annotations.get("skipTests"), Some(&AnnotationValue::Flag));
        assert_eq!(
            book.annotations.get("cqrs"),
            Some(&AnnotationValue::Text("axon".to_string()))
        );
    }
}
