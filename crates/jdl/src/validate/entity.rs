//! Entity rules: class names and table names.

use log::trace;

use jdl_core::{
    JdlObject,
    entity::JdlEntity,
    reserved::{is_reserved_class_name, is_reserved_table_name},
};

use super::{EntityContext, Logger, Result, ValidationError, field::validate_field};

pub(super) fn validate_entity(
    entity: &JdlEntity,
    jdl: &JdlObject,
    ctx: &EntityContext<'_>,
    logger: &dyn Logger,
) -> Result<()> {
    trace!(entity = entity.name.as_str(); "Validating entity");

    if is_reserved_class_name(&entity.name) {
        return Err(ValidationError::ReservedEntityName(entity.name.clone()));
    }
    if !is_upper_camel_case(&entity.name) {
        return Err(ValidationError::InvalidEntityName(entity.name.clone()));
    }
    if is_reserved_table_name(&entity.table_name) {
        logger.warn(&format!(
            "The table name '{}' of the entity '{}' is a reserved keyword, so it will be prefixed with the value of 'jhiPrefix' ('{}').",
            entity.table_name, entity.name, ctx.jhi_prefix
        ));
    }

    for field in entity.fields.values() {
        validate_field(&entity.name, field, jdl, ctx, logger)?;
    }
    Ok(())
}

fn is_upper_camel_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use jdl_core::application::{ApplicationType, DatabaseType};

    use super::*;
    use crate::validate::MemoryLogger;

    fn ctx() -> EntityContext<'static> {
        EntityContext {
            application_type: ApplicationType::Monolith,
            database_type: DatabaseType::Sql,
            reactive: false,
            jhi_prefix: "jhi",
        }
    }

    fn validate(entity: JdlEntity) -> (Result<()>, Vec<String>) {
        let logger = MemoryLogger::new();
        let mut jdl = JdlObject::new();
        jdl.add_entity(entity.clone());
        let result = validate_entity(&entity, &jdl, &ctx(), &logger);
        (result, logger.warnings())
    }

    #[test]
    fn test_reserved_class_name() {
        let (result, _) = validate(JdlEntity::new("Continue"));
        assert_eq!(
            result.unwrap_err().to_string(),
            "The name 'Continue' is a reserved keyword and can not be used as an entity class name."
        );
    }

    #[test]
    fn test_entity_name_case() {
        let (result, _) = validate(JdlEntity::new("jobHistory"));
        assert_eq!(
            result,
            Err(ValidationError::InvalidEntityName("jobHistory".to_string()))
        );
        assert_eq!(validate(JdlEntity::new("JobHistory")).0, Ok(()));
    }

    #[test]
    fn test_reserved_table_name_warns() {
        let (result, warnings) = validate(JdlEntity::new("Ordering").with_table_name("order"));
        assert_eq!(result, Ok(()));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'order'"));
    }
}
