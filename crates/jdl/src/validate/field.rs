//! Field rules: names, types and the validation rules they carry.

use jdl_core::{
    JdlObject,
    application::{ApplicationType, DatabaseType},
    entity::JdlField,
    field_types::is_valid_type,
    naming::upper_first,
    reserved::{is_reserved_field_name, is_reserved_pagination_word},
};

use super::{EntityContext, Logger, Result, ValidationError, validation::validate_rule};

pub(super) fn validate_field(
    entity: &str,
    field: &JdlField,
    jdl: &JdlObject,
    ctx: &EntityContext<'_>,
    logger: &dyn Logger,
) -> Result<()> {
    if !is_field_name(&field.name) {
        return Err(ValidationError::InvalidFieldName {
            entity: entity.to_string(),
            field: field.name.clone(),
        });
    }

    if is_reserved_field_name(&field.name) {
        logger.warn(&format!(
            "The name '{}' is a reserved keyword, so it will be prefixed with the value of 'jhiPrefix' ('{}{}').",
            field.name,
            ctx.jhi_prefix,
            upper_first(&field.name)
        ));
    }

    let filtering = ctx.database_type == DatabaseType::Sql && !ctx.reactive;
    if filtering && is_reserved_pagination_word(&field.name) {
        return Err(ValidationError::PaginationFieldName {
            entity: entity.to_string(),
            field: field.name.clone(),
        });
    }

    let is_enum = jdl.enums().contains(&field.field_type);
    let unchecked = ctx.application_type == ApplicationType::Gateway;
    if !is_enum && !unchecked && !is_valid_type(ctx.database_type, &field.field_type) {
        return Err(ValidationError::InvalidFieldType {
            entity: entity.to_string(),
            field: field.name.clone(),
            field_type: field.field_type.clone(),
            database: ctx.database_type.to_string(),
        });
    }

    for validation in field.validations.values() {
        validate_rule(field, validation, is_enum)?;
    }
    Ok(())
}

fn is_field_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}
