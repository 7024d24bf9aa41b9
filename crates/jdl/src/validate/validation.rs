//! Validation-rule checks for a single field.

use jdl_core::{
    entity::{JdlField, JdlValidation, ValidationValue},
    field_types::supported_validations,
};

use super::{Result, ValidationError};

/// Check one rule of `field`; `is_enum` marks enum-typed fields.
pub(super) fn validate_rule(
    field: &JdlField,
    validation: &JdlValidation,
    is_enum: bool,
) -> Result<()> {
    let kind = validation.kind;

    match (&validation.value, kind.needs_value()) {
        (None, true) => {
            return Err(ValidationError::MissingValidationValue {
                validation: kind.to_string(),
                field: field.name.clone(),
            });
        }
        (Some(_), false) => {
            return Err(ValidationError::UnexpectedValidationValue {
                validation: kind.to_string(),
                field: field.name.clone(),
            });
        }
        _ => {}
    }

    // Types outside the catalogue were already accepted or rejected by the field check
    if let Some(supported) = supported_validations(&field.field_type, is_enum) {
        if !supported.contains(&kind) {
            return Err(ValidationError::UnsupportedValidation {
                validation: kind.to_string(),
                field_type: field.field_type.clone(),
            });
        }
    }

    if let Some(value) = &validation.value {
        if kind.is_length() {
            check_length_value(field, validation, value)?;
        }
    }
    Ok(())
}

/// Length and byte-size bounds are non-negative integers.
fn check_length_value(
    field: &JdlField,
    validation: &JdlValidation,
    value: &ValidationValue,
) -> Result<()> {
    if value.is_decimal() {
        return Err(ValidationError::DecimalValidationValue {
            validation: validation.kind.to_string(),
            field: field.name.clone(),
            value: value.to_string(),
        });
    }
    let in_range = match value {
        ValidationValue::Number(raw) => raw.parse::<i64>().is_ok_and(|length| length >= 0),
        ValidationValue::Pattern(_) => false,
    };
    if !in_range {
        return Err(ValidationError::InvalidLengthValue {
            validation: validation.kind.to_string(),
            field: field.name.clone(),
            value: value.to_string(),
        });
    }
    Ok(())
}
