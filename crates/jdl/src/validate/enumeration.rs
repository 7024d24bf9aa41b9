use jdl_core::{JdlObject, reserved::is_reserved_class_name};

use super::{Result, ValidationError};

pub(super) fn validate_enums(jdl: &JdlObject) -> Result<()> {
    if let Some(name) = jdl.enums().duplicates().first() {
        return Err(ValidationError::DuplicateEnum(name.clone()));
    }
    for jdl_enum in jdl.enums().iter() {
        if is_reserved_class_name(&jdl_enum.name) {
            return Err(ValidationError::ReservedEnumName(jdl_enum.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jdl_core::enumeration::{EnumValue, JdlEnum};

    use super::*;

    #[test]
    fn test_duplicate_enum() {
        let mut jdl = JdlObject::new();
        jdl.add_enum(JdlEnum::new("Color", vec![EnumValue::new("RED")]));
        assert_eq!(validate_enums(&jdl), Ok(()));

        jdl.add_enum(JdlEnum::new("Color", vec![EnumValue::new("BLUE")]));
        assert_eq!(
            validate_enums(&jdl),
            Err(ValidationError::DuplicateEnum("Color".to_string()))
        );
    }

    #[test]
    fn test_reserved_enum_name() {
        let mut jdl = JdlObject::new();
        jdl.add_enum(JdlEnum::new("Boolean", vec![EnumValue::new("YES")]));
        assert!(matches!(
            validate_enums(&jdl),
            Err(ValidationError::ReservedEnumName(_))
        ));
    }
}
