use jdl_core::{
    JdlObject,
    application::{DatabaseType, NO},
    option::{BinaryOption, JdlOption},
};
use jdl_parser::Runtime;

use super::{Result, ValidationError};

/// Check one entity option against the database of the application it applies to.
pub(super) fn validate_option(
    option: &JdlOption,
    jdl: &JdlObject,
    runtime: &Runtime,
    database_type: DatabaseType,
) -> Result<()> {
    validate_option_entities(option, jdl)?;

    let JdlOption::Binary {
        option: binary,
        value,
        ..
    } = option
    else {
        return Ok(());
    };

    let accepted = runtime
        .binary_option_values(binary.as_str())
        .unwrap_or_default();
    if !accepted.is_empty() && !accepted.iter().any(|allowed| allowed == value) {
        return Err(ValidationError::InvalidOptionValue {
            option: binary.to_string(),
            value: value.clone(),
        });
    }

    if *binary == BinaryOption::Pagination
        && value != NO
        && database_type == DatabaseType::Cassandra
    {
        return Err(ValidationError::PaginationWithCassandra);
    }
    Ok(())
}

/// Every entity named by the option's include or exclude list must be declared.
pub(super) fn validate_option_entities(option: &JdlOption, jdl: &JdlObject) -> Result<()> {
    for entity in option.scope().referenced_names() {
        if !jdl.has_entity(entity) {
            return Err(ValidationError::UndeclaredOptionEntity {
                option: option.name().to_string(),
                entity: entity.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jdl_core::{entity::JdlEntity, option::EntityScope};

    use super::*;

    fn jdl() -> JdlObject {
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("Book"));
        jdl
    }

    #[test]
    fn test_pagination_with_cassandra() {
        let runtime = Runtime::build(None).unwrap();
        let paginate =
            JdlOption::binary(BinaryOption::Pagination, "pagination", EntityScope::all());
        assert_eq!(
            validate_option(&paginate, &jdl(), &runtime, DatabaseType::Sql),
            Ok(())
        );
        assert_eq!(
            validate_option(&paginate, &jdl(), &runtime, DatabaseType::Cassandra),
            Err(ValidationError::PaginationWithCassandra)
        );

        let disabled = JdlOption::binary(BinaryOption::Pagination, "no", EntityScope::all());
        assert_eq!(
            validate_option(&disabled, &jdl(), &runtime, DatabaseType::Cassandra),
            Ok(())
        );
    }

    #[test]
    fn test_option_values_and_entities() {
        let runtime = Runtime::build(None).unwrap();
        let dto = JdlOption::binary(BinaryOption::Dto, "automapper", EntityScope::all());
        assert_eq!(
            validate_option(&dto, &jdl(), &runtime, DatabaseType::Sql),
            Err(ValidationError::InvalidOptionValue {
                option: "dto".to_string(),
                value: "automapper".to_string()
            })
        );

        let suffix = JdlOption::binary(
            BinaryOption::AngularSuffix,
            "mySuffix",
            EntityScope::names(["Book"]),
        );
        assert_eq!(validate_option(&suffix, &jdl(), &runtime, DatabaseType::Sql), Ok(()));

        let dangling = JdlOption::binary(
            BinaryOption::Service,
            "serviceClass",
            EntityScope::names(["Author"]),
        );
        assert_eq!(
            validate_option(&dangling, &jdl(), &runtime, DatabaseType::Sql),
            Err(ValidationError::UndeclaredOptionEntity {
                option: "service".to_string(),
                entity: "Author".to_string()
            })
        );
    }
}
