//! Application configuration rules.

use log::debug;

use jdl_core::application::{
    ApplicationType, DatabaseType, JdlApplication, NO, OptionValue, options,
};
use jdl_parser::runtime::{OptionType, Runtime};

use super::{Result, ValidationError};

const REQUIRED_OPTIONS: [&str; 4] = [
    options::APPLICATION_TYPE,
    options::AUTHENTICATION_TYPE,
    options::BASE_NAME,
    options::BUILD_TOOL,
];

const SQL_PROD_DATABASES: [&str; 5] = ["mysql", "postgresql", "mariadb", "oracle", "mssql"];
const SQL_DEV_DATABASES: [&str; 2] = ["h2Disk", "h2Memory"];

pub(super) fn validate_application(application: &JdlApplication, runtime: &Runtime) -> Result<()> {
    debug!(base_name = application.base_name(); "Validating application");

    for name in REQUIRED_OPTIONS {
        if application.get(name).is_none() {
            return Err(ValidationError::MissingApplicationOption(name.to_string()));
        }
    }

    if application.application_type() == ApplicationType::Microservice
        && application.base_name().contains('_')
    {
        return Err(ValidationError::MicroserviceBaseName(
            application.base_name().to_string(),
        ));
    }

    for (name, value) in application.config() {
        check_option(runtime, name, value)?;
    }

    check_databases(application)?;

    let websocket = application.text(options::WEBSOCKET).unwrap_or(NO);
    if application.reactive() && websocket != NO {
        return Err(ValidationError::ReactiveWebsocket);
    }
    Ok(())
}

/// Check one option against its declared type, value set and pattern.
fn check_option(runtime: &Runtime, name: &str, value: &OptionValue) -> Result<()> {
    let Some(option) = runtime.application_option(name) else {
        return Err(ValidationError::UnknownApplicationOption(name.to_string()));
    };

    match (option.option_type(), value) {
        (OptionType::Boolean, OptionValue::Boolean(_))
        | (OptionType::Integer, OptionValue::Integer(_)) => Ok(()),
        (OptionType::Boolean, other) => Err(ValidationError::ExpectedBoolean {
            name: name.to_string(),
            value: display(other),
        }),
        (OptionType::Integer, other) => Err(ValidationError::ExpectedInteger {
            name: name.to_string(),
            value: display(other),
        }),
        (OptionType::List, OptionValue::List(items)) => {
            for item in items {
                if !option.accepts(item) {
                    return Err(ValidationError::UnknownOptionValue {
                        name: name.to_string(),
                        value: item.clone(),
                    });
                }
            }
            Ok(())
        }
        (OptionType::String | OptionType::List, other) => {
            let text = display(other);
            if !option.accepts(&text) {
                return Err(ValidationError::UnknownOptionValue {
                    name: name.to_string(),
                    value: text,
                });
            }
            if !option.matches_pattern(&text) {
                return Err(ValidationError::PatternMismatch {
                    name: name.to_string(),
                    value: text,
                    pattern: option.pattern().unwrap_or_default().to_string(),
                });
            }
            Ok(())
        }
    }
}

fn check_databases(application: &JdlApplication) -> Result<()> {
    let database = application.database_type();
    let prod = application.prod_database_type().unwrap_or_default();
    let dev = application.dev_database_type().unwrap_or_default();

    if database == DatabaseType::Sql {
        if !SQL_PROD_DATABASES.contains(&prod) {
            return Err(ValidationError::SqlProdDatabase(prod.to_string()));
        }
        if !SQL_DEV_DATABASES.contains(&dev) && dev != prod {
            return Err(ValidationError::SqlDevDatabase(dev.to_string()));
        }
        return Ok(());
    }

    if !database.is_non_relational() {
        return Ok(());
    }

    for (option, value) in [
        (options::PROD_DATABASE_TYPE, prod),
        (options::DEV_DATABASE_TYPE, dev),
    ] {
        if value != database.as_str() {
            return Err(ValidationError::DatabaseMismatch {
                database: database.to_string(),
                option: option.to_string(),
                value: value.to_string(),
            });
        }
    }

    let hibernate_cache = application
        .get(options::ENABLE_HIBERNATE_CACHE)
        .and_then(OptionValue::as_bool)
        .unwrap_or(false);
    if hibernate_cache {
        return Err(ValidationError::HibernateCacheNotSupported(
            database.to_string(),
        ));
    }
    Ok(())
}

fn display(value: &OptionValue) -> String {
    match value {
        OptionValue::Boolean(value) => value.to_string(),
        OptionValue::Integer(value) => value.to_string(),
        OptionValue::Text(value) => value.clone(),
        OptionValue::List(values) => values.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use jdl_core::application::{ConfigMap, default_config};

    use super::*;

    fn application(entries: &[(&str, OptionValue)]) -> JdlApplication {
        let mut config = ConfigMap::new();
        config.insert(options::BASE_NAME.to_string(), OptionValue::text("store"));
        for (name, value) in entries {
            config.insert(name.to_string(), value.clone());
        }
        let application_type = config
            .get(options::APPLICATION_TYPE)
            .and_then(OptionValue::as_text)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let database_type = config
            .get(options::DATABASE_TYPE)
            .and_then(OptionValue::as_text)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        for (name, value) in default_config(application_type, database_type) {
            config.entry(name).or_insert(value);
        }
        JdlApplication::new(config)
    }

    fn validate(entries: &[(&str, OptionValue)]) -> Result<()> {
        let runtime = Runtime::build(None).unwrap();
        validate_application(&application(entries), &runtime)
    }

    #[test]
    fn test_default_applications_are_valid() {
        assert_eq!(validate(&[]), Ok(()));
        for database in ["mongodb", "cassandra", "couchbase", "neo4j"] {
            assert_eq!(
                validate(&[(options::DATABASE_TYPE, OptionValue::text(database))]),
                Ok(())
            );
        }
    }

    #[test]
    fn test_microservice_base_name() {
        let result = validate(&[
            (options::BASE_NAME, OptionValue::text("my_service")),
            (options::APPLICATION_TYPE, OptionValue::text("microservice")),
        ]);
        assert_eq!(
            result,
            Err(ValidationError::MicroserviceBaseName("my_service".to_string()))
        );
    }

    #[test]
    fn test_unknown_option_and_values() {
        assert_eq!(
            validate(&[("frobnicate", OptionValue::Boolean(true))]),
            Err(ValidationError::UnknownApplicationOption("frobnicate".to_string()))
        );
        assert_eq!(
            validate(&[(options::REACTIVE, OptionValue::text("maybe"))]),
            Err(ValidationError::ExpectedBoolean {
                name: "reactive".to_string(),
                value: "maybe".to_string()
            })
        );
        assert_eq!(
            validate(&[(options::BUILD_TOOL, OptionValue::text("ant"))]),
            Err(ValidationError::UnknownOptionValue {
                name: "buildTool".to_string(),
                value: "ant".to_string()
            })
        );
        assert!(matches!(
            validate(&[("packageName", OptionValue::text("Com.Example"))]),
            Err(ValidationError::PatternMismatch { .. })
        ));
        assert!(matches!(
            validate(&[(
                "testFrameworks",
                OptionValue::List(vec!["cypress".to_string(), "selenium".to_string()])
            )]),
            Err(ValidationError::UnknownOptionValue { value, .. }) if value == "selenium"
        ));
    }

    #[test]
    fn test_sql_database_combinations() {
        assert_eq!(
            validate(&[(options::PROD_DATABASE_TYPE, OptionValue::text("mongodb"))]),
            Err(ValidationError::SqlProdDatabase("mongodb".to_string()))
        );
        assert_eq!(
            validate(&[
                (options::PROD_DATABASE_TYPE, OptionValue::text("mysql")),
                (options::DEV_DATABASE_TYPE, OptionValue::text("postgresql")),
            ]),
            Err(ValidationError::SqlDevDatabase("postgresql".to_string()))
        );
        assert_eq!(
            validate(&[
                (options::PROD_DATABASE_TYPE, OptionValue::text("mysql")),
                (options::DEV_DATABASE_TYPE, OptionValue::text("mysql")),
            ]),
            Ok(())
        );
    }

    #[test]
    fn test_document_databases() {
        assert!(matches!(
            validate(&[
                (options::DATABASE_TYPE, OptionValue::text("mongodb")),
                (options::DEV_DATABASE_TYPE, OptionValue::text("h2Disk")),
            ]),
            Err(ValidationError::DatabaseMismatch { .. })
        ));
        assert_eq!(
            validate(&[
                (options::DATABASE_TYPE, OptionValue::text("couchbase")),
                (options::ENABLE_HIBERNATE_CACHE, OptionValue::Boolean(true)),
            ]),
            Err(ValidationError::HibernateCacheNotSupported("couchbase".to_string()))
        );
    }

    #[test]
    fn test_reactive_websocket() {
        assert_eq!(
            validate(&[
                (options::REACTIVE, OptionValue::Boolean(true)),
                (options::WEBSOCKET, OptionValue::text("spring-websocket")),
            ]),
            Err(ValidationError::ReactiveWebsocket)
        );
    }
}
