//! Business-rule violations found by the validators.

use thiserror::Error;

/// The first rule a JDL object breaks.
///
/// Validation is fail-fast: the validators stop at the first violation and
/// return it, so one import reports at most one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // Caller settings
    #[error("The application type is required to validate a JDL without an application block.")]
    MissingApplicationType,

    #[error("The database type is required to validate a JDL without an application block.")]
    MissingDatabaseType,

    // Applications
    #[error("The application option '{0}' is required but missing.")]
    MissingApplicationOption(String),

    #[error("The base name '{0}' of a microservice application can not contain underscores.")]
    MicroserviceBaseName(String),

    #[error("Unknown application option '{0}'.")]
    UnknownApplicationOption(String),

    #[error("The option '{name}' expects a boolean value, got '{value}'.")]
    ExpectedBoolean { name: String, value: String },

    #[error("The option '{name}' expects an integer value, got '{value}'.")]
    ExpectedInteger { name: String, value: String },

    #[error("Unknown value '{value}' for the option '{name}'.")]
    UnknownOptionValue { name: String, value: String },

    #[error("The value '{value}' of the option '{name}' does not match the pattern '{pattern}'.")]
    PatternMismatch {
        name: String,
        value: String,
        pattern: String,
    },

    #[error(
        "Only 'mysql', 'postgresql', 'mariadb', 'oracle' and 'mssql' are allowed as prodDatabaseType values for databaseType 'sql', got '{0}'."
    )]
    SqlProdDatabase(String),

    #[error(
        "Only 'h2Memory', 'h2Disk' or the prodDatabaseType are allowed as devDatabaseType values for databaseType 'sql', got '{0}'."
    )]
    SqlDevDatabase(String),

    #[error("When the databaseType is '{database}', the {option} must be '{database}' too, got '{value}'.")]
    DatabaseMismatch {
        database: String,
        option: String,
        value: String,
    },

    #[error("An SQL second-level cache can't be used with the database type '{0}'.")]
    HibernateCacheNotSupported(String),

    #[error("Spring WebSocket is not supported with reactive applications.")]
    ReactiveWebsocket,

    // Entities and fields
    #[error("The name '{0}' is a reserved keyword and can not be used as an entity class name.")]
    ReservedEntityName(String),

    #[error("The entity name '{0}' must be written in upper camel case.")]
    InvalidEntityName(String),

    #[error("The field name '{field}' of the entity '{entity}' must start with a lower-case letter and contain only letters and digits.")]
    InvalidFieldName { entity: String, field: String },

    #[error(
        "The field name '{field}' of the entity '{entity}' is reserved for pagination and can not be used in a non-reactive SQL application."
    )]
    PaginationFieldName { entity: String, field: String },

    #[error("The type '{field_type}' of the field '{field}' in the entity '{entity}' is neither a {database} type nor a declared enum.")]
    InvalidFieldType {
        entity: String,
        field: String,
        field_type: String,
        database: String,
    },

    // Validation rules
    #[error("The validation '{validation}' of the field '{field}' requires a value.")]
    MissingValidationValue { validation: String, field: String },

    #[error("The validation '{validation}' of the field '{field}' takes no value.")]
    UnexpectedValidationValue { validation: String, field: String },

    #[error("The validation '{validation}' isn't supported for the type '{field_type}'.")]
    UnsupportedValidation {
        validation: String,
        field_type: String,
    },

    #[error("Decimal values are not allowed for the validation '{validation}' of the field '{field}', got '{value}'.")]
    DecimalValidationValue {
        validation: String,
        field: String,
        value: String,
    },

    #[error("The validation '{validation}' of the field '{field}' needs a non-negative integer, got '{value}'.")]
    InvalidLengthValue {
        validation: String,
        field: String,
        value: String,
    },

    // Relationships
    #[error("The {kind} relationship from '{from}' to '{to}' must declare an injected field on at least one side.")]
    MissingInjectedField {
        kind: String,
        from: String,
        to: String,
    },

    #[error("In the OneToOne relationship from '{from}' to '{to}', the source entity must have an injected field.")]
    OneToOneWithoutSourceField { from: String, to: String },

    #[error("Required relationships to the same entity are not supported, for the relationship from '{from}' to '{to}'.")]
    RequiredReflexive { from: String, to: String },

    #[error("The source entity '{entity}' of the {kind} relationship to '{to}' is not declared.")]
    UndeclaredSource {
        kind: String,
        entity: String,
        to: String,
    },

    #[error(
        "The destination entity '{entity}' of the {kind} relationship from '{from}' is not declared. Use `with builtInEntity` for a built-in entity."
    )]
    UndeclaredDestination {
        kind: String,
        from: String,
        entity: String,
    },

    #[error("Entities for the {kind} relationship from '{from}' to '{to}' do not belong to the same application.")]
    CrossApplication {
        kind: String,
        from: String,
        to: String,
    },

    // Enums
    #[error("The enum '{0}' is declared more than once.")]
    DuplicateEnum(String),

    #[error("The name '{0}' is a reserved keyword and can not be used as an enum class name.")]
    ReservedEnumName(String),

    // Deployments
    #[error("A gateway type must be provided when deploying microservices with docker-compose.")]
    MissingGatewayType,

    #[error("A kubernetes service type must be provided for {0} deployments.")]
    MissingServiceType(String),

    #[error("An ingress type is required when the kubernetes service type is 'Ingress' and istio is enabled.")]
    MissingIngressType,

    #[error("The storage type of a {kind} deployment can not be used with {reason}.")]
    IncompatibleStorageType { kind: String, reason: String },

    // Options
    #[error("Pagination isn't allowed when the app uses Cassandra.")]
    PaginationWithCassandra,

    #[error("The value '{value}' is not allowed for the option '{option}'.")]
    InvalidOptionValue { option: String, value: String },

    #[error("The entity '{entity}' used by the option '{option}' is not declared.")]
    UndeclaredOptionEntity { option: String, entity: String },
}
