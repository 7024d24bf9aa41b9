//! Application declarations and their configuration.

use std::{fmt, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    error::UnknownValueError,
    naming::{is_bare_word, quote},
    option::JdlOption,
};

/// Well-known application option names.
pub mod options {
    pub const APPLICATION_TYPE: &str = "applicationType";
    pub const AUTHENTICATION_TYPE: &str = "authenticationType";
    pub const BASE_NAME: &str = "baseName";
    pub const BLUEPRINTS: &str = "blueprints";
    pub const BUILD_TOOL: &str = "buildTool";
    pub const CACHE_PROVIDER: &str = "cacheProvider";
    pub const CLIENT_FRAMEWORK: &str = "clientFramework";
    pub const DATABASE_TYPE: &str = "databaseType";
    pub const DEV_DATABASE_TYPE: &str = "devDatabaseType";
    pub const ENABLE_HIBERNATE_CACHE: &str = "enableHibernateCache";
    pub const JHI_PREFIX: &str = "jhiPrefix";
    pub const PROD_DATABASE_TYPE: &str = "prodDatabaseType";
    pub const REACTIVE: &str = "reactive";
    pub const SEARCH_ENGINE: &str = "searchEngine";
    pub const SERVER_PORT: &str = "serverPort";
    pub const SERVICE_DISCOVERY_TYPE: &str = "serviceDiscoveryType";
    pub const SKIP_USER_MANAGEMENT: &str = "skipUserManagement";
    pub const WEBSOCKET: &str = "websocket";
}

/// Options whose values are always written as string literals.
pub const QUOTED_OPTIONS: &[&str] = &[
    "jhipsterVersion",
    "jwtSecretKey",
    "rememberMeKey",
    "dtoSuffix",
    "entitySuffix",
    "clientThemeVariant",
];

/// The "no" sentinel used by enumerated options that can be switched off.
pub const NO: &str = "no";

/// Kind of generated application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplicationType {
    #[default]
    Monolith,
    Microservice,
    Gateway,
}

impl ApplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monolith => "monolith",
            Self::Microservice => "microservice",
            Self::Gateway => "gateway",
        }
    }
}

impl FromStr for ApplicationType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monolith" => Ok(Self::Monolith),
            "microservice" => Ok(Self::Microservice),
            "gateway" => Ok(Self::Gateway),
            _ => Err(UnknownValueError::new("application type", s)),
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplicationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Primary database family of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatabaseType {
    #[default]
    Sql,
    Mongodb,
    Cassandra,
    Couchbase,
    Neo4j,
    No,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Mongodb => "mongodb",
            Self::Cassandra => "cassandra",
            Self::Couchbase => "couchbase",
            Self::Neo4j => "neo4j",
            Self::No => NO,
        }
    }

    /// Document, graph and column stores that use one engine for dev and prod.
    pub fn is_non_relational(&self) -> bool {
        matches!(
            self,
            Self::Mongodb | Self::Cassandra | Self::Couchbase | Self::Neo4j
        )
    }

    /// Default `(prodDatabaseType, devDatabaseType)` for this family.
    pub fn default_engines(&self) -> (&'static str, &'static str) {
        match self {
            Self::Sql => ("postgresql", "h2Disk"),
            other => (other.as_str(), other.as_str()),
        }
    }
}

impl FromStr for DatabaseType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(Self::Sql),
            "mongodb" => Ok(Self::Mongodb),
            "cassandra" => Ok(Self::Cassandra),
            "couchbase" => Ok(Self::Couchbase),
            "neo4j" => Ok(Self::Neo4j),
            "no" => Ok(Self::No),
            _ => Err(UnknownValueError::new("database type", s)),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DatabaseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// A configuration value inside a `config { ... }` or `deployment { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Write the value in JDL syntax; `force_quotes` quotes text even when bare.
    pub fn write_jdl(&self, f: &mut dyn fmt::Write, force_quotes: bool) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write_text(f, value, force_quotes),
            Self::List(values) => {
                f.write_char('[')?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write_text(f, value, force_quotes)?;
                }
                f.write_char(']')
            }
        }
    }
}

fn write_text(f: &mut dyn fmt::Write, value: &str, force_quotes: bool) -> fmt::Result {
    if !force_quotes && is_bare_word(value) && value != "true" && value != "false" {
        f.write_str(value)
    } else {
        f.write_str(&quote(value))
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::List(values) => values.serialize(serializer),
        }
    }
}

/// Ordered `name → value` configuration map.
pub type ConfigMap = IndexMap<String, OptionValue>;

/// One `application { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JdlApplication {
    config: ConfigMap,
    blueprint_configs: IndexMap<String, ConfigMap>,
    entity_names: IndexSet<String>,
    options: Vec<JdlOption>,
}

impl JdlApplication {
    pub fn new(config: ConfigMap) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigMap {
        &mut self.config
    }

    pub fn get(&self, option: &str) -> Option<&OptionValue> {
        self.config.get(option)
    }

    /// Text value of `option`, if set and textual.
    pub fn text(&self, option: &str) -> Option<&str> {
        self.get(option).and_then(OptionValue::as_text)
    }

    pub fn base_name(&self) -> &str {
        self.text(options::BASE_NAME).unwrap_or_default()
    }

    /// The declared application type; unknown or missing values read as monolith.
    pub fn application_type(&self) -> ApplicationType {
        self.text(options::APPLICATION_TYPE)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn database_type(&self) -> DatabaseType {
        self.text(options::DATABASE_TYPE)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn prod_database_type(&self) -> Option<&str> {
        self.text(options::PROD_DATABASE_TYPE)
    }

    pub fn dev_database_type(&self) -> Option<&str> {
        self.text(options::DEV_DATABASE_TYPE)
    }

    pub fn search_engine(&self) -> Option<&str> {
        self.text(options::SEARCH_ENGINE)
    }

    pub fn reactive(&self) -> bool {
        self.get(options::REACTIVE)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    pub fn jhi_prefix(&self) -> &str {
        self.text(options::JHI_PREFIX).unwrap_or("jhi")
    }

    pub fn blueprints(&self) -> &[String] {
        self.get(options::BLUEPRINTS)
            .and_then(OptionValue::as_list)
            .unwrap_or_default()
    }

    pub fn blueprint_configs(&self) -> &IndexMap<String, ConfigMap> {
        &self.blueprint_configs
    }

    pub fn add_blueprint_config(&mut self, blueprint: impl Into<String>, config: ConfigMap) {
        self.blueprint_configs
            .entry(blueprint.into())
            .or_default()
            .extend(config);
    }

    pub fn entity_names(&self) -> &IndexSet<String> {
        &self.entity_names
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entity_names.contains(name)
    }

    pub fn add_entity_name(&mut self, name: impl Into<String>) {
        self.entity_names.insert(name.into());
    }

    pub fn options(&self) -> &[JdlOption] {
        &self.options
    }

    pub fn add_option(&mut self, option: JdlOption) {
        self.options.push(option);
    }
}

/// Built-in configuration defaults for an application of the given kind.
///
/// Only options absent from the declared configuration are filled in; the
/// base name is never defaulted.
pub fn default_config(application_type: ApplicationType, database_type: DatabaseType) -> ConfigMap {
    let (prod, dev) = database_type.default_engines();
    let is_microservice = application_type == ApplicationType::Microservice;
    let is_monolith = application_type == ApplicationType::Monolith;

    let mut config = ConfigMap::new();
    let mut set = |name: &str, value: OptionValue| {
        config.insert(name.to_string(), value);
    };

    set(options::APPLICATION_TYPE, OptionValue::text(application_type.as_str()));
    set(options::AUTHENTICATION_TYPE, OptionValue::text("jwt"));
    set(options::BUILD_TOOL, OptionValue::text("maven"));
    set(
        options::CACHE_PROVIDER,
        OptionValue::text(match (database_type, is_monolith) {
            (DatabaseType::Sql, true) => "ehcache",
            (DatabaseType::Sql, false) => "hazelcast",
            _ => NO,
        }),
    );
    set(
        options::CLIENT_FRAMEWORK,
        OptionValue::text(if is_microservice { NO } else { "angular" }),
    );
    set("clientPackageManager", OptionValue::text("npm"));
    set(options::DATABASE_TYPE, OptionValue::text(database_type.as_str()));
    set(options::PROD_DATABASE_TYPE, OptionValue::text(prod));
    set(options::DEV_DATABASE_TYPE, OptionValue::text(dev));
    set(
        options::ENABLE_HIBERNATE_CACHE,
        OptionValue::Boolean(database_type == DatabaseType::Sql),
    );
    set("enableSwaggerCodegen", OptionValue::Boolean(false));
    set("enableTranslation", OptionValue::Boolean(true));
    set(options::JHI_PREFIX, OptionValue::text("jhi"));
    set("languages", OptionValue::List(vec!["en".to_string(), "fr".to_string()]));
    set("messageBroker", OptionValue::text(NO));
    set("nativeLanguage", OptionValue::text("en"));
    set("packageName", OptionValue::text("com.mycompany.myapp"));
    set(options::REACTIVE, OptionValue::Boolean(false));
    set(options::SEARCH_ENGINE, OptionValue::text(NO));
    set(
        options::SERVER_PORT,
        OptionValue::Integer(if is_microservice { 8081 } else { 8080 }),
    );
    set(
        options::SERVICE_DISCOVERY_TYPE,
        OptionValue::text(if is_monolith { NO } else { "consul" }),
    );
    set("skipClient", OptionValue::Boolean(is_microservice));
    set("skipServer", OptionValue::Boolean(false));
    set(
        options::SKIP_USER_MANAGEMENT,
        OptionValue::Boolean(is_microservice),
    );
    set("testFrameworks", OptionValue::List(Vec::new()));
    set(options::WEBSOCKET, OptionValue::text(NO));
    set("withAdminUi", OptionValue::Boolean(!is_microservice));

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_type_round_trip() {
        for kind in [
            ApplicationType::Monolith,
            ApplicationType::Microservice,
            ApplicationType::Gateway,
        ] {
            assert_eq!(kind.as_str().parse::<ApplicationType>(), Ok(kind));
        }
        assert!("desktop".parse::<ApplicationType>().is_err());
    }

    #[test]
    fn test_database_default_engines() {
        assert_eq!(DatabaseType::Sql.default_engines(), ("postgresql", "h2Disk"));
        assert_eq!(
            DatabaseType::Cassandra.default_engines(),
            ("cassandra", "cassandra")
        );
        assert!(DatabaseType::Mongodb.is_non_relational());
        assert!(!DatabaseType::No.is_non_relational());
    }

    #[test]
    fn test_default_config_microservice() {
        let config = default_config(ApplicationType::Microservice, DatabaseType::Sql);
        assert_eq!(config.get("serverPort"), Some(&OptionValue::Integer(8081)));
        assert_eq!(config.get("clientFramework"), Some(&OptionValue::text("no")));
        assert!(!config.contains_key("baseName"));
    }

    #[test]
    fn test_option_value_write_jdl() {
        let mut out = String::new();
        OptionValue::List(vec!["en".to_string(), "zh-cn".to_string()])
            .write_jdl(&mut out, false)
            .unwrap();
        assert_eq!(out, "[en, zh-cn]");

        let mut out = String::new();
        OptionValue::text("8.1.0").write_jdl(&mut out, false).unwrap();
        assert_eq!(out, "\"8.1.0\"");
    }

    #[test]
    fn test_application_accessors() {
        let mut config = ConfigMap::new();
        config.insert("baseName".to_string(), OptionValue::text("store"));
        config.insert("reactive".to_string(), OptionValue::Boolean(true));
        config.insert(
            "blueprints".to_string(),
            OptionValue::List(vec!["generator-jhipster-vuejs".to_string()]),
        );
        let app = JdlApplication::new(config);

        assert_eq!(app.base_name(), "store");
        assert!(app.reactive());
        assert_eq!(app.blueprints(), ["generator-jhipster-vuejs".to_string()]);
        assert_eq!(app.application_type(), ApplicationType::Monolith);
        assert_eq!(app.jhi_prefix(), "jhi");
    }
}
