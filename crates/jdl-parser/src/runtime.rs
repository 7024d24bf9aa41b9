//! The resolved JDL vocabulary.
//!
//! A [`Runtime`] merges the built-in option tables with an optional
//! [`JdlDefinition`] extension and checks the result once. The lexer uses it
//! to classify words, the converter to coerce configuration values, and the
//! validators to check option names and values.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, OnceLock},
};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use jdl_core::{
    application::{QUOTED_OPTIONS, options as app},
    deployment::options as deploy,
    entity::ValidationKind,
    option::{BinaryOption, UnaryOption},
    relationship::RelationshipKind,
};

use crate::tokens::Keyword;

/// The value type of a configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
    Integer,
    String,
    List,
}

/// An option declared by a [`JdlDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct OptionSpec {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Accepted values; empty means any value.
    #[serde(default)]
    pub values: Vec<String>,
    /// Regular expression every value must match.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl OptionSpec {
    pub fn new(option_type: OptionType) -> Self {
        Self {
            option_type,
            values: Vec::new(),
            pattern: None,
        }
    }
}

/// A vocabulary extension, usually contributed by a blueprint.
///
/// Extension entries override built-in entries of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct JdlDefinition {
    #[serde(default)]
    pub application_options: BTreeMap<String, OptionSpec>,
    #[serde(default)]
    pub deployment_options: BTreeMap<String, OptionSpec>,
    #[serde(default)]
    pub unary_options: Vec<String>,
    /// Binary option name to accepted values; empty means any value.
    #[serde(default)]
    pub binary_options: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub quoted_options: Vec<String>,
}

impl JdlDefinition {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Errors found while checking a merged vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("the option name '{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("the option name '{name}' collides with the {kind} '{name}'")]
    ReservedName { name: String, kind: &'static str },

    #[error("the option '{0}' is declared both as a unary and as a binary option")]
    AmbiguousOption(String),

    #[error("the pattern of the option '{name}' does not compile: {message}")]
    InvalidPattern { name: String, message: String },
}

/// A resolved configuration option.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    option_type: OptionType,
    values: Vec<String>,
    pattern: Option<Regex>,
}

impl ConfigOption {
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Accepted values; empty means any value.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_enumerated(&self) -> bool {
        !self.values.is_empty()
    }

    /// Whether `value` belongs to the value set, when there is one.
    pub fn accepts(&self, value: &str) -> bool {
        self.values.is_empty() || self.values.iter().any(|allowed| allowed == value)
    }

    /// Whether `value` matches the option's pattern, when there is one.
    pub fn matches_pattern(&self, value: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(value))
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}

/// The immutable vocabulary shared by every stage of one import.
#[derive(Debug)]
pub struct Runtime {
    application_options: IndexMap<String, ConfigOption>,
    deployment_options: IndexMap<String, ConfigOption>,
    unary_options: IndexSet<String>,
    binary_options: IndexMap<String, Vec<String>>,
    quoted_options: IndexSet<String>,
}

impl Runtime {
    /// Merge the built-in vocabulary with `extension` and check the result.
    pub fn build(extension: Option<&JdlDefinition>) -> Result<Self, RuntimeError> {
        let mut definition = base_definition();
        if let Some(extension) = extension {
            merge(&mut definition, extension);
        }

        check_names(&definition)?;

        let runtime = Self {
            application_options: compile_options(&definition.application_options)?,
            deployment_options: compile_options(&definition.deployment_options)?,
            unary_options: definition.unary_options.iter().cloned().collect(),
            binary_options: definition
                .binary_options
                .iter()
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
            quoted_options: definition.quoted_options.iter().cloned().collect(),
        };

        debug!(
            application_options = runtime.application_options.len(),
            unary_options = runtime.unary_options.len(),
            binary_options = runtime.binary_options.len();
            "Runtime built",
        );
        Ok(runtime)
    }

    pub fn application_option(&self, name: &str) -> Option<&ConfigOption> {
        self.application_options.get(name)
    }

    pub fn application_option_names(&self) -> impl Iterator<Item = &str> {
        self.application_options.keys().map(String::as_str)
    }

    pub fn deployment_option(&self, name: &str) -> Option<&ConfigOption> {
        self.deployment_options.get(name)
    }

    pub fn is_unary_option(&self, name: &str) -> bool {
        self.unary_options.contains(name)
    }

    pub fn is_binary_option(&self, name: &str) -> bool {
        self.binary_options.contains_key(name)
    }

    /// Accepted values of a binary option; an empty slice means any value.
    pub fn binary_option_values(&self, name: &str) -> Option<&[String]> {
        self.binary_options.get(name).map(Vec::as_slice)
    }

    /// The binary option whose value set contains `value` (`mapstruct` → `dto`).
    ///
    /// The `no` sentinel belongs to every option and never selects one.
    pub fn binary_option_for_value(&self, value: &str) -> Option<BinaryOption> {
        if value == jdl_core::application::NO {
            return None;
        }
        self.binary_options
            .iter()
            .find(|(_, values)| values.iter().any(|allowed| allowed == value))
            .map(|(name, _)| parse_infallible(name))
    }

    pub fn unary_option(&self, name: &str) -> Option<UnaryOption> {
        self.is_unary_option(name).then(|| parse_infallible(name))
    }

    pub fn binary_option(&self, name: &str) -> Option<BinaryOption> {
        self.is_binary_option(name).then(|| parse_infallible(name))
    }

    pub fn is_quoted_option(&self, name: &str) -> bool {
        self.quoted_options.contains(name)
    }

    pub fn validation_kind(&self, word: &str) -> Option<ValidationKind> {
        word.parse().ok()
    }

    pub fn relationship_kind(&self, word: &str) -> Option<RelationshipKind> {
        word.parse().ok()
    }
}

fn parse_infallible<T>(name: &str) -> T
where
    T: std::str::FromStr<Err = std::convert::Infallible>,
{
    match name.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Resolve the runtime for `extension`, building it at most once.
pub fn resolve(extension: Option<&JdlDefinition>) -> Result<Arc<Runtime>, RuntimeError> {
    static DEFAULT: OnceLock<Arc<Runtime>> = OnceLock::new();
    static EXTENDED: OnceLock<Mutex<HashMap<JdlDefinition, Arc<Runtime>>>> = OnceLock::new();

    let extension = extension.filter(|definition| !definition.is_empty());
    let Some(extension) = extension else {
        if let Some(runtime) = DEFAULT.get() {
            return Ok(Arc::clone(runtime));
        }
        let runtime = Arc::new(Runtime::build(None)?);
        return Ok(Arc::clone(DEFAULT.get_or_init(|| runtime)));
    };

    let cache = EXTENDED.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(runtime) = cache.get(extension) {
        return Ok(Arc::clone(runtime));
    }

    let runtime = Arc::new(Runtime::build(Some(extension))?);
    info!(cached = cache.len() + 1; "Extended runtime built");
    cache.insert(extension.clone(), Arc::clone(&runtime));
    Ok(runtime)
}

fn merge(base: &mut JdlDefinition, extension: &JdlDefinition) {
    for (name, spec) in &extension.application_options {
        base.application_options.insert(name.clone(), spec.clone());
    }
    for (name, spec) in &extension.deployment_options {
        base.deployment_options.insert(name.clone(), spec.clone());
    }
    for name in &extension.unary_options {
        if !base.unary_options.contains(name) {
            base.unary_options.push(name.clone());
        }
    }
    for (name, values) in &extension.binary_options {
        base.binary_options.insert(name.clone(), values.clone());
    }
    for name in &extension.quoted_options {
        if !base.quoted_options.contains(name) {
            base.quoted_options.push(name.clone());
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn check_names(definition: &JdlDefinition) -> Result<(), RuntimeError> {
    let option_names = definition
        .unary_options
        .iter()
        .chain(definition.binary_options.keys());

    for name in option_names {
        if !is_identifier(name) {
            return Err(RuntimeError::InvalidName(name.clone()));
        }
        let kind = if Keyword::from_word(name).is_some() {
            Some("keyword")
        } else if name.parse::<ValidationKind>().is_ok() {
            Some("validation")
        } else if name.parse::<RelationshipKind>().is_ok() {
            Some("relationship type")
        } else {
            None
        };
        if let Some(kind) = kind {
            return Err(RuntimeError::ReservedName {
                name: name.clone(),
                kind,
            });
        }
    }

    if let Some(name) = definition
        .unary_options
        .iter()
        .find(|name| definition.binary_options.contains_key(*name))
    {
        return Err(RuntimeError::AmbiguousOption(name.clone()));
    }

    let config_names = definition
        .application_options
        .keys()
        .chain(definition.deployment_options.keys());
    for name in config_names {
        if !is_identifier(name) {
            return Err(RuntimeError::InvalidName(name.clone()));
        }
    }
    Ok(())
}

fn compile_options(
    specs: &BTreeMap<String, OptionSpec>,
) -> Result<IndexMap<String, ConfigOption>, RuntimeError> {
    specs
        .iter()
        .map(|(name, spec)| {
            let pattern = spec
                .pattern
                .as_deref()
                .map(Regex::new)
                .transpose()
                .map_err(|err| RuntimeError::InvalidPattern {
                    name: name.clone(),
                    message: err.to_string(),
                })?;
            Ok((
                name.clone(),
                ConfigOption {
                    option_type: spec.option_type,
                    values: spec.values.clone(),
                    pattern,
                },
            ))
        })
        .collect()
}

fn enumerated(values: &[&str]) -> OptionSpec {
    OptionSpec {
        option_type: OptionType::String,
        values: values.iter().map(|value| value.to_string()).collect(),
        pattern: None,
    }
}

fn patterned(pattern: &str) -> OptionSpec {
    OptionSpec {
        option_type: OptionType::String,
        values: Vec::new(),
        pattern: Some(pattern.to_string()),
    }
}

fn base_definition() -> JdlDefinition {
    use OptionType::{Boolean, Integer, List, String as Text};

    let dev_databases = [
        "h2Disk", "h2Memory", "mysql", "mariadb", "postgresql", "oracle", "mssql", "mongodb",
        "cassandra", "couchbase", "neo4j", "no",
    ];

    let mut application = BTreeMap::new();
    let mut add = |name: &str, spec: OptionSpec| {
        application.insert(name.to_string(), spec);
    };
    add(app::APPLICATION_TYPE, enumerated(&["monolith", "microservice", "gateway"]));
    add(app::AUTHENTICATION_TYPE, enumerated(&["jwt", "session", "oauth2"]));
    add(app::BASE_NAME, patterned("^[A-Za-z][A-Za-z0-9_]*$"));
    add(app::BLUEPRINTS, OptionSpec::new(List));
    add(app::BUILD_TOOL, enumerated(&["maven", "gradle"]));
    add(
        app::CACHE_PROVIDER,
        enumerated(&["caffeine", "ehcache", "hazelcast", "infinispan", "memcached", "redis", "no"]),
    );
    add(app::CLIENT_FRAMEWORK, enumerated(&["angular", "react", "vue", "no"]));
    add("clientPackageManager", enumerated(&["npm"]));
    add("clientTheme", OptionSpec::new(Text));
    add("clientThemeVariant", OptionSpec::new(Text));
    add("creationTimestamp", OptionSpec::new(Integer));
    add(
        app::DATABASE_TYPE,
        enumerated(&["sql", "mongodb", "cassandra", "couchbase", "neo4j", "no"]),
    );
    add(app::DEV_DATABASE_TYPE, enumerated(&dev_databases));
    add("dtoSuffix", OptionSpec::new(Text));
    add(app::ENABLE_HIBERNATE_CACHE, OptionSpec::new(Boolean));
    add("enableSwaggerCodegen", OptionSpec::new(Boolean));
    add("enableTranslation", OptionSpec::new(Boolean));
    add("entitySuffix", OptionSpec::new(Text));
    add(app::JHI_PREFIX, patterned("^[A-Za-z][A-Za-z0-9_-]*$"));
    add("jhipsterVersion", OptionSpec::new(Text));
    add("jwtSecretKey", OptionSpec::new(Text));
    add("languages", OptionSpec::new(List));
    add("messageBroker", enumerated(&["kafka", "pulsar", "no"]));
    add("microfrontend", OptionSpec::new(Boolean));
    add("microfrontends", OptionSpec::new(List));
    add("nativeLanguage", OptionSpec::new(Text));
    add("packageFolder", OptionSpec::new(Text));
    add("packageName", patterned(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)*$"));
    add(app::PROD_DATABASE_TYPE, enumerated(&dev_databases[2..]));
    add(app::REACTIVE, OptionSpec::new(Boolean));
    add("rememberMeKey", OptionSpec::new(Text));
    add(app::SEARCH_ENGINE, enumerated(&["elasticsearch", "couchbase", "no"]));
    add(app::SERVER_PORT, OptionSpec::new(Integer));
    add(app::SERVICE_DISCOVERY_TYPE, enumerated(&["consul", "eureka", "no"]));
    add("skipClient", OptionSpec::new(Boolean));
    add("skipServer", OptionSpec::new(Boolean));
    add(app::SKIP_USER_MANAGEMENT, OptionSpec::new(Boolean));
    add(
        "testFrameworks",
        OptionSpec {
            option_type: List,
            values: ["cypress", "protractor", "cucumber", "gatling"]
                .map(str::to_string)
                .to_vec(),
            pattern: None,
        },
    );
    add(app::WEBSOCKET, enumerated(&["spring-websocket", "no"]));
    add("withAdminUi", OptionSpec::new(Boolean));

    let mut deployment = BTreeMap::new();
    let mut add = |name: &str, spec: OptionSpec| {
        deployment.insert(name.to_string(), spec);
    };
    add(deploy::APPS_FOLDERS, OptionSpec::new(List));
    add(deploy::CLUSTERED_DB_APPS, OptionSpec::new(List));
    add(
        deploy::DEPLOYMENT_TYPE,
        enumerated(&["docker-compose", "kubernetes", "openshift"]),
    );
    add(deploy::DIRECTORY_PATH, OptionSpec::new(Text));
    add(deploy::DOCKER_PUSH_COMMAND, OptionSpec::new(Text));
    add(deploy::DOCKER_REPOSITORY_NAME, OptionSpec::new(Text));
    add(deploy::GATEWAY_TYPE, enumerated(&["SpringCloudGateway"]));
    add(deploy::INGRESS_DOMAIN, OptionSpec::new(Text));
    add(deploy::INGRESS_TYPE, enumerated(&["nginx", "gke"]));
    add(deploy::ISTIO, OptionSpec::new(Boolean));
    add(deploy::KUBERNETES_NAMESPACE, OptionSpec::new(Text));
    add(
        deploy::KUBERNETES_SERVICE_TYPE,
        enumerated(&["LoadBalancer", "NodePort", "Ingress"]),
    );
    add(deploy::KUBERNETES_STORAGE_CLASS_NAME, OptionSpec::new(Text));
    add(deploy::KUBERNETES_USE_DYNAMIC_STORAGE, OptionSpec::new(Boolean));
    add(deploy::MONITORING, enumerated(&["no", "prometheus"]));
    add(deploy::OPENSHIFT_NAMESPACE, OptionSpec::new(Text));
    add(deploy::REGISTRY_REPLICAS, OptionSpec::new(Integer));
    add(deploy::SERVICE_DISCOVERY_TYPE, enumerated(&["consul", "eureka", "no"]));
    add(deploy::STORAGE_TYPE, enumerated(&["ephemeral", "persistent"]));

    JdlDefinition {
        application_options: application,
        deployment_options: deployment,
        unary_options: UnaryOption::BUILT_IN
            .iter()
            .map(|option| option.as_str().to_string())
            .collect(),
        binary_options: BinaryOption::BUILT_IN
            .iter()
            .map(|option| {
                let values = option
                    .values()
                    .unwrap_or_default()
                    .iter()
                    .map(|value| value.to_string())
                    .collect();
                (option.as_str().to_string(), values)
            })
            .collect(),
        quoted_options: QUOTED_OPTIONS.iter().map(|name| name.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let runtime = Runtime::build(None).unwrap();

        assert!(runtime.is_unary_option("skipClient"));
        assert!(runtime.is_binary_option("paginate"));
        assert_eq!(runtime.binary_option_for_value("mapstruct"), Some(BinaryOption::Dto));
        assert_eq!(
            runtime.binary_option_for_value("infinite-scroll"),
            Some(BinaryOption::Pagination)
        );
        assert_eq!(runtime.binary_option_for_value("no"), None);
        assert!(runtime.is_quoted_option("jwtSecretKey"));
        assert_eq!(runtime.validation_kind("maxbytes"), Some(ValidationKind::MaxBytes));
        assert_eq!(
            runtime.relationship_kind("ManyToMany"),
            Some(RelationshipKind::ManyToMany)
        );
    }

    #[test]
    fn test_application_option_checks() {
        let runtime = Runtime::build(None).unwrap();

        let database = runtime.application_option("databaseType").unwrap();
        assert!(database.accepts("cassandra"));
        assert!(!database.accepts("oracle"));

        let package = runtime.application_option("packageName").unwrap();
        assert!(package.matches_pattern("com.mycompany.myapp"));
        assert!(!package.matches_pattern("Com.MyCompany"));

        let prod = runtime.application_option("prodDatabaseType").unwrap();
        assert!(!prod.accepts("h2Disk"));
        assert!(prod.accepts("mysql"));
    }

    #[test]
    fn test_extension_adds_options() {
        let definition = JdlDefinition {
            application_options: BTreeMap::from([(
                "nodeVersion".to_string(),
                patterned(r"^\d+$"),
            )]),
            unary_options: vec!["skipTests".to_string()],
            binary_options: BTreeMap::from([(
                "cqrs".to_string(),
                vec!["axon".to_string(), "no".to_string()],
            )]),
            ..JdlDefinition::default()
        };
        let runtime = Runtime::build(Some(&definition)).unwrap();

        assert!(runtime.is_unary_option("skipTests"));
        assert_eq!(
            runtime.unary_option("skipTests"),
            Some(UnaryOption::Custom("skipTests".to_string()))
        );
        assert_eq!(
            runtime.binary_option_for_value("axon"),
            Some(BinaryOption::Custom("cqrs".to_string()))
        );
        assert!(runtime.application_option("nodeVersion").is_some());
        assert!(runtime.application_option("baseName").is_some());
    }

    #[test]
    fn test_self_check_rejects_collisions() {
        let keyword = JdlDefinition {
            unary_options: vec!["entity".to_string()],
            ..JdlDefinition::default()
        };
        assert_eq!(
            Runtime::build(Some(&keyword)).unwrap_err(),
            RuntimeError::ReservedName {
                name: "entity".to_string(),
                kind: "keyword"
            }
        );

        let ambiguous = JdlDefinition {
            unary_options: vec!["dto".to_string()],
            ..JdlDefinition::default()
        };
        assert_eq!(
            Runtime::build(Some(&ambiguous)).unwrap_err(),
            RuntimeError::AmbiguousOption("dto".to_string())
        );

        let invalid = JdlDefinition {
            unary_options: vec!["9lives".to_string()],
            ..JdlDefinition::default()
        };
        assert!(matches!(
            Runtime::build(Some(&invalid)),
            Err(RuntimeError::InvalidName(_))
        ));
    }

    #[test]
    fn test_self_check_rejects_bad_patterns() {
        let definition = JdlDefinition {
            application_options: BTreeMap::from([("broken".to_string(), patterned("(unclosed"))]),
            ..JdlDefinition::default()
        };
        assert!(matches!(
            Runtime::build(Some(&definition)),
            Err(RuntimeError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_resolve_caches_runtimes() {
        let first = resolve(None).unwrap();
        let second = resolve(Some(&JdlDefinition::default())).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let definition = JdlDefinition {
            unary_options: vec!["skipTests".to_string()],
            ..JdlDefinition::default()
        };
        let extended = resolve(Some(&definition)).unwrap();
        let again = resolve(Some(&definition.clone())).unwrap();
        assert!(Arc::ptr_eq(&extended, &again));
        assert!(!Arc::ptr_eq(&first, &extended));

        let other = JdlDefinition {
            unary_options: vec!["skipDocs".to_string()],
            ..JdlDefinition::default()
        };
        let distinct = resolve(Some(&other)).unwrap();
        assert!(!Arc::ptr_eq(&extended, &distinct));
        assert!(distinct.is_unary_option("skipDocs"));
        assert!(!distinct.is_unary_option("skipTests"));
    }
}
