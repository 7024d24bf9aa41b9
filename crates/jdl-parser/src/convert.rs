//! Conversion of the JDL syntax tree into the domain model.
//!
//! This phase expands the syntactic shorthands (`entities *`, `use ... for`,
//! option annotations), coerces configuration values against the runtime
//! option tables, fills application and deployment defaults and rejects the
//! inconsistencies no later stage can recover from (duplicate declarations,
//! undeclared entities, undefined constants, missing base names).

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace};

use jdl_core::{
    JdlObject,
    annotation::{AnnotationValue, Annotations},
    application::{
        self, ApplicationType, ConfigMap, DatabaseType, JdlApplication, NO, OptionValue,
        options as app_options,
    },
    deployment::{self, DeploymentKind, JdlDeployment, options as deployment_options},
    entity::{JdlEntity, JdlField, JdlValidation, ValidationKind, ValidationValue},
    enumeration::{EnumValue, JdlEnum},
    naming::lower_first,
    option::{BinaryOption, EntityScope, EntitySelection, JdlOption, UnaryOption},
    relationship::{JdlRelationship, RelationshipSide},
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    parser_types as types,
    runtime::{ConfigOption, OptionType, Runtime},
    span::{Span, Spanned},
};

/// The relationship `with` clause that marks a built-in destination.
const BUILT_IN_ENTITY: &str = "builtInEntity";

/// Caller-supplied defaults for the conversion phase.
///
/// They only matter for sources without an `application` block: a
/// microservice caller gets every entity assigned to its application name.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    pub application_name: Option<String>,
    pub application_type: Option<ApplicationType>,
}

impl ConvertConfig {
    pub fn new(
        application_name: Option<String>,
        application_type: Option<ApplicationType>,
    ) -> Self {
        Self {
            application_name,
            application_type,
        }
    }
}

pub struct Builder<'r> {
    cfg: ConvertConfig,
    runtime: &'r Runtime,
    object: JdlObject,
    constants: IndexMap<String, String>,
    /// Lowercased entity name to the span of its declaration.
    entity_spans: HashMap<String, Span>,
    application_spans: HashMap<String, Span>,
}

impl<'r> Builder<'r> {
    pub fn new(cfg: ConvertConfig, runtime: &'r Runtime) -> Self {
        Self {
            cfg,
            runtime,
            object: JdlObject::new(),
            constants: IndexMap::new(),
            entity_spans: HashMap::new(),
            application_spans: HashMap::new(),
        }
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    pub fn build(mut self, jdl: &types::Jdl<'_>) -> Result<JdlObject> {
        debug!(declarations = jdl.declarations.len(); "Converting JDL syntax tree");

        // Constants may be referenced before their declaration
        for declaration in &jdl.declarations {
            if let types::Declaration::Constant(constant) = declaration {
                trace!(name = *constant.name.inner(); "Constant");
                self.constants
                    .insert(constant.name.to_string(), constant.value.to_string());
            }
        }

        for declaration in &jdl.declarations {
            match declaration {
                types::Declaration::Constant(_) | types::Declaration::Application(_) => {}
                types::Declaration::Entity(entity) => self.add_entity(entity)?,
                types::Declaration::Enum(jdl_enum) => self.add_enum(jdl_enum),
                types::Declaration::Relationship(group) => self.add_relationships(group),
                types::Declaration::Deployment(deployment) => self.add_deployment(deployment)?,
                types::Declaration::Option(option) => {
                    for option in self.build_options(option)? {
                        self.object.add_option(option);
                    }
                }
            }
        }

        // Applications expand `entities *` over every declared entity
        for declaration in &jdl.declarations {
            if let types::Declaration::Application(application) = declaration {
                let application = self.build_application(application)?;
                self.object.add_application(application);
            }
        }

        self.apply_caller_defaults()?;

        info!(
            applications = self.object.application_count(),
            entities = self.object.entity_count(),
            relationships = self.object.relationship_count();
            "JDL conversion completed",
        );
        Ok(self.object)
    }

    fn apply_caller_defaults(&mut self) -> Result<()> {
        let is_microservice = self.cfg.application_type == Some(ApplicationType::Microservice);
        if self.object.application_count() > 0
            || !is_microservice
            || self.object.entity_count() == 0
        {
            return Ok(());
        }

        let Some(application_name) = self.cfg.application_name.as_deref() else {
            return Err(Diagnostic::error(
                "entities of a microservice need an application name when no application is declared",
            )
            .with_code(ErrorCode::E208)
            .with_help("pass the application name or declare an `application` block"));
        };

        debug!(application_name; "Assigning every entity to the microservice");
        self.object.add_option(JdlOption::binary(
            BinaryOption::Microservice,
            application_name,
            EntityScope::all(),
        ));
        Ok(())
    }

    // ============================================================================
    // Entities
    // ============================================================================

    fn add_entity(&mut self, entity: &types::Entity<'_>) -> Result<()> {
        let name = *entity.name.inner();
        let key = name.to_lowercase();

        if let Some(first) = self.entity_spans.get(&key) {
            return Err(Diagnostic::error(format!(
                "the entity '{name}' is declared more than once"
            ))
            .with_code(ErrorCode::E200)
            .with_label(entity.name.span(), "duplicate declaration")
            .with_secondary_label(*first, "first declared here")
            .with_help("entity names are compared ignoring case"));
        }
        self.entity_spans.insert(key, entity.name.span());

        let mut jdl_entity = JdlEntity::new(name);
        if let Some(table_name) = &entity.table_name {
            jdl_entity = jdl_entity.with_table_name(*table_name.inner());
        }
        jdl_entity.documentation = documentation(entity.documentation);

        for annotation in &entity.annotations {
            if let Some(option) = self.annotation_option(annotation, name)? {
                trace!(entity = name, option = option.name(); "Option annotation");
                self.object.add_option(option);
            } else {
                jdl_entity
                    .annotations
                    .insert(annotation.name.to_string(), annotation_value(annotation));
            }
        }

        for field in &entity.fields {
            let jdl_field = self.build_field(field)?;
            if jdl_entity.fields.contains_key(&jdl_field.name) {
                return Err(Diagnostic::error(format!(
                    "the field '{}' is declared more than once in the entity '{name}'",
                    jdl_field.name
                ))
                .with_code(ErrorCode::E209)
                .with_label(field.name.span(), "duplicate field"));
            }
            jdl_entity.fields.insert(jdl_field.name.clone(), jdl_field);
        }

        debug!(entity = name, fields = jdl_entity.fields.len(); "Entity converted");
        self.object.add_entity(jdl_entity);
        Ok(())
    }

    /// Turn `@dto(mapstruct)` or `@skipClient` into an option scoped to `entity`.
    ///
    /// Returns `None` for annotations that are not option names.
    fn annotation_option(
        &self,
        annotation: &types::Annotation<'_>,
        entity: &str,
    ) -> Result<Option<JdlOption>> {
        let option_name = lower_first(annotation.name.inner());
        let scope = EntityScope::names([entity]);

        if let Some(option) = self.runtime.unary_option(&option_name) {
            if let Some(value) = &annotation.value {
                return Err(Diagnostic::error(format!(
                    "the option '{option_name}' takes no value"
                ))
                .with_code(ErrorCode::E210)
                .with_label(value.span(), "unexpected value")
                .with_help(format!("write `@{}` without parentheses", annotation.name)));
            }
            return Ok(Some(JdlOption::unary(option, scope)));
        }

        if let Some(option) = self.runtime.binary_option(&option_name) {
            let Some(value) = &annotation.value else {
                return Err(Diagnostic::error(format!(
                    "the option '{option_name}' needs a value"
                ))
                .with_code(ErrorCode::E210)
                .with_label(annotation.name.span(), "missing value")
                .with_help(format!("write `@{}(<value>)`", annotation.name)));
            };
            return Ok(Some(JdlOption::binary(option, value.text(), scope)));
        }

        Ok(None)
    }

    fn build_field(&self, field: &types::Field<'_>) -> Result<JdlField> {
        let mut jdl_field = JdlField::new(*field.name.inner(), *field.field_type.inner());
        jdl_field.documentation = documentation(field.documentation);
        jdl_field.annotations = annotations(&field.annotations);

        for validation in &field.validations {
            let kind = *validation.kind.inner();
            let value = validation
                .argument
                .as_ref()
                .map(|argument| self.validation_value(kind, argument))
                .transpose()?;
            jdl_field.add_validation(JdlValidation::new(kind, value));
        }
        Ok(jdl_field)
    }

    fn validation_value(
        &self,
        kind: ValidationKind,
        argument: &Spanned<types::ValidationArg<'_>>,
    ) -> Result<ValidationValue> {
        Ok(match argument.inner() {
            types::ValidationArg::Number(raw) => ValidationValue::Number(raw.to_string()),
            types::ValidationArg::Pattern(pattern) => ValidationValue::Pattern(pattern.to_string()),
            types::ValidationArg::String(text) if kind == ValidationKind::Pattern => {
                ValidationValue::Pattern(text.clone())
            }
            types::ValidationArg::String(text) => ValidationValue::Number(text.clone()),
            types::ValidationArg::Constant(name) => {
                let value = self.constants.get(*name).ok_or_else(|| {
                    Diagnostic::error(format!("the constant '{name}' is not defined"))
                        .with_code(ErrorCode::E207)
                        .with_label(argument.span(), "undefined constant")
                        .with_help(format!("declare it with `{name} = <number>`"))
                })?;
                ValidationValue::Number(value.clone())
            }
        })
    }

    // ============================================================================
    // Enums and Relationships
    // ============================================================================

    fn add_enum(&mut self, jdl_enum: &types::Enum<'_>) {
        let values = jdl_enum
            .values
            .iter()
            .map(|value| {
                let mut enum_value = EnumValue::new(*value.name.inner());
                if let Some(custom) = &value.value {
                    enum_value = enum_value.with_value(custom.text());
                }
                enum_value.documentation = documentation(value.documentation);
                enum_value
            })
            .collect();

        let mut converted = JdlEnum::new(*jdl_enum.name.inner(), values);
        converted.documentation = documentation(jdl_enum.documentation);
        converted.annotations = annotations(&jdl_enum.annotations);
        self.object.add_enum(converted);
    }

    fn add_relationships(&mut self, group: &types::RelationshipGroup<'_>) {
        let kind = *group.kind.inner();

        for body in &group.relationships {
            let mut from = relationship_side(&body.from);
            let to = relationship_side(&body.to);
            if from.injected_field.is_none() && to.injected_field.is_none() {
                from.injected_field = Some(lower_first(&to.entity));
            }

            let mut relationship = JdlRelationship::new(kind, from, to);
            for clause in &body.with {
                if *clause.name.inner() == BUILT_IN_ENTITY {
                    relationship.built_in_entity =
                        annotation_value(clause) != AnnotationValue::Boolean(false);
                } else {
                    relationship
                        .annotations
                        .insert(clause.name.to_string(), annotation_value(clause));
                }
            }

            trace!(id = relationship.id(); "Relationship");
            self.object.add_relationship(relationship);
        }
    }

    // ============================================================================
    // Applications and Deployments
    // ============================================================================

    fn build_application(
        &mut self,
        application: &types::Application<'_>,
    ) -> Result<JdlApplication> {
        let mut declared = ConfigMap::new();
        let mut base_name_span = application.keyword;
        let mut blueprint_configs = Vec::new();

        for block in &application.configs {
            match &block.namespace {
                None => {
                    for entry in &block.entries {
                        if *entry.name.inner() == app_options::BASE_NAME {
                            base_name_span = entry.value.span();
                        }
                        let option = self.runtime.application_option(entry.name.inner());
                        declared.insert(
                            entry.name.to_string(),
                            config_value(option, entry.value.inner()),
                        );
                    }
                }
                Some(namespace) => {
                    let config = block
                        .entries
                        .iter()
                        .map(|entry| {
                            (entry.name.to_string(), config_value(None, entry.value.inner()))
                        })
                        .collect::<ConfigMap>();
                    blueprint_configs.push((namespace.to_string(), config));
                }
            }
        }

        let Some(base_name) = declared
            .get(app_options::BASE_NAME)
            .and_then(OptionValue::as_text)
            .map(str::to_string)
        else {
            return Err(Diagnostic::error("the application has no 'baseName' option")
                .with_code(ErrorCode::E201)
                .with_label(application.keyword, "application declared here")
                .with_help("add `baseName <name>` to the `config` block"));
        };

        if let Some(first) = self.application_spans.get(&base_name) {
            return Err(Diagnostic::error(format!(
                "the application '{base_name}' is declared more than once"
            ))
            .with_code(ErrorCode::E202)
            .with_label(base_name_span, "duplicate base name")
            .with_secondary_label(*first, "first declared here"));
        }
        self.application_spans.insert(base_name.clone(), base_name_span);

        let application_type: ApplicationType = declared
            .get(app_options::APPLICATION_TYPE)
            .and_then(OptionValue::as_text)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let database_type: DatabaseType = declared
            .get(app_options::DATABASE_TYPE)
            .and_then(OptionValue::as_text)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        fill_application_defaults(&mut declared, application_type, database_type);

        let mut converted = JdlApplication::new(declared);
        for (namespace, config) in blueprint_configs {
            converted.add_blueprint_config(namespace, config);
        }

        if let Some(selector) = &application.entities {
            for name in self.select_entities(selector)? {
                converted.add_entity_name(name);
            }
        }

        for option in &application.options {
            for option in self.build_options(option)? {
                converted.add_option(option);
            }
        }

        info!(
            base_name = converted.base_name(),
            application_type = application_type.as_str(),
            entities = converted.entity_names().len();
            "Application converted",
        );
        Ok(converted)
    }

    /// Expand an `entities` clause into the declared entity names it selects.
    fn select_entities(&self, selector: &types::EntitySelector<'_>) -> Result<IndexSet<String>> {
        let listed = match selector.list.inner() {
            types::EntityList::All => Vec::new(),
            types::EntityList::Names(names) => names.iter().collect(),
        };
        for name in listed.iter().copied().chain(selector.except.iter()) {
            if !self.object.has_entity(name.inner()) {
                return Err(Diagnostic::error(format!(
                    "the entity '{name}' is not declared"
                ))
                .with_code(ErrorCode::E203)
                .with_label(name.span(), "undeclared entity")
                .with_help("declare the entity or remove it from the `entities` clause"));
            }
        }

        let excluded: IndexSet<&str> = selector.except.iter().map(|name| *name.inner()).collect();
        let selected = match selector.list.inner() {
            types::EntityList::All => self
                .object
                .entity_names()
                .filter(|name| !excluded.contains(name))
                .map(str::to_string)
                .collect(),
            types::EntityList::Names(_) => listed
                .iter()
                .map(|name| *name.inner())
                .filter(|name| !excluded.contains(name))
                .map(str::to_string)
                .collect(),
        };
        Ok(selected)
    }

    fn add_deployment(&mut self, deployment: &types::Deployment<'_>) -> Result<()> {
        let mut declared = ConfigMap::new();
        let mut kind_value: Option<Spanned<&str>> = None;

        for entry in &deployment.entries {
            let value = config_value(
                self.runtime.deployment_option(entry.name.inner()),
                entry.value.inner(),
            );
            if *entry.name.inner() == deployment_options::DEPLOYMENT_TYPE {
                if let types::ConfigValue::Single(literal) = entry.value.inner() {
                    kind_value = Some(Spanned::new(literal.text(), entry.value.span()));
                }
            }
            declared.insert(entry.name.to_string(), value);
        }

        let Some(kind_value) = kind_value else {
            return Err(Diagnostic::error("the deployment has no 'deploymentType' option")
                .with_code(ErrorCode::E205)
                .with_label(deployment.keyword, "deployment declared here")
                .with_help("add `deploymentType docker-compose`, `kubernetes` or `openshift`"));
        };
        let kind: DeploymentKind = kind_value.inner().parse().map_err(|_| {
            Diagnostic::error(format!("unknown deployment type '{}'", kind_value.inner()))
                .with_code(ErrorCode::E206)
                .with_label(kind_value.span(), "unknown deployment type")
                .with_help("expected `docker-compose`, `kubernetes` or `openshift`")
        })?;

        for (name, value) in deployment::default_config(kind) {
            declared.entry(name).or_insert(value);
        }

        debug!(kind = kind.as_str(); "Deployment converted");
        self.object.add_deployment(JdlDeployment::new(kind, declared));
        Ok(())
    }

    // ============================================================================
    // Options
    // ============================================================================

    fn build_options(&self, option: &types::OptionDecl<'_>) -> Result<Vec<JdlOption>> {
        match option {
            types::OptionDecl::Unary { name, selector } => {
                let unary = self
                    .runtime
                    .unary_option(name.inner())
                    .unwrap_or_else(|| UnaryOption::Custom(name.to_string()));
                Ok(vec![JdlOption::unary(unary, scope(selector))])
            }
            types::OptionDecl::Binary {
                name,
                selector,
                value,
            } => {
                let binary = self
                    .runtime
                    .binary_option(name.inner())
                    .unwrap_or_else(|| BinaryOption::Custom(name.to_string()));
                Ok(vec![JdlOption::binary(binary, value.text(), scope(selector))])
            }
            types::OptionDecl::Use { values, selector } => values
                .iter()
                .map(|value| self.use_option(value, scope(selector)))
                .collect(),
        }
    }

    /// Map one `use` value to the option it stands for.
    fn use_option(&self, value: &Spanned<&str>, scope: EntityScope) -> Result<JdlOption> {
        let word = *value.inner();
        if let Some(option) = self.runtime.binary_option_for_value(word) {
            return Ok(JdlOption::binary(option, word, scope));
        }
        if let Some(option) = self.runtime.unary_option(word) {
            return Ok(JdlOption::unary(option, scope));
        }
        Err(Diagnostic::error(format!(
            "the value '{word}' of a 'use' declaration matches no option"
        ))
        .with_code(ErrorCode::E204)
        .with_label(value.span(), "unknown value")
        .with_help("use an option value such as `mapstruct`, `serviceImpl` or `pagination`"))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Strip comment decoration from a documentation comment body.
///
/// Leading `*` on each line and surrounding blank lines are removed; inner
/// lines are kept.
fn documentation(raw: Option<&str>) -> Option<String> {
    let lines: Vec<&str> = raw?
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').unwrap_or(line).trim()
        })
        .collect();
    let start = lines.iter().position(|line| !line.is_empty())?;
    let end = lines.iter().rposition(|line| !line.is_empty())?;
    Some(lines[start..=end].join("\n"))
}

fn annotation_value(annotation: &types::Annotation<'_>) -> AnnotationValue {
    match annotation.value.as_ref().map(Spanned::inner) {
        None => AnnotationValue::Flag,
        Some(types::Literal::String(text)) => AnnotationValue::Text(text.clone()),
        Some(literal) => AnnotationValue::coerce(literal.text()),
    }
}

fn annotations(annotations: &[types::Annotation<'_>]) -> Annotations {
    annotations
        .iter()
        .map(|annotation| (annotation.name.to_string(), annotation_value(annotation)))
        .collect()
}

fn relationship_side(side: &types::RelationshipSide<'_>) -> RelationshipSide {
    RelationshipSide {
        entity: side.entity.to_string(),
        injected_field: side.injected_field.as_ref().map(ToString::to_string),
        display_field: side.display_field.as_ref().map(ToString::to_string),
        required: side.required,
        documentation: documentation(side.documentation),
        annotations: annotations(&side.annotations),
    }
}

fn scope(selector: &types::EntitySelector<'_>) -> EntityScope {
    let selection = match selector.list.inner() {
        types::EntityList::All => EntitySelection::All,
        types::EntityList::Names(names) => {
            EntitySelection::Names(names.iter().map(ToString::to_string).collect())
        }
    };
    let excluded = selector.except.iter().map(ToString::to_string).collect();
    EntityScope::new(selection, excluded)
}

/// Coerce a configuration value according to the option table entry, if any.
fn config_value(option: Option<&ConfigOption>, value: &types::ConfigValue<'_>) -> OptionValue {
    let literal = match value {
        types::ConfigValue::List(items) => {
            return OptionValue::List(items.iter().map(|item| item.text().to_string()).collect());
        }
        types::ConfigValue::Single(literal) => literal,
    };
    let text = literal.text();

    let Some(option) = option else {
        return match literal {
            types::Literal::String(text) => OptionValue::Text(text.clone()),
            types::Literal::Number(raw) => raw
                .parse()
                .map_or_else(|_| OptionValue::text(*raw), OptionValue::Integer),
            types::Literal::Word(word) => boolean(word).unwrap_or_else(|| OptionValue::text(*word)),
        };
    };

    match option.option_type() {
        OptionType::List => OptionValue::List(vec![text.to_string()]),
        OptionType::Boolean => boolean(text).unwrap_or_else(|| OptionValue::text(text)),
        OptionType::Integer => text
            .parse()
            .map_or_else(|_| OptionValue::text(text), OptionValue::Integer),
        OptionType::String => OptionValue::text(canonical_no(option, text)),
    }
}

fn boolean(word: &str) -> Option<OptionValue> {
    match word {
        "true" => Some(OptionValue::Boolean(true)),
        "false" => Some(OptionValue::Boolean(false)),
        _ => None,
    }
}

/// `none` and `false` mean `no` for options that accept `no`.
fn canonical_no<'t>(option: &ConfigOption, text: &'t str) -> &'t str {
    let accepts_no = option.values().iter().any(|value| value == NO);
    if accepts_no && matches!(text, "none" | "false") {
        NO
    } else {
        text
    }
}

/// Fill options absent from `config` with the defaults of the application kind.
fn fill_application_defaults(
    config: &mut ConfigMap,
    application_type: ApplicationType,
    database_type: DatabaseType,
) {
    // An explicit production engine decides the development default
    if database_type == DatabaseType::Sql
        && !config.contains_key(app_options::DEV_DATABASE_TYPE)
    {
        if let Some(prod) = config
            .get(app_options::PROD_DATABASE_TYPE)
            .and_then(OptionValue::as_text)
        {
            let dev = if prod == "mysql" || prod == "postgresql" || prod == "mariadb" {
                "h2Disk"
            } else {
                prod
            };
            config.insert(
                app_options::DEV_DATABASE_TYPE.to_string(),
                OptionValue::text(dev),
            );
        }
    }

    for (name, value) in application::default_config(application_type, database_type) {
        config.entry(name).or_insert(value);
    }
}
