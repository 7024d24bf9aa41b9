//! Serializable entity descriptors handed to the code generators.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use jdl_core::{
    annotation::Annotations,
    entity::{JdlEntity, JdlField, ValidationValue},
    enumeration::JdlEnums,
    field_types::BlobKind,
    naming::upper_first,
    reserved::is_reserved_field_name,
};

const NO: &str = jdl_core::application::NO;

/// One entity as seen by one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub name: String,
    pub entity_table_name: String,
    #[serde(rename = "javadoc", skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub relationships: Vec<RelationshipDescriptor>,
    pub dto: String,
    pub service: String,
    pub pagination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<String>,
    pub jpa_metamodel_filtering: bool,
    pub fluent_methods: bool,
    pub read_only: bool,
    pub embedded: bool,
    pub skip_client: bool,
    pub skip_server: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_root_folder: Option<String>,
    #[serde(rename = "angularJSSuffix", skip_serializing_if = "Option::is_none")]
    pub angular_js_suffix: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: Annotations,
    pub applications: Vec<String>,
}

impl EntityDescriptor {
    /// Describe `entity` with every option at its default.
    ///
    /// # Arguments
    ///
    /// * `entity` - The declared entity.
    /// * `enums` - Declared enums, used to fill `fieldValues`.
    /// * `jhi_prefix` - Prefix applied to reserved field names.
    pub fn new(entity: &JdlEntity, enums: &JdlEnums, jhi_prefix: &str) -> Self {
        Self {
            name: entity.name.clone(),
            entity_table_name: entity.table_name.clone(),
            documentation: entity.documentation.clone(),
            fields: entity
                .fields
                .values()
                .map(|field| FieldDescriptor::new(field, enums, jhi_prefix))
                .collect(),
            relationships: Vec::new(),
            dto: NO.to_string(),
            service: NO.to_string(),
            pagination: NO.to_string(),
            search_engine: None,
            jpa_metamodel_filtering: false,
            fluent_methods: true,
            read_only: false,
            embedded: false,
            skip_client: false,
            skip_server: false,
            microservice_name: None,
            client_root_folder: None,
            angular_js_suffix: None,
            annotations: entity.annotations.clone(),
            applications: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.field_name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships
            .iter()
            .find(|relationship| relationship.relationship_name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub field_name: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    #[serde(rename = "javadoc", skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_validate_rules: Vec<String>,
    /// `fieldValidateRules<Rule>` keys carrying the rule arguments.
    #[serde(flatten)]
    pub rule_values: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub options: Annotations,
}

impl FieldDescriptor {
    pub fn new(field: &JdlField, enums: &JdlEnums, jhi_prefix: &str) -> Self {
        let field_name = if is_reserved_field_name(&field.name) {
            format!("{jhi_prefix}{}", upper_first(&field.name))
        } else {
            field.name.clone()
        };

        let blob = BlobKind::of(&field.field_type);
        let field_type = match blob {
            Some(_) => "byte[]".to_string(),
            None => field.field_type.clone(),
        };

        let mut rule_values = IndexMap::new();
        for validation in field.validations.values() {
            if let Some(value) = &validation.value {
                let key = format!("fieldValidateRules{}", upper_first(validation.kind.as_str()));
                rule_values.insert(key, rule_value(value));
            }
        }

        Self {
            field_name,
            field_type,
            field_type_blob_content: blob.map(|kind| kind.content().to_string()),
            field_values: enums.get(&field.field_type).map(|e| e.field_values()),
            documentation: field.documentation.clone(),
            field_validate_rules: field
                .validations
                .keys()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            rule_values,
            options: field.annotations.clone(),
        }
    }
}

fn rule_value(value: &ValidationValue) -> Value {
    match value {
        ValidationValue::Number(raw) => {
            if let Ok(integer) = raw.parse::<i64>() {
                Value::from(integer)
            } else if raw.contains('.') {
                raw.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map_or_else(|| Value::String(raw.clone()), Value::Number)
            } else {
                Value::String(raw.clone())
            }
        }
        ValidationValue::Pattern(pattern) => Value::String(pattern.clone()),
    }
}

/// Which end of the declared relationship an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipSideKind {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescriptor {
    pub relationship_name: String,
    pub relationship_type: String,
    pub other_entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,
    pub relationship_side: RelationshipSideKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_entity_field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationship_validate_rules: Vec<String>,
    #[serde(rename = "javadoc", skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub options: Annotations,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub relationship_with_built_in_entity: bool,
}
