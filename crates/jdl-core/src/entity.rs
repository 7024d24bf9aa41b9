//! Entities, their fields and field validations.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::{
    annotation::{Annotations, write_annotations},
    error::UnknownValueError,
    naming,
};

/// Validation rules a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    Required,
    Unique,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    MinBytes,
    MaxBytes,
}

impl ValidationKind {
    pub const ALL: [ValidationKind; 9] = [
        Self::Required,
        Self::Unique,
        Self::Min,
        Self::Max,
        Self::MinLength,
        Self::MaxLength,
        Self::Pattern,
        Self::MinBytes,
        Self::MaxBytes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Unique => "unique",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Pattern => "pattern",
            Self::MinBytes => "minbytes",
            Self::MaxBytes => "maxbytes",
        }
    }

    /// Whether the rule takes an argument.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Self::Required | Self::Unique)
    }

    /// Length and byte-size rules, which only accept whole numbers.
    pub fn is_length(&self) -> bool {
        matches!(
            self,
            Self::MinLength | Self::MaxLength | Self::MinBytes | Self::MaxBytes
        )
    }
}

impl FromStr for ValidationKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownValueError::new("validation", s))
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The argument of a validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationValue {
    /// A numeric literal, kept verbatim so decimals can be detected.
    Number(String),
    /// A regular expression, without its delimiting slashes.
    Pattern(String),
}

impl ValidationValue {
    pub fn is_decimal(&self) -> bool {
        matches!(self, Self::Number(raw) if raw.contains('.'))
    }
}

impl fmt::Display for ValidationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(raw) => f.write_str(raw),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.replace('/', "\\/")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdlValidation {
    pub kind: ValidationKind,
    pub value: Option<ValidationValue>,
}

impl JdlValidation {
    pub fn new(kind: ValidationKind, value: Option<ValidationValue>) -> Self {
        Self { kind, value }
    }
}

impl fmt::Display for JdlValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({value})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct JdlField {
    pub name: String,
    pub field_type: String,
    pub validations: IndexMap<ValidationKind, JdlValidation>,
    pub documentation: Option<String>,
    pub annotations: Annotations,
}

impl JdlField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            validations: IndexMap::new(),
            documentation: None,
            annotations: Annotations::new(),
        }
    }

    /// Add a validation; a later rule of the same kind replaces the earlier one.
    pub fn add_validation(&mut self, validation: JdlValidation) {
        self.validations.insert(validation.kind, validation);
    }

    pub fn is_required(&self) -> bool {
        self.validations.contains_key(&ValidationKind::Required)
    }
}

/// An `entity` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct JdlEntity {
    pub name: String,
    pub table_name: String,
    pub fields: IndexMap<String, JdlField>,
    pub documentation: Option<String>,
    pub annotations: Annotations,
}

impl JdlEntity {
    /// Create an entity whose table name defaults to the snake-cased name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_name: naming::table_name(&name),
            name,
            fields: IndexMap::new(),
            documentation: None,
            annotations: Annotations::new(),
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }
}

/// Write a documentation comment; multi-line text is written one line per row.
pub(crate) fn write_documentation(
    f: &mut dyn fmt::Write,
    documentation: Option<&str>,
    indent: &str,
) -> fmt::Result {
    let Some(documentation) = documentation else {
        return Ok(());
    };
    let lines: Vec<&str> = documentation.lines().collect();
    if lines.len() <= 1 {
        return writeln!(f, "{indent}/** {documentation} */");
    }
    writeln!(f, "{indent}/**")?;
    for line in lines {
        writeln!(f, "{indent} * {line}")?;
    }
    writeln!(f, "{indent} */")
}

/// Writes the entity declaration with its full body.
impl fmt::Display for JdlEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_documentation(f, self.documentation.as_deref(), "")?;
        write_annotations(f, &self.annotations, "\n")?;
        write!(f, "entity {} ({})", self.name, self.table_name)?;
        if self.fields.is_empty() {
            return Ok(());
        }
        f.write_str(" {\n")?;
        for field in self.fields.values() {
            write_documentation(f, field.documentation.as_deref(), "  ")?;
            if !field.annotations.is_empty() {
                f.write_str("  ")?;
                write_annotations(f, &field.annotations, " ")?;
                f.write_str("\n")?;
            }
            write!(f, "  {} {}", field.name, field.field_type)?;
            for validation in field.validations.values() {
                write!(f, " {validation}")?;
            }
            f.write_str("\n")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kind_parse() {
        assert_eq!("minlength".parse(), Ok(ValidationKind::MinLength));
        assert!("between".parse::<ValidationKind>().is_err());
        assert!(ValidationKind::MaxBytes.is_length());
        assert!(!ValidationKind::Min.is_length());
        assert!(!ValidationKind::Unique.needs_value());
    }

    #[test]
    fn test_validation_display() {
        let validation = JdlValidation::new(
            ValidationKind::Pattern,
            Some(ValidationValue::Pattern("^a/b$".to_string())),
        );
        assert_eq!(validation.to_string(), "pattern(/^a\\/b$/)");
        assert!(ValidationValue::Number("2.5".to_string()).is_decimal());
    }

    #[test]
    fn test_entity_display() {
        let mut entity = JdlEntity::new("JobHistory");
        let mut field = JdlField::new("startDate", "Instant");
        field.add_validation(JdlValidation::new(ValidationKind::Required, None));
        entity.fields.insert(field.name.clone(), field);
        entity.documentation = Some("History of jobs".to_string());

        assert_eq!(
            entity.to_string(),
            "/** History of jobs */\nentity JobHistory (job_history) {\n  startDate Instant required\n}"
        );
    }

    #[test]
    fn test_later_validation_replaces_earlier() {
        let mut field = JdlField::new("age", "Integer");
        field.add_validation(JdlValidation::new(
            ValidationKind::Min,
            Some(ValidationValue::Number("1".to_string())),
        ));
        field.add_validation(JdlValidation::new(
            ValidationKind::Min,
            Some(ValidationValue::Number("18".to_string())),
        ));
        assert_eq!(field.validations.len(), 1);
        assert_eq!(
            field.validations[&ValidationKind::Min].value,
            Some(ValidationValue::Number("18".to_string()))
        );
    }
}
