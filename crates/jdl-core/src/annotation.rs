//! Free-form annotations attached to entities, fields and relationships.
//!
//! JDL accepts two annotation forms: unary `@Name`, which records a flag, and
//! binary `@Name(value)`, whose value is coerced to a boolean, number or
//! string by the converter.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::naming::{is_bare_word, quote};

/// Ordered annotation map, keyed by the annotation name as written.
pub type Annotations = IndexMap<String, AnnotationValue>;

/// The value carried by one annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Unary annotation: presence means `true`.
    Flag,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl AnnotationValue {
    /// Coerce a bare literal into the most specific annotation value.
    ///
    /// `true`/`false` become booleans, integral literals integers, literals
    /// with a fractional part decimals, and everything else text. Integers
    /// outside the `i64` range are kept verbatim as text.
    pub fn coerce(literal: &str) -> Self {
        match literal {
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => {
                if let Ok(value) = literal.parse::<i64>() {
                    return Self::Integer(value);
                }
                match literal.parse::<f64>() {
                    Ok(value) if literal.contains('.') => Self::Decimal(value),
                    _ => Self::Text(literal.to_string()),
                }
            }
        }
    }

    /// Whether the annotation was written without an argument.
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

/// Writes the annotation argument as it appears inside `@Name(...)`.
///
/// Flags have no argument and render as an empty string.
impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => Ok(()),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => {
                if value.fract() == 0.0 {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            Self::Text(value) if is_bare_word(value) && value != "true" && value != "false" => {
                write!(f, "{value}")
            }
            Self::Text(value) => write!(f, "{}", quote(value)),
        }
    }
}

impl Serialize for AnnotationValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag => serializer.serialize_bool(true),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Decimal(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

/// Write a list of annotations as JDL prefixes, each followed by `separator`.
pub fn write_annotations(
    f: &mut dyn fmt::Write,
    annotations: &Annotations,
    separator: &str,
) -> fmt::Result {
    for (name, value) in annotations {
        if value.is_flag() {
            write!(f, "@{name}{separator}")?;
        } else {
            write!(f, "@{name}({value}){separator}")?;
        }
    }
    Ok(())
}
