//! Enumerations usable as field types.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    annotation::{Annotations, write_annotations},
    entity::write_documentation,
    naming::{is_bare_word, quote},
};

/// One `KEY (value)` entry of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    /// Custom value, written in parentheses after the key.
    pub value: Option<String>,
    pub documentation: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            documentation: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlEnum {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub documentation: Option<String>,
    pub annotations: Annotations,
}

impl JdlEnum {
    pub fn new(name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            values,
            documentation: None,
            annotations: Annotations::new(),
        }
    }

    /// Values rendered the way descriptors expect them: `KEY (value),OTHER`.
    pub fn field_values(&self) -> String {
        self.values
            .iter()
            .map(|value| match &value.value {
                Some(custom) => format!("{} ({custom})", value.name),
                None => value.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for JdlEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_documentation(f, self.documentation.as_deref(), "")?;
        write_annotations(f, &self.annotations, "\n")?;
        writeln!(f, "enum {} {{", self.name)?;
        for (index, value) in self.values.iter().enumerate() {
            write_documentation(f, value.documentation.as_deref(), "  ")?;
            write!(f, "  {}", value.name)?;
            match &value.value {
                Some(custom) if is_bare_word(custom) => write!(f, " ({custom})")?,
                Some(custom) => write!(f, " ({})", quote(custom))?,
                None => {}
            }
            if index + 1 < self.values.len() {
                f.write_str(",")?;
            }
            f.write_str("\n")?;
        }
        f.write_str("}")
    }
}

/// Declared enums, remembering names declared more than once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JdlEnums {
    enums: IndexMap<String, JdlEnum>,
    duplicates: Vec<String>,
}

impl JdlEnums {
    /// Add an enum; a repeated name keeps the first declaration and is recorded.
    pub fn add(&mut self, jdl_enum: JdlEnum) {
        if self.enums.contains_key(&jdl_enum.name) {
            self.duplicates.push(jdl_enum.name);
        } else {
            self.enums.insert(jdl_enum.name.clone(), jdl_enum);
        }
    }

    pub fn get(&self, name: &str) -> Option<&JdlEnum> {
        self.enums.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JdlEnum> {
        self.enums.values()
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }

    /// Names that were declared more than once, in order of the repeats.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}
