//! Relationships between entities.

use std::{fmt, str::FromStr};

use crate::{
    annotation::{Annotations, write_annotations},
    entity::write_documentation,
    error::UnknownValueError,
};

/// Entities that exist outside the JDL unit and may be referenced undeclared.
pub const BUILT_IN_ENTITIES: [&str; 2] = ["User", "Authority"];

/// Whether `name` is one of the built-in entities.
pub fn is_built_in_entity(name: &str) -> bool {
    BUILT_IN_ENTITIES.contains(&name)
}

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 4] = [
        Self::OneToOne,
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToMany,
    ];

    /// The JDL keyword (`OneToMany`).
    pub fn as_jdl(&self) -> &'static str {
        match self {
            Self::OneToOne => "OneToOne",
            Self::OneToMany => "OneToMany",
            Self::ManyToOne => "ManyToOne",
            Self::ManyToMany => "ManyToMany",
        }
    }

    /// The descriptor spelling (`one-to-many`).
    pub fn as_json(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }

    /// The kind as seen from the destination side.
    pub fn reverse(&self) -> Self {
        match self {
            Self::OneToMany => Self::ManyToOne,
            Self::ManyToOne => Self::OneToMany,
            other => *other,
        }
    }
}

impl FromStr for RelationshipKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_jdl() == s)
            .ok_or_else(|| UnknownValueError::new("relationship kind", s))
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_jdl())
    }
}

/// One end of a relationship: `Entity{injectedField(displayField) required}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationshipSide {
    pub entity: String,
    pub injected_field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
    pub documentation: Option<String>,
    pub annotations: Annotations,
}

impl RelationshipSide {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    pub fn with_injected_field(mut self, field: impl Into<String>) -> Self {
        self.injected_field = Some(field.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl fmt::Display for RelationshipSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_annotations(f, &self.annotations, " ")?;
        f.write_str(&self.entity)?;
        if let Some(field) = &self.injected_field {
            write!(f, "{{{field}")?;
            if let Some(display) = &self.display_field {
                write!(f, "({display})")?;
            }
            if self.required {
                f.write_str(" required")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

/// A single relationship body inside a `relationship <Kind> { ... }` group.
#[derive(Debug, Clone, PartialEq)]
pub struct JdlRelationship {
    pub kind: RelationshipKind,
    pub from: RelationshipSide,
    pub to: RelationshipSide,
    /// Annotations declared with `with` that apply to the relationship as a whole.
    pub annotations: Annotations,
    /// Set by `with builtInEntity`.
    pub built_in_entity: bool,
}

impl JdlRelationship {
    pub fn new(kind: RelationshipKind, from: RelationshipSide, to: RelationshipSide) -> Self {
        Self {
            kind,
            from,
            to,
            annotations: Annotations::new(),
            built_in_entity: false,
        }
    }

    /// Identity used to detect duplicate declarations.
    pub fn id(&self) -> String {
        format!(
            "{}_{}{{{}}}_{}{{{}}}",
            self.kind.as_jdl(),
            self.from.entity,
            self.from.injected_field.as_deref().unwrap_or_default(),
            self.to.entity,
            self.to.injected_field.as_deref().unwrap_or_default(),
        )
    }

    /// Whether the destination is treated as a built-in, undeclared entity.
    pub fn targets_built_in(&self) -> bool {
        self.built_in_entity || is_built_in_entity(&self.to.entity)
    }

    pub fn is_reflexive(&self) -> bool {
        self.from.entity == self.to.entity
    }

    /// Write the relationship body, as it appears inside its group.
    pub fn write_body(&self, f: &mut dyn fmt::Write, indent: &str) -> fmt::Result {
        write_documentation(f, self.from.documentation.as_deref(), indent)?;
        write!(f, "{indent}{} to", self.from)?;
        if let Some(documentation) = self.to.documentation.as_deref() {
            f.write_str("\n")?;
            write_documentation(f, Some(documentation), indent)?;
            write!(f, "{indent}{}", self.to)?;
        } else {
            write!(f, " {}", self.to)?;
        }
        if self.built_in_entity {
            f.write_str(" with builtInEntity")?;
        }
        for (name, value) in &self.annotations {
            if value.is_flag() {
                write!(f, " with {name}")?;
            } else {
                write!(f, " with {name}({value})")?;
            }
        }
        Ok(())
    }
}
