//! Concrete syntax tree produced by the parser.
//!
//! The tree keeps declarations in source order, annotations in the order
//! they were written and enum values in the literal form they were written,
//! so a JDL unit can be re-serialized without losing information.
//!
//! Names are wrapped in [`Spanned`] so the converter can point diagnostics
//! at the offending source text.

use std::fmt;

use jdl_core::{entity::ValidationKind, relationship::RelationshipKind};

use crate::span::{Span, Spanned};

/// A parsed JDL unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jdl<'src> {
    pub declarations: Vec<Declaration<'src>>,
}

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration<'src> {
    Constant(Constant<'src>),
    Application(Application<'src>),
    Entity(Entity<'src>),
    Enum(Enum<'src>),
    Relationship(RelationshipGroup<'src>),
    Deployment(Deployment<'src>),
    Option(OptionDecl<'src>),
}

/// `NAME = 42`
#[derive(Debug, Clone, PartialEq)]
pub struct Constant<'src> {
    pub name: Spanned<&'src str>,
    pub value: Spanned<&'src str>,
}

/// A literal as written: a bare word, a number or a quoted string.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'src> {
    Word(&'src str),
    Number(&'src str),
    String(String),
}

impl Literal<'_> {
    /// The literal text, with quotes removed and escapes resolved.
    pub fn text(&self) -> &str {
        match self {
            Literal::Word(word) | Literal::Number(word) => word,
            Literal::String(text) => text,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Literal::String(_))
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Word(word) | Literal::Number(word) => f.write_str(word),
            Literal::String(text) => write!(f, "{text:?}"),
        }
    }
}

/// `@Name` or `@Name(value)`
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation<'src> {
    pub name: Spanned<&'src str>,
    pub value: Option<Spanned<Literal<'src>>>,
}

impl Annotation<'_> {
    pub fn span(&self) -> Span {
        self.value
            .as_ref()
            .map_or(self.name.span(), |value| self.name.span().union(value.span()))
    }
}

/// The value of a `config` or `deployment` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue<'src> {
    Single(Literal<'src>),
    List(Vec<Spanned<Literal<'src>>>),
}

/// `key value` inside a `config` or `deployment` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry<'src> {
    pub name: Spanned<&'src str>,
    pub value: Spanned<ConfigValue<'src>>,
}

/// `config { ... }` or `config(<blueprint>) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBlock<'src> {
    pub namespace: Option<Spanned<&'src str>>,
    pub entries: Vec<ConfigEntry<'src>>,
}

/// Entities named by `*` or an explicit list.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityList<'src> {
    All,
    Names(Vec<Spanned<&'src str>>),
}

/// `<entities|*> [except <entities>]`
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySelector<'src> {
    pub list: Spanned<EntityList<'src>>,
    pub except: Vec<Spanned<&'src str>>,
}

/// `application { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Application<'src> {
    pub keyword: Span,
    pub configs: Vec<ConfigBlock<'src>>,
    pub entities: Option<EntitySelector<'src>>,
    pub options: Vec<OptionDecl<'src>>,
}

/// An option declaration, at top level or inside an application.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionDecl<'src> {
    /// `skipClient A, B except C`
    Unary {
        name: Spanned<&'src str>,
        selector: EntitySelector<'src>,
    },
    /// `dto * with mapstruct except C`
    Binary {
        name: Spanned<&'src str>,
        selector: EntitySelector<'src>,
        value: Spanned<Literal<'src>>,
    },
    /// `use mapstruct, serviceImpl for * except C`
    Use {
        values: Vec<Spanned<&'src str>>,
        selector: EntitySelector<'src>,
    },
}

/// `entity Name [(table)] [{ fields }]`
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<'src> {
    pub documentation: Option<&'src str>,
    pub annotations: Vec<Annotation<'src>>,
    pub name: Spanned<&'src str>,
    pub table_name: Option<Spanned<&'src str>>,
    pub fields: Vec<Field<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'src> {
    pub documentation: Option<&'src str>,
    pub annotations: Vec<Annotation<'src>>,
    pub name: Spanned<&'src str>,
    pub field_type: Spanned<&'src str>,
    pub validations: Vec<Validation<'src>>,
}

/// The argument of a validation rule as written.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationArg<'src> {
    Number(&'src str),
    /// A reference to a constant declared elsewhere in the unit.
    Constant(&'src str),
    /// A regex literal; escapes are kept verbatim.
    Pattern(&'src str),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validation<'src> {
    pub kind: Spanned<ValidationKind>,
    pub argument: Option<Spanned<ValidationArg<'src>>>,
}

/// `enum Name { KEY [(value)], ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Enum<'src> {
    pub documentation: Option<&'src str>,
    pub annotations: Vec<Annotation<'src>>,
    pub name: Spanned<&'src str>,
    pub values: Vec<EnumValue<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue<'src> {
    pub documentation: Option<&'src str>,
    pub name: Spanned<&'src str>,
    pub value: Option<Spanned<Literal<'src>>>,
}

/// `relationship <Kind> { body, ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipGroup<'src> {
    pub kind: Spanned<RelationshipKind>,
    pub relationships: Vec<Relationship<'src>>,
}

/// `From{field} to To{field} [with builtInEntity]`
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship<'src> {
    pub from: RelationshipSide<'src>,
    pub to: RelationshipSide<'src>,
    /// `with` clauses, in source order.
    pub with: Vec<Annotation<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSide<'src> {
    pub documentation: Option<&'src str>,
    pub annotations: Vec<Annotation<'src>>,
    pub entity: Spanned<&'src str>,
    pub injected_field: Option<Spanned<&'src str>>,
    pub display_field: Option<Spanned<&'src str>>,
    pub required: bool,
}

/// `deployment { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment<'src> {
    pub keyword: Span,
    pub entries: Vec<ConfigEntry<'src>>,
}
