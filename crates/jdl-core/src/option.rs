//! Entity-scoped unary and binary options (`skipClient *`, `dto A with mapstruct`).

use std::{fmt, str::FromStr};

use indexmap::IndexSet;

use crate::naming::{is_bare_word, quote};

/// Options that are either present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOption {
    SkipClient,
    SkipServer,
    NoFluentMethod,
    Filter,
    ReadOnly,
    Embedded,
    /// An option contributed by a vocabulary extension.
    Custom(String),
}

impl UnaryOption {
    pub const BUILT_IN: [UnaryOption; 6] = [
        Self::SkipClient,
        Self::SkipServer,
        Self::NoFluentMethod,
        Self::Filter,
        Self::ReadOnly,
        Self::Embedded,
    ];

    /// The JDL keyword for this option.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SkipClient => "skipClient",
            Self::SkipServer => "skipServer",
            Self::NoFluentMethod => "noFluentMethod",
            Self::Filter => "filter",
            Self::ReadOnly => "readOnly",
            Self::Embedded => "embedded",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for UnaryOption {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "skipClient" => Self::SkipClient,
            "skipServer" => Self::SkipServer,
            "noFluentMethod" => Self::NoFluentMethod,
            "filter" => Self::Filter,
            "readOnly" => Self::ReadOnly,
            "embedded" => Self::Embedded,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for UnaryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options that carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOption {
    Dto,
    Service,
    Pagination,
    Search,
    Microservice,
    AngularSuffix,
    ClientRootFolder,
    /// An option contributed by a vocabulary extension.
    Custom(String),
}

impl BinaryOption {
    pub const BUILT_IN: [BinaryOption; 7] = [
        Self::Dto,
        Self::Service,
        Self::Pagination,
        Self::Search,
        Self::Microservice,
        Self::AngularSuffix,
        Self::ClientRootFolder,
    ];

    /// The JDL keyword for this option.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dto => "dto",
            Self::Service => "service",
            Self::Pagination => "paginate",
            Self::Search => "search",
            Self::Microservice => "microservice",
            Self::AngularSuffix => "angularSuffix",
            Self::ClientRootFolder => "clientRootFolder",
            Self::Custom(name) => name,
        }
    }

    /// Accepted values, or `None` when any value is accepted.
    pub fn values(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Dto => Some(&["mapstruct", "no"]),
            Self::Service => Some(&["serviceClass", "serviceImpl", "no"]),
            Self::Pagination => Some(&["pagination", "infinite-scroll", "no"]),
            Self::Search => Some(&["elasticsearch", "couchbase", "no"]),
            Self::Microservice
            | Self::AngularSuffix
            | Self::ClientRootFolder
            | Self::Custom(_) => None,
        }
    }

    /// The built-in option a `use` value stands for (`mapstruct` → `dto`).
    pub fn for_use_value(value: &str) -> Option<Self> {
        Self::BUILT_IN
            .into_iter()
            .find(|option| {
                option
                    .values()
                    .is_some_and(|values| values.contains(&value) && value != "no")
            })
    }
}

impl FromStr for BinaryOption {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "dto" => Self::Dto,
            "service" => Self::Service,
            "paginate" => Self::Pagination,
            "search" => Self::Search,
            "microservice" => Self::Microservice,
            "angularSuffix" => Self::AngularSuffix,
            "clientRootFolder" => Self::ClientRootFolder,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for BinaryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which entities a selection names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySelection {
    /// `*`
    All,
    Names(IndexSet<String>),
}

/// Include/exclude entity sets of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityScope {
    selection: EntitySelection,
    excluded: IndexSet<String>,
}

impl EntityScope {
    pub fn new(selection: EntitySelection, excluded: IndexSet<String>) -> Self {
        Self {
            selection,
            excluded,
        }
    }

    pub fn all() -> Self {
        Self::new(EntitySelection::All, IndexSet::new())
    }

    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            EntitySelection::Names(names.into_iter().map(Into::into).collect()),
            IndexSet::new(),
        )
    }

    pub fn selection(&self) -> &EntitySelection {
        &self.selection
    }

    pub fn excluded(&self) -> &IndexSet<String> {
        &self.excluded
    }

    /// Whether the scope applies to `entity`.
    pub fn includes(&self, entity: &str) -> bool {
        let selected = match &self.selection {
            EntitySelection::All => true,
            EntitySelection::Names(names) => names.contains(entity),
        };
        selected && !self.excluded.contains(entity)
    }

    /// Every explicitly named entity, included or excluded.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        let named = match &self.selection {
            EntitySelection::All => None,
            EntitySelection::Names(names) => Some(names.iter()),
        };
        named
            .into_iter()
            .flatten()
            .chain(self.excluded.iter())
            .map(String::as_str)
    }
}

impl fmt::Display for EntityScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selection {
            EntitySelection::All => f.write_str("*")?,
            EntitySelection::Names(names) => write_names(f, names)?,
        }
        Ok(())
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, names: &IndexSet<String>) -> fmt::Result {
    for (index, name) in names.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        f.write_str(name)?;
    }
    Ok(())
}

/// A declared option with the entities it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JdlOption {
    Unary {
        option: UnaryOption,
        scope: EntityScope,
    },
    Binary {
        option: BinaryOption,
        value: String,
        scope: EntityScope,
    },
}

impl JdlOption {
    pub fn unary(option: UnaryOption, scope: EntityScope) -> Self {
        Self::Unary { option, scope }
    }

    pub fn binary(option: BinaryOption, value: impl Into<String>, scope: EntityScope) -> Self {
        Self::Binary {
            option,
            value: value.into(),
            scope,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Unary { option, .. } => option.as_str(),
            Self::Binary { option, .. } => option.as_str(),
        }
    }

    pub fn scope(&self) -> &EntityScope {
        match self {
            Self::Unary { scope, .. } | Self::Binary { scope, .. } => scope,
        }
    }
}

/// Writes the option as a top-level JDL declaration.
impl fmt::Display for JdlOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary { option, scope } => write!(f, "{option} {scope}")?,
            Self::Binary {
                option,
                value,
                scope,
            } if is_bare_word(value) => write!(f, "{option} {scope} with {value}")?,
            Self::Binary {
                option,
                value,
                scope,
            } => write!(f, "{option} {scope} with {}", quote(value))?,
        }
        let excluded = self.scope().excluded();
        if !excluded.is_empty() {
            f.write_str(" except ")?;
            write_names(f, excluded)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_includes() {
        let scope = EntityScope::new(
            EntitySelection::All,
            ["Job".to_string()].into_iter().collect(),
        );
        assert!(scope.includes("Employee"));
        assert!(!scope.includes("Job"));

        let scope = EntityScope::names(["A", "B"]);
        assert!(scope.includes("A"));
        assert!(!scope.includes("C"));
    }

    #[test]
    fn test_use_value_lookup() {
        assert_eq!(BinaryOption::for_use_value("mapstruct"), Some(BinaryOption::Dto));
        assert_eq!(
            BinaryOption::for_use_value("infinite-scroll"),
            Some(BinaryOption::Pagination)
        );
        assert_eq!(BinaryOption::for_use_value("no"), None);
        assert_eq!(BinaryOption::for_use_value("filter"), None);
    }

    #[test]
    fn test_option_display() {
        let option = JdlOption::binary(
            BinaryOption::Pagination,
            "infinite-scroll",
            EntityScope::new(
                EntitySelection::All,
                ["Job".to_string()].into_iter().collect(),
            ),
        );
        assert_eq!(option.to_string(), "paginate * with infinite-scroll except Job");

        let option = JdlOption::unary(UnaryOption::SkipClient, EntityScope::names(["A", "B"]));
        assert_eq!(option.to_string(), "skipClient A, B");
    }

    #[test]
    fn test_custom_option_parse() {
        let option: UnaryOption = "myFlag".parse().unwrap();
        assert_eq!(option, UnaryOption::Custom("myFlag".to_string()));
        assert_eq!(option.as_str(), "myFlag");
    }
}
