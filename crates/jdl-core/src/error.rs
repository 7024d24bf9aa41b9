use thiserror::Error;

/// A literal that does not name any member of a closed JDL vocabulary.
///
/// Returned by the `FromStr` implementations of the domain enums
/// (relationship kinds, deployment kinds, validation kinds, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValueError {
    kind: &'static str,
    value: String,
}

impl UnknownValueError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// The vocabulary that was searched, e.g. `"relationship kind"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
