//! The ParseError type returned by the JDL front end.

use std::fmt;

use crate::error::{Diagnostic, Phase};

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// The error that aborted lexing, parsing or conversion.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostic: Diagnostic,
}

impl ParseError {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// The plain error message, without severity or code.
    pub fn message(&self) -> &str {
        self.diagnostic.message()
    }

    /// The stage that failed, when the diagnostic carries a code.
    pub fn phase(&self) -> Option<Phase> {
        self.diagnostic.code().map(|code| code.phase())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let err: ParseError = Diagnostic::error("test error")
            .with_code(ErrorCode::E201)
            .into();

        assert_eq!(err.message(), "test error");
        assert_eq!(err.phase(), Some(Phase::Conversion));
    }

    #[test]
    fn test_parse_error_display() {
        let err: ParseError = Diagnostic::error("undefined constant").into();
        assert_eq!(err.to_string(), "error: undefined constant");
        assert_eq!(err.phase(), None);
    }
}
