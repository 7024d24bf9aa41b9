//! The diagnostic type shared by the lexer, parser and converter.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A message with a severity, an optional code, labelled source spans and
/// optional help text.
///
/// ```text
/// error[E200]: duplicate entity 'employee'
///   --> hr.jdl:9:8
///    |
///  9 | entity employee
///    |        ^^^^^^^^ declared again here
///    |
///   --> hr.jdl:2:8
///    |
///  2 | entity Employee
///    |        -------- first declared here
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use jdl_parser::error::{Diagnostic, ErrorCode};
    /// # use jdl_parser::Span;
    ///
    /// let diag = Diagnostic::error("undefined constant 'MAX'")
    ///     .with_code(ErrorCode::E207)
    ///     .with_label(Span::new(30..33), "not declared")
    ///     .with_help("declare it as `MAX = 42`");
    /// assert_eq!(diag.to_string(), "error[E207]: undefined constant 'MAX'");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(|label| label.span())
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label, usually pointing at an earlier declaration.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("unexpected end of input");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "unexpected end of input");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.primary_span().is_none());
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::error("duplicate entity 'employee'")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(40..48), "declared again here")
            .with_secondary_label(Span::new(7..15), "first declared here");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.primary_span(), Some(Span::new(40..48)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("missing base name").with_code(ErrorCode::E201);
        assert_eq!(diag.to_string(), "error[E201]: missing base name");

        let diag = Diagnostic::warning("unused constant").with_help("remove it");
        assert_eq!(diag.to_string(), "warning: unused constant");
        assert_eq!(diag.help(), Some("remove it"));
    }
}
