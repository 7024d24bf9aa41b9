//! Error codes for the JDL diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Conversion errors

use std::fmt;

/// The pipeline stage an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexical,
    Syntax,
    Conversion,
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that starts no JDL token.
    E002,

    /// Unterminated comment.
    ///
    /// A `/*` or `/**` comment was never closed with `*/`.
    E003,

    /// Unterminated pattern.
    ///
    /// A `/` opened a regular expression that was not closed on the same line.
    E004,

    /// Invalid escape sequence in a string literal.
    E005,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Unexpected end of input.
    E101,

    // =========================================================================
    // Conversion Errors (E2xx)
    // =========================================================================
    /// Duplicate entity declaration (names compared ignoring case).
    E200,

    /// Application without a `baseName`.
    E201,

    /// Two applications share a `baseName`.
    E202,

    /// An application lists an entity that is not declared.
    E203,

    /// A `use` declaration names a value that maps to no option.
    E204,

    /// Deployment without a `deploymentType`.
    E205,

    /// Unknown `deploymentType`.
    E206,

    /// Reference to an undefined constant.
    E207,

    /// Entities without an application need an application name.
    E208,

    /// A field is declared twice in one entity.
    E209,

    /// An option annotation used with the wrong arity.
    E210,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Conversion errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E208 => "E208",
            ErrorCode::E209 => "E209",
            ErrorCode::E210 => "E210",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated comment",
            ErrorCode::E004 => "unterminated pattern",
            ErrorCode::E005 => "invalid escape sequence",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            // Conversion errors
            ErrorCode::E200 => "duplicate entity",
            ErrorCode::E201 => "missing base name",
            ErrorCode::E202 => "duplicate application",
            ErrorCode::E203 => "undeclared entity",
            ErrorCode::E204 => "unknown use value",
            ErrorCode::E205 => "missing deployment type",
            ErrorCode::E206 => "unknown deployment type",
            ErrorCode::E207 => "undefined constant",
            ErrorCode::E208 => "missing application name",
            ErrorCode::E209 => "duplicate field",
            ErrorCode::E210 => "option arity mismatch",
        }
    }

    /// The stage that reports this code.
    pub fn phase(&self) -> Phase {
        match self {
            ErrorCode::E001
            | ErrorCode::E002
            | ErrorCode::E003
            | ErrorCode::E004
            | ErrorCode::E005 => Phase::Lexical,
            ErrorCode::E100 | ErrorCode::E101 => Phase::Syntax,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205
            | ErrorCode::E206
            | ErrorCode::E207
            | ErrorCode::E208
            | ErrorCode::E209
            | ErrorCode::E210 => Phase::Conversion,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
