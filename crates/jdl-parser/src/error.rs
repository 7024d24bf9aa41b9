//! Error and diagnostic system for the JDL front end.
//!
//! Every failure of the lexing, parsing and conversion stages is reported as
//! a single [`Diagnostic`] carrying an [`ErrorCode`], one or more labeled
//! spans and optional help text. The pipeline is fail-fast: the first
//! diagnostic aborts the import and is returned wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use jdl_parser::error::{Diagnostic, ErrorCode};
//! # use jdl_parser::Span;
//!
//! let diag = Diagnostic::error("the entity 'Job' is declared more than once")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..43), "duplicate declaration")
//!     .with_secondary_label(Span::new(7..10), "first declared here")
//!     .with_help("rename one of the entities");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, Phase};
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
