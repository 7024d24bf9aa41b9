//! # JDL Parser
//!
//! Lexer, parser and converter for the JDL application description
//! language. This crate turns source text into the [`jdl_core::JdlObject`]
//! domain model.
//!
//! ## Usage
//!
//! ```
//! # use jdl_parser::{parse, ConvertConfig, runtime};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = r#"
//!         entity Employee { firstName String required }
//!         entity Job
//!         relationship ManyToOne { Job{employee} to Employee }
//!         dto * with mapstruct
//!     "#;
//!
//!     let runtime = runtime::resolve(None)?;
//!     let jdl = parse(source, &runtime, &ConvertConfig::default())?;
//!     assert_eq!(jdl.entity_count(), 2);
//!     Ok(())
//! }
//! ```

mod convert;
pub mod error;
mod lexer;
mod parser;
#[cfg(test)]
mod parser_tests;
pub mod parser_types;
pub mod runtime;
mod span;
mod tokens;

pub use convert::ConvertConfig;
pub use error::{Diagnostic, ErrorCode, ParseError};
pub use runtime::{JdlDefinition, OptionSpec, OptionType, Runtime, RuntimeError};
pub use span::{Span, Spanned};

use jdl_core::JdlObject;

use convert::Builder;

/// Parse JDL source text into the domain model.
///
/// The pipeline runs fail-fast:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the syntax tree from the significant tokens
/// 3. **Convert** - Expand shorthands and build the [`JdlObject`]
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the first lexical, syntax or
/// conversion diagnostic.
pub fn parse(
    source: &str,
    runtime: &Runtime,
    config: &ConvertConfig,
) -> Result<JdlObject, ParseError> {
    // Step 1 and 2: Tokenize and parse
    let jdl = parse_cst(source, runtime)?;

    // Step 3: Convert
    let builder = Builder::new(config.clone(), runtime);
    Ok(builder.build(&jdl)?)
}

/// Parse JDL source text into its syntax tree without conversion.
pub fn parse_cst<'src>(
    source: &'src str,
    runtime: &Runtime,
) -> Result<parser_types::Jdl<'src>, ParseError> {
    let tokens: Vec<_> = lexer::tokenize(source, runtime)?
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect();

    Ok(parser::build_jdl(&tokens)?)
}
