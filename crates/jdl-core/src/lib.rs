//! Core domain model for the JDL application description language.
//!
//! This crate holds the normalized in-memory representation produced by the
//! JDL converter ([`object::JdlObject`] and the types it owns), together with
//! the constant tables the validators and projector consult: field types per
//! database, supported validations per field type, reserved words and
//! application defaults.
//!
//! It has no knowledge of JDL syntax. Parsing lives in `jdl-parser`,
//! validation and projection in `jdl`.

pub mod annotation;
pub mod application;
pub mod deployment;
pub mod entity;
pub mod enumeration;
pub mod error;
pub mod field_types;
pub mod naming;
pub mod object;
pub mod option;
pub mod relationship;
pub mod reserved;

pub use error::UnknownValueError;
pub use object::JdlObject;
