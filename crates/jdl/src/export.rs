//! Persistence of import results.
//!
//! This module provides the [`EntityExporter`] trait that writes projected
//! entity descriptors, with [`JsonExporter`] as the built-in backend, and
//! [`JdlExporter`] which writes a [`JdlObject`] back to JDL source.
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering serialization failures and I/O
//! errors. [`Error`] converts into [`JdlError::Export`] at the crate boundary.
//!
//! [`JdlError::Export`]: crate::JdlError::Export

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use jdl_core::JdlObject;
use jdl_parser::Runtime;

use crate::projection::Projection;

/// Directory holding the entity descriptors of one application.
pub const DESCRIPTOR_DIRECTORY: &str = ".jhipster";

/// Abstraction for entity descriptor backends.
pub trait EntityExporter {
    /// Persist every descriptor of `projection`.
    ///
    /// # Arguments
    ///
    /// * `projection` - The descriptors grouped by application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if a descriptor cannot be encoded, or
    /// [`Error::Io`] if writing the output fails.
    fn export_projection(&mut self, projection: &Projection) -> Result<Vec<PathBuf>, Error>;
}

/// Writes one pretty-printed JSON file per entity.
///
/// A single application is written to `<dir>/.jhipster/<Entity>.json`; with
/// several applications each gets its own `<dir>/<baseName>/.jhipster/`.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    directory: PathBuf,
}

impl JsonExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn application_directory(&self, projection: &Projection, application: &str) -> PathBuf {
        if projection.len() > 1 {
            self.directory.join(application).join(DESCRIPTOR_DIRECTORY)
        } else {
            self.directory.join(DESCRIPTOR_DIRECTORY)
        }
    }
}

impl EntityExporter for JsonExporter {
    fn export_projection(&mut self, projection: &Projection) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();

        for (application, entities) in projection.applications() {
            let directory = self.application_directory(projection, application);
            fs::create_dir_all(&directory).map_err(Error::Io)?;

            for entity in entities {
                let path = directory.join(format!("{}.json", entity.name));
                let json = serde_json::to_string_pretty(entity)
                    .map_err(|err| Error::Serialize(err.to_string()))?;
                fs::write(&path, json + "\n").map_err(Error::Io)?;
                debug!(path:? = path; "Entity descriptor written");
                written.push(path);
            }
        }

        info!(files = written.len(); "Entity descriptors exported");
        Ok(written)
    }
}

/// Writes a [`JdlObject`] as JDL source.
#[derive(Debug, Clone)]
pub struct JdlExporter {
    path: PathBuf,
}

impl JdlExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render `jdl` with the quoting rules of `runtime`.
    pub fn render(jdl: &JdlObject, runtime: &Runtime) -> Result<String, Error> {
        let mut source = String::new();
        jdl.write_jdl(&mut source, &|name| runtime.is_quoted_option(name))
            .map_err(|err| Error::Serialize(err.to_string()))?;
        Ok(source)
    }

    /// Write `jdl` to the exporter's path, creating parent directories.
    pub fn export_jdl(&self, jdl: &JdlObject, runtime: &Runtime) -> Result<(), Error> {
        let source = Self::render(jdl, runtime)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        fs::write(&self.path, source).map_err(Error::Io)?;
        info!(path:? = self.path; "JDL exported");
        Ok(())
    }
}

/// Errors that can occur while exporting.
///
/// This type is converted into [`JdlError::Export`] at the crate boundary via
/// the [`From`] implementation in [`crate::error`].
///
/// [`JdlError::Export`]: crate::JdlError::Export
#[derive(Debug)]
pub enum Error {
    /// An encoding failure described by `message`.
    Serialize(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use jdl_core::entity::JdlEntity;

    use super::*;
    use crate::projection::{ProjectionConfig, project};

    #[test]
    fn test_single_application_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("Book"));
        let projection = project(&jdl, &ProjectionConfig::default());

        let written = JsonExporter::new(dir.path())
            .export_projection(&projection)
            .unwrap();
        let expected = dir.path().join(".jhipster").join("Book.json");
        assert_eq!(written, vec![expected.clone()]);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(expected).unwrap()).unwrap();
        assert_eq!(json["name"], "Book");
        assert_eq!(json["applications"], serde_json::json!(["jhipster"]));
    }

    #[test]
    fn test_jdl_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Runtime::build(None).unwrap();
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("Book"));

        let exporter = JdlExporter::new(dir.path().join("out").join("model.jdl"));
        exporter.export_jdl(&jdl, &runtime).unwrap();

        let source = fs::read_to_string(exporter.path()).unwrap();
        assert_eq!(source, JdlExporter::render(&jdl, &runtime).unwrap());
        assert!(source.contains("entity Book"));
    }
}
