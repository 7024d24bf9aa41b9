//! CLI logic for the JDL importer.
//!
//! This module reads JDL files, runs them through the import pipeline and
//! writes one entity descriptor per entity into the target application(s).

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::PathBuf;

use log::info;

use jdl::{
    JdlError, JdlImporter,
    config::ImportConfig,
    export::{EntityExporter, JdlExporter, JsonExporter},
    source::{FileSourceReader, JsonProjectConfigReader, ProjectConfigReader},
};

/// Run the JDL CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `JdlError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Validation errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), JdlError> {
    info!(
        files:? = args.files,
        output_dir = args.output;
        "Importing JDL"
    );

    let config = apply_overrides(config::load_config(args.config.as_ref())?, args);
    let project = JsonProjectConfigReader::in_directory(&args.output).read_project_config()?;

    let importer = JdlImporter::new(config)?.with_project_config(project);
    let result = importer.import_from(&FileSourceReader::new(&args.files))?;

    let written = JsonExporter::new(&args.output).export_projection(&result.projection)?;
    info!(descriptors = written.len(); "Entity descriptors exported");

    if let Some(path) = &args.jdl_out {
        let exporter = JdlExporter::new(PathBuf::from(path));
        exporter.export_jdl(&result.jdl, importer.runtime())?;
        info!(path; "Normalized JDL exported");
    }

    Ok(())
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(mut config: ImportConfig, args: &Args) -> ImportConfig {
    if let Some(name) = &args.application_name {
        config = config.with_application_name(name.as_str());
    }
    if let Some(application_type) = args.application_type {
        config = config.with_application_type(application_type);
    }
    if let Some(database_type) = args.database_type {
        config = config.with_database_type(database_type);
    }
    if let Some(blueprints) = &args.blueprints {
        config = config.with_blueprints(blueprints.clone());
    }
    if args.unidirectional_relationships {
        config = config.with_unidirectional_relationships(true);
    }
    if args.skip_validation {
        config = config.with_skip_validation(true);
    }
    config
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use jdl_core::application::{ApplicationType, DatabaseType};

    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "jdl",
            "app.jdl",
            "--application-type",
            "gateway",
            "--database-type",
            "mongodb",
            "--blueprints",
            "vuejs,kotlin",
            "--skip-validation",
        ]);
        let config = ImportConfig::default()
            .with_application_name("store")
            .with_application_type(ApplicationType::Microservice);

        let config = apply_overrides(config, &args);
        assert_eq!(config.application_name(), Some("store"));
        assert_eq!(config.application_type(), Some(ApplicationType::Gateway));
        assert_eq!(config.database_type(), Some(DatabaseType::Mongodb));
        assert_eq!(
            config.blueprints(),
            Some(&["vuejs".to_string(), "kotlin".to_string()][..])
        );
        assert!(config.skip_validation());
        assert!(!config.unidirectional_relationships());
    }

    #[test]
    fn test_unknown_application_type_rejected() {
        let result = Args::try_parse_from(["jdl", "app.jdl", "--application-type", "desktop"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_files_required() {
        assert!(Args::try_parse_from(["jdl"]).is_err());
    }
}
