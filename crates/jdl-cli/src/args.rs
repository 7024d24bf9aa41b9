//! Command-line argument definitions for the JDL CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the JDL files to import, where the entity
//! descriptors are written, and override the import settings of the
//! configuration file.

use clap::Parser;

use jdl_core::application::{ApplicationType, DatabaseType};

/// Command-line arguments for the JDL importer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JDL files to import, concatenated in order
    #[arg(required = true, help = "Paths to the input JDL files")]
    pub files: Vec<String>,

    /// Root directory of the generated application(s)
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Base name used when the JDL declares no application
    #[arg(long)]
    pub application_name: Option<String>,

    /// Application type used when the JDL declares no application
    #[arg(long)]
    pub application_type: Option<ApplicationType>,

    /// Database type used when the JDL declares no application
    #[arg(long)]
    pub database_type: Option<DatabaseType>,

    /// Blueprints of the target application, comma separated
    #[arg(long, value_delimiter = ',')]
    pub blueprints: Option<Vec<String>>,

    /// Only materialize relationship sides that name an injected field
    #[arg(long)]
    pub unidirectional_relationships: bool,

    /// Skip the validation phase
    #[arg(long)]
    pub skip_validation: bool,

    /// Also write the normalized JDL to this path
    #[arg(long)]
    pub jdl_out: Option<String>,
}
