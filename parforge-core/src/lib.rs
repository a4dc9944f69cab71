//! Validation and generation engine for Oracle Data Pump jobs.
//!
//! A job is described by a flat [`ParfileConfig`]. The crate checks it
//! against Data Pump's parameter compatibility rules and renders it either
//! as a parameter file body or as a single background `expdp`/`impdp`
//! command.
//!
//! # Guarantees
//! - Validation and generation are pure: no I/O, no shared mutable state
//! - Neither ever panics, whatever the configuration holds
//! - Output is deterministic, so regenerating a job is idempotent
//! - Secrets never reach logs; [`security::redact_parfile`] masks them in
//!   any text shown for review
//!
//! # Example
//! ```rust
//! use parforge_core::{ParfileConfig, build_job};
//!
//! let mut config = ParfileConfig::export_template();
//! config.userid = "hr/secret@orcl".to_string();
//!
//! let job = build_job(&config)?;
//! assert!(job.command.starts_with("nohup expdp "));
//! # Ok::<(), parforge_core::ParforgeError>(())
//! ```

pub mod error;
pub mod generator;
pub mod job;
pub mod jobfile;
pub mod logging;
pub mod models;
pub mod security;
pub mod validation;

// Re-export commonly used types
pub use error::{ParforgeError, Result};
pub use generator::{Parameter, ParameterList, generate_command, generate_parfile_content};
pub use job::{GeneratedJob, build_job};
pub use jobfile::{
    JobFileError, initialize_job_schema, job_schema_definition, parse_job, validate_job_json,
};
pub use models::{
    Content, ExportMode, ExportTarget, ImportMode, ImportTarget, Operation, ParfileConfig,
    XmlValidation,
};
pub use validation::{ValidationReport, validate};
