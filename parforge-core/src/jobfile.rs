//! Job-file loading with JSON Schema shape checks.
//!
//! A job file is a JSON object holding the fields of a
//! [`ParfileConfig`]. Before deserializing, the raw JSON is checked against
//! an embedded JSON Schema so that structurally wrong input (a string where
//! a number belongs, an unknown mode name, a misspelled key) is rejected
//! with a message per offending field instead of a single serde error.
//!
//! The schema only checks shape. Whether the job makes sense for Data Pump
//! is decided by [`validate`](crate::validation::validate).
//!
//! # Example
//! ```rust
//! use parforge_core::jobfile::parse_job;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = parse_job(r#"{"operation": "EXPORT", "schemas": "HR", "parallel": 2}"#)?;
//! assert!(config.is_export());
//! assert_eq!(config.parallel, Some(2));
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::models::ParfileConfig;

/// Job-file loading errors with field-level reporting
#[derive(Debug, Error)]
pub enum JobFileError {
    /// The embedded schema failed to compile
    #[error("Job file schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// The job file does not match the expected shape
    #[error("Job file is invalid ({error_count} errors): {}", errors.join("; "))]
    InvalidJob {
        error_count: usize,
        errors: Vec<String>,
    },

    /// The job file is not valid JSON, or does not deserialize
    #[error("Job file parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Embedded JSON Schema for job files
const JOB_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "parforge Data Pump job",
  "type": "object",
  "additionalProperties": false,
  "$defs": {
    "text": { "type": "string" },
    "flag": { "type": "boolean" },
    "count": { "type": ["integer", "null"] }
  },
  "properties": {
    "operation": { "enum": ["EXPORT", "IMPORT", null] },
    "userid": { "$ref": "#/$defs/text" },
    "credential": { "$ref": "#/$defs/text" },
    "directory": { "$ref": "#/$defs/text" },
    "dumpfile": { "$ref": "#/$defs/text" },
    "logfile": { "$ref": "#/$defs/text" },

    "parallel": { "$ref": "#/$defs/count" },
    "job_name": { "$ref": "#/$defs/text" },
    "metrics": { "$ref": "#/$defs/flag" },
    "logtime": { "$ref": "#/$defs/flag" },
    "logtime_tz": { "$ref": "#/$defs/flag" },
    "abort_step": { "$ref": "#/$defs/count" },
    "access_method": { "$ref": "#/$defs/text" },
    "keep_master": { "$ref": "#/$defs/flag" },
    "version": { "$ref": "#/$defs/text" },
    "include": { "$ref": "#/$defs/text" },
    "exclude": { "$ref": "#/$defs/text" },
    "disable_cluster": { "$ref": "#/$defs/flag" },

    "export_mode": {
      "enum": [
        "SCHEMAS",
        "TABLES",
        "TABLESPACES",
        "TRANSPORTABLE_TABLESPACES",
        "TRANSPORTABLE_PDB",
        "FULL"
      ]
    },
    "schemas": { "$ref": "#/$defs/text" },
    "tables": { "$ref": "#/$defs/text" },
    "tablespaces": { "$ref": "#/$defs/text" },
    "compression": { "$ref": "#/$defs/text" },
    "compression_algorithm": { "$ref": "#/$defs/text" },
    "encryption_mode": { "$ref": "#/$defs/text" },
    "encryption_algorithm": { "$ref": "#/$defs/text" },
    "encryption_password": { "$ref": "#/$defs/text" },
    "content": { "enum": ["ALL", "DATA_ONLY", "METADATA_ONLY", null] },
    "query": { "$ref": "#/$defs/text" },
    "sample": { "$ref": "#/$defs/text" },
    "filesize": { "$ref": "#/$defs/text" },
    "flashback_time": { "$ref": "#/$defs/text" },
    "flashback_scn": { "$ref": "#/$defs/text" },
    "estimate_only": { "$ref": "#/$defs/text" },
    "estimate": { "$ref": "#/$defs/text" },
    "reuse_dumpfiles": { "$ref": "#/$defs/text" },
    "source_edition": { "$ref": "#/$defs/text" },
    "views_as_tables": { "$ref": "#/$defs/text" },
    "transport_full_check": { "$ref": "#/$defs/flag" },

    "import_mode": { "enum": ["STANDARD", "TRANSPORTABLE"] },
    "table_exists_action": { "$ref": "#/$defs/text" },
    "partition_options": { "$ref": "#/$defs/text" },
    "skip_unusable_indexes": { "$ref": "#/$defs/flag" },
    "disable_streams_configuration": { "$ref": "#/$defs/flag" },
    "data_options_skip_constraints": { "$ref": "#/$defs/flag" },
    "data_options_xml_validation": { "enum": ["VALIDATE", "DISABLE", null] },
    "remap_data": { "$ref": "#/$defs/text" },
    "remap_container": { "$ref": "#/$defs/text" },
    "remap_table": { "$ref": "#/$defs/text" },
    "remap_schema": { "$ref": "#/$defs/text" },
    "remap_tablespace": { "$ref": "#/$defs/text" },
    "remap_datafile": { "$ref": "#/$defs/text" },
    "transport_datafiles": { "$ref": "#/$defs/text" },
    "sqlfile": { "$ref": "#/$defs/text" },
    "transform": { "$ref": "#/$defs/text" },
    "network_link": { "$ref": "#/$defs/text" },
    "master_only": { "$ref": "#/$defs/flag" }
  }
}"##;

/// Compiled job schema (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Compiles the embedded job schema and caches it.
///
/// Calling this up front is optional; [`validate_job_json`] compiles the
/// schema on first use.
///
/// # Errors
/// Returns `JobFileError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_job_schema() -> Result<(), JobFileError> {
    if COMPILED_SCHEMA.get().is_some() {
        return Ok(());
    }

    let compiled = jsonschema::validator_for(&job_schema_definition()?).map_err(|e| {
        JobFileError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    // Another thread may have won the race; either copy is fine
    let _ = COMPILED_SCHEMA.set(compiled);
    debug!("job file schema compiled");

    Ok(())
}

/// Checks a parsed job file against the job schema.
///
/// Every violation is reported, not just the first one.
///
/// # Errors
/// Returns `JobFileError::InvalidJob` listing each violation.
pub fn validate_job_json(json_value: &Value) -> Result<(), JobFileError> {
    initialize_job_schema()?;
    let schema = COMPILED_SCHEMA
        .get()
        .ok_or_else(|| JobFileError::SchemaCompilation {
            message: "Job file schema not initialized".to_string(),
        })?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .map(|error| error.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(JobFileError::InvalidJob {
            error_count: errors.len(),
            errors,
        })
    }
}

/// Parses, shape-checks and deserializes a job file.
///
/// # Errors
/// Returns `JobFileError::JsonParsing` for malformed JSON and
/// `JobFileError::InvalidJob` for well-formed JSON of the wrong shape.
pub fn parse_job(json_str: &str) -> Result<ParfileConfig, JobFileError> {
    let json_value: Value = serde_json::from_str(json_str)?;
    validate_job_json(&json_value)?;
    let config = serde_json::from_value(json_value)?;
    Ok(config)
}

/// The embedded job schema as a parsed value, for tooling and editors.
pub fn job_schema_definition() -> Result<Value, JobFileError> {
    serde_json::from_str(JOB_SCHEMA).map_err(|e| JobFileError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, ExportMode, ImportMode, Operation};
    use serde_json::json;

    #[test]
    fn test_schema_compiles() {
        assert!(initialize_job_schema().is_ok());
        // Idempotent
        assert!(initialize_job_schema().is_ok());

        let schema = job_schema_definition().expect("schema parses");
        let defs = schema["$defs"].as_object().expect("$defs object");
        assert!(!defs.is_empty());
        assert_eq!(schema["properties"]["userid"]["$ref"], "#/$defs/text");
    }

    #[test]
    fn test_schema_covers_every_config_field() {
        let schema = job_schema_definition().expect("schema parses");
        let properties = schema["properties"].as_object().expect("properties");

        let mut full = ParfileConfig::export_template();
        full.parallel = Some(2);
        full.abort_step = Some(1);
        full.content = Some(Content::All);
        full.data_options_xml_validation = Some(crate::models::XmlValidation::Validate);
        let serialized = serde_json::to_value(&full).expect("serialize");

        for key in serialized.as_object().expect("object").keys() {
            assert!(properties.contains_key(key), "schema is missing {}", key);
        }
        assert_eq!(
            properties.len(),
            serialized.as_object().expect("object").len()
        );
    }

    #[test]
    fn test_templates_pass_schema() {
        for template in [
            ParfileConfig::export_template(),
            ParfileConfig::import_template(),
        ] {
            let value = serde_json::to_value(&template).expect("serialize");
            assert!(validate_job_json(&value).is_ok());
        }
    }

    #[test]
    fn test_parse_minimal_job() {
        let config = parse_job("{}").expect("empty object is a valid job");
        assert_eq!(config, ParfileConfig::default());
    }

    #[test]
    fn test_parse_full_export_job() {
        let config = parse_job(
            r#"{
                "operation": "EXPORT",
                "userid": "hr/pwd",
                "directory": "DATA_PUMP_DIR",
                "dumpfile": "hr_%U.dmp",
                "logfile": "hr.log",
                "export_mode": "TABLES",
                "tables": "HR.EMPLOYEES",
                "content": "DATA_ONLY",
                "parallel": 4,
                "metrics": true
            }"#,
        )
        .expect("valid job");

        assert_eq!(config.operation, Some(Operation::Export));
        assert_eq!(config.export_mode, ExportMode::Tables);
        assert_eq!(config.content, Some(Content::DataOnly));
        assert_eq!(config.parallel, Some(4));
        assert!(config.metrics);
    }

    #[test]
    fn test_nulls_accepted_for_optional_fields() {
        let config = parse_job(
            r#"{"operation": null, "parallel": null, "content": null, "import_mode": "TRANSPORTABLE"}"#,
        )
        .expect("nulls are unset");
        assert_eq!(config.operation, None);
        assert_eq!(config.parallel, None);
        assert_eq!(config.import_mode, ImportMode::Transportable);
    }

    #[test]
    fn test_wrong_types_reported_per_field() {
        let result = validate_job_json(&json!({
            "operation": "EXPORT",
            "parallel": "four",
            "metrics": "yes",
            "schemas": ["HR"]
        }));

        match result {
            Err(JobFileError::InvalidJob {
                error_count,
                errors,
            }) => {
                assert_eq!(error_count, 3);
                assert_eq!(errors.len(), 3);
            }
            other => panic!("expected InvalidJob, got {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_parallel_rejected() {
        let result = validate_job_json(&json!({ "parallel": 2.5 }));
        assert!(matches!(result, Err(JobFileError::InvalidJob { .. })));
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        for job in [
            json!({ "operation": "COPY" }),
            json!({ "export_mode": "SCHEMA" }),
            json!({ "content": "EVERYTHING" }),
            json!({ "data_options_xml_validation": "ON" }),
        ] {
            assert!(
                matches!(
                    validate_job_json(&job),
                    Err(JobFileError::InvalidJob { .. })
                ),
                "{} should be rejected",
                job
            );
        }
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = validate_job_json(&json!({ "dump_file": "hr.dmp" }));
        match result {
            Err(JobFileError::InvalidJob { errors, .. }) => {
                assert!(errors[0].contains("dump_file"));
            }
            other => panic!("expected InvalidJob, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_rejected() {
        let result = validate_job_json(&json!(["EXPORT"]));
        assert!(matches!(result, Err(JobFileError::InvalidJob { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = parse_job("{ not json");
        assert!(matches!(result, Err(JobFileError::JsonParsing { .. })));
    }

    #[test]
    fn test_invalid_job_message_lists_errors() {
        let error = JobFileError::InvalidJob {
            error_count: 2,
            errors: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Job file is invalid (2 errors): first; second"
        );
    }
}
