//! Validation-gated generation.
//!
//! [`build_job`] is the path front ends should use: it only produces output
//! for a configuration without blocking errors, and hands back the report so
//! warnings and suggestions can be shown next to the output.

use tracing::{debug, warn};

use crate::error::{ParforgeError, Result};
use crate::generator::{generate_command, generate_parfile_content};
use crate::models::ParfileConfig;
use crate::validation::{ValidationReport, validate};

/// Output of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedJob {
    /// Parameter file body, to be saved as `.par` and passed via `PARFILE=`
    pub parfile: String,
    /// Equivalent single-line background command
    pub command: String,
    /// Non-blocking findings for the same configuration
    pub report: ValidationReport,
}

/// Validates a configuration and generates its outputs.
///
/// # Errors
/// Returns `ParforgeError::Blocked` carrying the validator's errors when the
/// configuration has any.
pub fn build_job(config: &ParfileConfig) -> Result<GeneratedJob> {
    let report = validate(config);
    if report.is_blocking() {
        warn!(
            errors = report.errors.len(),
            "generation refused, configuration has blocking errors"
        );
        return Err(ParforgeError::blocked(report.errors));
    }

    let job = GeneratedJob {
        parfile: generate_parfile_content(config),
        command: generate_command(config),
        report,
    };
    debug!(
        warnings = job.report.warnings.len(),
        suggestions = job.report.suggestions.len(),
        "job generated"
    );
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn export_config() -> ParfileConfig {
        ParfileConfig {
            operation: Some(Operation::Export),
            userid: "hr/pwd".to_string(),
            directory: "DATA_PUMP_DIR".to_string(),
            dumpfile: "hr.dmp".to_string(),
            logfile: "hr.log".to_string(),
            schemas: "HR".to_string(),
            ..ParfileConfig::default()
        }
    }

    #[test]
    fn test_build_valid_job() {
        let config = export_config();
        let job = build_job(&config).expect("valid job builds");

        assert_eq!(job.parfile, generate_parfile_content(&config));
        assert_eq!(job.command, generate_command(&config));
        assert!(job.report.is_clean());
    }

    #[test]
    fn test_build_keeps_warnings_and_suggestions() {
        let config = ParfileConfig {
            exclude: "STATISTICS".to_string(),
            parallel: Some(8),
            ..export_config()
        };

        let job = build_job(&config).expect("warnings do not block");
        assert_eq!(job.report.warnings.len(), 1);
        assert_eq!(job.report.suggestions.len(), 1);
        assert!(job.parfile.contains("PARALLEL=8"));
    }

    #[test]
    fn test_build_refuses_blocking_config() {
        let config = ParfileConfig {
            dumpfile: String::new(),
            ..export_config()
        };

        match build_job(&config) {
            Err(ParforgeError::Blocked {
                error_count,
                errors,
            }) => {
                assert_eq!(error_count, 1);
                assert_eq!(errors, vec!["DUMPFILE name is required.".to_string()]);
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
    }
}
