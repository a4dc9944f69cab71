//! Job-file input, report rendering and parameter-file output.

use parforge_core::error::{ParforgeError, Result};
use parforge_core::{ParfileConfig, ValidationReport, parse_job};
use std::path::Path;
use tracing::{debug, info};

use crate::ReportFormat;

/// Reads and parses a job file.
pub async fn read_job(path: &Path) -> Result<ParfileConfig> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ParforgeError::io(format!("Failed to read {}", path.display()), e))?;

    let config = parse_job(&json)?;
    debug!(job = %path.display(), operation = ?config.operation, "job file loaded");
    Ok(config)
}

/// Writes a parameter file body, newline-terminated.
pub async fn write_parfile(path: &Path, parfile: &str) -> Result<()> {
    let mut contents = String::with_capacity(parfile.len().saturating_add(1));
    contents.push_str(parfile);
    contents.push('\n');

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ParforgeError::io(format!("Failed to write to {}", path.display()), e))?;

    info!(parfile = %path.display(), "parameter file written");
    Ok(())
}

/// Renders a validation report for the terminal or as JSON.
pub fn render_report(report: &ValidationReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| ParforgeError::serialization("Failed to render report", e)),
        ReportFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &ValidationReport) -> String {
    if report.is_clean() {
        return "No issues found.".to_string();
    }

    let mut lines: Vec<String> = finding_lines(report);
    lines.push(format!(
        "{} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    ));
    lines.join("\n")
}

/// One prefixed line per finding: errors, then warnings, then suggestions.
pub fn finding_lines(report: &ValidationReport) -> Vec<String> {
    let prefixed = |prefix: &'static str, messages: &[String]| {
        messages
            .iter()
            .map(move |message| format!("{}: {}", prefix, message))
            .collect::<Vec<_>>()
    };

    let mut lines = prefixed("error", &report.errors);
    lines.extend(prefixed("warning", &report.warnings));
    lines.extend(prefixed("suggestion", &report.suggestions));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ValidationReport {
        ValidationReport {
            errors: vec!["DUMPFILE name is required.".to_string()],
            warnings: vec!["SQLFILE should typically have a .sql extension.".to_string()],
            suggestions: vec![],
        }
    }

    #[test]
    fn test_render_text_report() {
        let text = render_report(&report(), ReportFormat::Text).expect("render");
        assert_eq!(
            text,
            "error: DUMPFILE name is required.\n\
             warning: SQLFILE should typically have a .sql extension.\n\
             1 error(s), 1 warning(s)"
        );
    }

    #[test]
    fn test_render_clean_report() {
        let text = render_report(&ValidationReport::default(), ReportFormat::Text).expect("render");
        assert_eq!(text, "No issues found.");
    }

    #[test]
    fn test_render_json_report() {
        let json = render_report(&report(), ReportFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["errors"][0], "DUMPFILE name is required.");
        assert!(value.get("suggestions").is_none());
    }

    #[test]
    fn test_finding_lines_order() {
        let mut report = report();
        report.suggestions.push("Use DUMPFILE=hr_%U.dmp".to_string());
        let lines = finding_lines(&report);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("error: "));
        assert!(lines[1].starts_with("warning: "));
        assert!(lines[2].starts_with("suggestion: "));
    }

    #[tokio::test]
    async fn test_file_roundtrip_parfile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hr.par");

        write_parfile(&path, "USERID=system\nSCHEMAS=HR")
            .await
            .expect("write");
        let written = tokio::fs::read_to_string(&path).await.expect("read back");
        assert_eq!(written, "USERID=system\nSCHEMAS=HR\n");
    }

    #[tokio::test]
    async fn test_file_missing_job() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read_job(&dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(ParforgeError::Io { .. })));
    }
}
