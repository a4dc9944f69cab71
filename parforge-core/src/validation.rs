//! Data Pump parameter compatibility rules.
//!
//! [`validate`] runs every rule group over a [`ParfileConfig`] and collects
//! two severities of findings:
//! - **errors** block generation: a parameter file with these would be
//!   rejected by `expdp`/`impdp` or would not do what was asked
//! - **warnings** are advisory: the check is a heuristic (filter clauses,
//!   `QUERY` predicates and remap lists are free-form SQL-ish text that a
//!   pattern can only approximate) and must never stop generation
//!
//! Suggestions are appended after all rule groups and never block either.
//!
//! Validation is total: any configuration, however incomplete, produces a
//! report. Rule groups run in the fixed order of [`RULE_GROUPS`], which
//! makes message order stable across runs.
//!
//! # Example
//! ```rust
//! use parforge_core::models::{Operation, ParfileConfig};
//! use parforge_core::validation::validate;
//!
//! let mut config = ParfileConfig::new(Operation::Export);
//! config.userid = "hr/secret".to_string();
//! config.directory = "DATA_PUMP_DIR".to_string();
//! config.dumpfile = "hr.dmp".to_string();
//! config.logfile = "hr.log".to_string();
//! config.schemas = "HR".to_string();
//!
//! let report = validate(&config);
//! assert!(!report.is_blocking());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::models::{Content, ExportMode, ImportMode, ParfileConfig, non_blank_lines};

/// Outcome of validating one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Blocking findings
    pub errors: Vec<String>,
    /// Advisory findings
    pub warnings: Vec<String>,
    /// Optional improvements; omitted from JSON when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    /// Returns true when generation must not be offered.
    pub fn is_blocking(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true when there is nothing at all to report.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn suggest(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}

type RuleGroup = fn(&ParfileConfig, &mut ValidationReport);

/// Rule groups in evaluation order.
const RULE_GROUPS: &[(&str, RuleGroup)] = &[
    ("connection", check_connection),
    ("numeric_and_format", check_numeric_and_format),
    ("filter_syntax", check_filter_syntax),
    ("file_naming", check_file_naming),
    ("export_mode", check_export_mode),
    ("flashback", check_flashback),
    ("filesize", check_filesize),
    ("views_as_tables", check_views_as_tables),
    ("query_and_sample", check_query_and_sample),
    ("encryption", check_encryption),
    ("import", check_import),
];

#[allow(clippy::expect_used)] // literal patterns, each exercised by the tests
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(COMPATIBLE|LATEST|[0-9]{1,2}(\.[0-9]{1,2}){1,3})$"));
static JOB_NAME_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z0-9_]+$"));
static FILESIZE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^[0-9]+[KMGT]?$"));
static SCN_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]+$"));
static QUERY_RE: LazyLock<Regex> = LazyLock::new(|| compile(r#".+:".+""#));
static SAMPLE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r".+:[0-9]+(\.[0-9]+)?$"));
static DATAFILES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^'[^']+'(,\s*'[^']+')*$"));

/// Compression algorithms that need a 12c or later dump file format.
const ADVANCED_COMPRESSION: &[&str] = &["LOW", "MEDIUM", "HIGH"];

/// Validates a job configuration.
///
/// Never fails; an empty configuration simply yields many errors.
pub fn validate(config: &ParfileConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    for &(group, check) in RULE_GROUPS {
        let (errors_before, warnings_before) = (report.errors.len(), report.warnings.len());
        check(config, &mut report);
        trace!(
            group,
            errors = report.errors.len().saturating_sub(errors_before),
            warnings = report.warnings.len().saturating_sub(warnings_before),
            "rule group evaluated"
        );
    }

    add_suggestions(config, &mut report);

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        suggestions = report.suggestions.len(),
        "validation complete"
    );
    report
}

fn check_connection(config: &ParfileConfig, report: &mut ValidationReport) {
    let network_import = config.is_network_import();

    if config.userid.is_empty() && !network_import {
        report.error("USERID is required.");
    }

    if network_import {
        return;
    }

    if config.is_cloud() {
        if !config.directory.is_empty() {
            report.error(
                "Cannot use both DIRECTORY and CREDENTIAL. Choose one storage destination.",
            );
        }
        if !config.logfile.is_empty() {
            report.error(
                "A separate LOGFILE cannot be specified when using a CREDENTIAL. Log files are \
                 written to the cloud location as part of the dump file list.",
            );
        }
    } else if config.directory.is_empty() {
        report.error("DIRECTORY is required for on-premises operations.");
    }
}

fn check_numeric_and_format(config: &ParfileConfig, report: &mut ValidationReport) {
    if config.abort_step.is_some_and(|step| step <= 0) {
        report.error("ABORT_STEP must be a positive whole number.");
    }
    if config.parallel.is_some_and(|workers| workers <= 0) {
        report.error("PARALLEL must be a positive whole number.");
    }

    if !config.version.is_empty() {
        if !VERSION_RE.is_match(&config.version) {
            report.error(
                "VERSION must be a valid version string (e.g., '19.0', '12.2.0.1') or a keyword \
                 ('COMPATIBLE', 'LATEST').",
            );
        }
        let pre_12c = version_major(&config.version).is_some_and(|major| major < 12);
        if pre_12c && ADVANCED_COMPRESSION.contains(&config.compression_algorithm.as_str()) {
            report.error(format!(
                "Advanced compression ({}) is not compatible with VERSION={}. Use VERSION 12.1 \
                 or higher.",
                config.compression_algorithm, config.version
            ));
        }
    }

    if !config.job_name.is_empty() && !JOB_NAME_RE.is_match(&config.job_name) {
        report.error("JOB_NAME can only contain letters, numbers, and underscores (_).");
    }
}

/// Leading numeric component of a version string (`"11.2.0.4"` → 11).
///
/// Keywords such as `COMPATIBLE` have no major version.
fn version_major(version: &str) -> Option<u64> {
    let first = version.split('.').next().unwrap_or_default().trim_start();
    let digits_end = first
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first.len());
    first.get(..digits_end)?.parse().ok()
}

fn check_filter_syntax(config: &ParfileConfig, report: &mut ValidationReport) {
    let missing_colon = |filter: &str| !filter.is_empty() && !filter.contains(':');
    if missing_colon(&config.include) || missing_colon(&config.exclude) {
        report.warning(
            "INCLUDE/EXCLUDE filter might be invalid. The syntax typically requires a colon, \
             e.g., 'OBJECT_TYPE:\"filter_clause\"'.",
        );
    }
}

fn check_file_naming(config: &ParfileConfig, report: &mut ValidationReport) {
    if config.dumpfile.is_empty() {
        report.error("DUMPFILE name is required.");
    } else if !config.dumpfile.to_lowercase().ends_with(".dmp") {
        report.error("DUMPFILE must have a .dmp extension.");
    }

    if !config.is_cloud() && !config.is_network_import() {
        if config.logfile.is_empty() {
            report.error("LOGFILE name is required for on-premises operations.");
        } else if !config.logfile.to_lowercase().ends_with(".log") {
            report.error("LOGFILE must have a .log extension.");
        }
    }
}

fn check_export_mode(config: &ParfileConfig, report: &mut ValidationReport) {
    if !config.is_export() {
        return;
    }

    if config.export_target().is_none() {
        match config.export_mode {
            ExportMode::Schemas => {
                report.error("At least one schema must be specified for SCHEMAS export mode.");
            }
            ExportMode::Tables => {
                report.error("At least one table must be specified for TABLES export mode.");
            }
            mode => report.error(format!(
                "At least one tablespace must be specified for {} mode.",
                mode
            )),
        }
    }

    match config.export_mode {
        ExportMode::TransportablePdb => {
            if !config.query.is_empty() {
                report.error("QUERY cannot be used with a TRANSPORTABLE_PDB export.");
            }
            if !config.sample.is_empty() {
                report.error("SAMPLE cannot be used with a TRANSPORTABLE_PDB export.");
            }
            if !config.views_as_tables.is_empty() {
                report.error("VIEWS_AS_TABLES cannot be used with a TRANSPORTABLE_PDB export.");
            }
        }
        ExportMode::Full => {
            if !config.sample.is_empty() {
                report.error("SAMPLE cannot be used with a FULL export.");
            }
            if !config.query.is_empty() {
                report.error("QUERY cannot be used with a FULL export.");
            }
            if !config.include.is_empty() || !config.exclude.is_empty() {
                report.error("INCLUDE/EXCLUDE cannot be used with a FULL export.");
            }
        }
        _ => {}
    }

    if !config.sample.is_empty() && !config.query.is_empty() {
        report.error("SAMPLE and QUERY cannot be used at the same time.");
    }

    if config.content == Some(Content::MetadataOnly) {
        if !config.sample.is_empty() {
            report.error("SAMPLE requires data and is not compatible with CONTENT=METADATA_ONLY.");
        }
        if !config.query.is_empty() {
            report.error("QUERY requires data and is not compatible with CONTENT=METADATA_ONLY.");
        }
        if config.has_flashback() {
            report.error(
                "FLASHBACK requires data and is not compatible with CONTENT=METADATA_ONLY.",
            );
        }
    }
}

fn check_flashback(config: &ParfileConfig, report: &mut ValidationReport) {
    if config.is_export() && config.has_flashback() && config.content != Some(Content::DataOnly) {
        report.warning(
            "FLASHBACK is only applied to table data. It is recommended to use CONTENT=DATA_ONLY.",
        );
    }

    if !config.flashback_scn.is_empty() && !SCN_RE.is_match(&config.flashback_scn) {
        report.error("FLASHBACK_SCN must be a positive number.");
    }

    if !config.flashback_time.is_empty()
        && !config.flashback_time.to_uppercase().contains("TO_TIMESTAMP")
    {
        report.warning(
            "FLASHBACK_TIME format may be invalid. It should typically be a TO_TIMESTAMP(...) \
             string.",
        );
    }
}

fn check_filesize(config: &ParfileConfig, report: &mut ValidationReport) {
    if !config.is_export() || config.filesize.is_empty() {
        return;
    }

    if !FILESIZE_RE.is_match(&config.filesize) {
        report.error(format!(
            "The value '{}' for FILESIZE is invalid. It must be a number followed by an \
             optional unit (K, M, G, T).",
            config.filesize
        ));
    }
    if !config.dumpfile.contains("%U") {
        report.error(
            "DUMPFILE must contain the %U wildcard when FILESIZE is specified so Data Pump can \
             split the dump across multiple files.",
        );
    }
}

fn check_views_as_tables(config: &ParfileConfig, report: &mut ValidationReport) {
    if !config.is_export() {
        return;
    }

    for line in non_blank_lines(&config.views_as_tables) {
        if !line.contains(':') {
            report.error(format!(
                "Invalid format in VIEWS_AS_TABLES: \"{}\". Each line must contain a colon (:).",
                line
            ));
        }
    }
}

fn check_query_and_sample(config: &ParfileConfig, report: &mut ValidationReport) {
    if config.is_export() && !config.query.is_empty() && !QUERY_RE.is_match(&config.query) {
        report.warning(
            "The format for QUERY may be invalid. It should be 'schema.table:\"WHERE clause\"'.",
        );
    }

    if !config.sample.is_empty() && !SAMPLE_RE.is_match(&config.sample) {
        report.warning(
            "The format for SAMPLE may be invalid. It should be 'schema.table:percentage'.",
        );
    }
}

fn check_encryption(config: &ParfileConfig, report: &mut ValidationReport) {
    let needs_password = matches!(config.encryption_mode.as_str(), "PASSWORD" | "DUAL");
    if config.is_encrypted() && needs_password && config.encryption_password.is_empty() {
        report.error(format!(
            "ENCRYPTION_PASSWORD is required for {} mode.",
            config.encryption_mode
        ));
    }
}

fn check_import(config: &ParfileConfig, report: &mut ValidationReport) {
    if !config.is_import() {
        return;
    }

    // Required for every import, network-link imports included.
    if config.table_exists_action.is_empty() {
        report.error("A \"Table Exists Action\" must be selected for IMPORT operations.");
    }

    for line in non_blank_lines(&config.remap_table) {
        match line.split(':').collect::<Vec<_>>().as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => {
                if !source.contains('.') {
                    report.warning(format!(
                        "Best practice for REMAP_TABLE is to specify a schema: \
                         \"schema.table:target\" (found in \"{}\").",
                        line
                    ));
                }
            }
            _ => report.error(format!(
                "Invalid format in REMAP_TABLE: \"{}\". Each line must be in the format \
                 'source:target'.",
                line
            )),
        }
    }

    if !config.remap_container.is_empty() && !config.remap_container.contains(':') {
        report.error(format!(
            "Invalid format for REMAP_CONTAINER: \"{}\". It must contain a colon (:).",
            config.remap_container
        ));
    }

    if config.import_mode == ImportMode::Transportable {
        if config.transport_datafiles.is_empty() {
            report.error("TRANSPORT_DATAFILES is required for Transportable mode.");
        } else if !DATAFILES_RE.is_match(&config.transport_datafiles) {
            report.error(
                "TRANSPORT_DATAFILES format is invalid. It must be a comma-separated list of \
                 single-quoted paths, e.g., '/path/file1.dbf','/path/file2.dbf'.",
            );
        }
    }

    let remaps = [
        ("REMAP_SCHEMA", &config.remap_schema),
        ("REMAP_TABLESPACE", &config.remap_tablespace),
        ("REMAP_DATAFILE", &config.remap_datafile),
    ];
    for (key, value) in remaps {
        if !value.is_empty() && !value.contains(':') {
            report.warning(format!(
                "{} format may be invalid. Use 'source:target'.",
                key
            ));
        }
    }

    if !config.sqlfile.is_empty() && !config.sqlfile.to_lowercase().ends_with(".sql") {
        report.warning("SQLFILE should typically have a .sql extension.");
    }

    if !config.transform.is_empty() && !config.transform.contains(':') {
        report.warning(
            "TRANSFORM format may be invalid. The syntax typically requires a colon, e.g., \
             'SEGMENT_ATTRIBUTES:N'.",
        );
    }

    if !config.remap_data.is_empty()
        && (!config.remap_data.contains(':') || !config.remap_data.contains('.'))
    {
        report.warning("REMAP_DATA format may be invalid. Use 'schema.table.column:function'.");
    }
}

fn add_suggestions(config: &ParfileConfig, report: &mut ValidationReport) {
    if config.dumpfile.is_empty() || config.dumpfile.contains("%U") {
        return;
    }

    if config.is_export() && !config.filesize.is_empty() {
        report.suggest(format!(
            "Use DUMPFILE={} so FILESIZE can split the dump into numbered files.",
            with_wildcard(&config.dumpfile)
        ));
    }

    if let Some(workers) = config.parallel.filter(|&workers| workers > 1) {
        report.suggest(format!(
            "PARALLEL={} works best with a %U wildcard in DUMPFILE (e.g., {}) so each worker \
             writes its own file.",
            workers,
            with_wildcard(&config.dumpfile)
        ));
    }
}

/// Inserts `_%U` before the file extension: `hr.dmp` → `hr_%U.dmp`.
fn with_wildcard(dumpfile: &str) -> String {
    match dumpfile.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{}_%U.{}", stem, extension),
        _ => format!("{}_%U", dumpfile),
    }
}
