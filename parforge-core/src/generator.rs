//! Parameter-file and command-line generation.
//!
//! The parameter body is driven by three ordered rule tables: one shared by
//! both operations, then one for exports or one for imports. Each rule
//! either yields a single optional value for its key, expands a multi-line
//! field into one parameter per non-blank line, or dispatches on the typed
//! mode view. Evaluating the tables once gives an immutable
//! [`ParameterList`]; both output formats are rendered from it.
//!
//! Generation never fails and never checks anything. Run
//! [`validate`](crate::validation::validate) first if the output should be
//! usable.

use std::fmt;

use tracing::debug;

use crate::models::{ExportMode, ImportTarget, ParfileConfig, non_blank_lines};

/// One `KEY=VALUE` line of a parameter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    key: &'static str,
    value: String,
}

impl Parameter {
    /// Creates a parameter line.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Parameter name, e.g. `DUMPFILE`.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Value exactly as written after the `=`.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered, immutable list of the parameters generated for one job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    /// Evaluates the rule tables against a configuration.
    pub fn from_config(config: &ParfileConfig) -> Self {
        let operation_rules: &[Rule] = if config.is_export() {
            EXPORT_RULES
        } else if config.is_import() {
            IMPORT_RULES
        } else {
            &[]
        };

        let mut params = Vec::new();
        for rule in COMMON_RULES.iter().chain(operation_rules) {
            rule.apply(config, &mut params);
        }

        debug!(parameters = params.len(), "parameter list generated");
        Self { params }
    }

    /// Parameters in parfile order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Number of parameter lines.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no rule produced a parameter.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Value of the first parameter with this key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.key == key)
            .map(Parameter::value)
    }

    /// Number of parameters with this key.
    pub fn count(&self, key: &str) -> usize {
        self.params.iter().filter(|param| param.key == key).count()
    }

    /// Renders the parameter file body: one `KEY=VALUE` per line, no
    /// trailing newline.
    pub fn to_parfile(&self) -> String {
        self.params
            .iter()
            .map(Parameter::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Generates the parameter file body for a job.
pub fn generate_parfile_content(config: &ParfileConfig) -> String {
    ParameterList::from_config(config).to_parfile()
}

/// Generates a background shell command equivalent to the parameter file.
///
/// Values that the shell would mangle (`USERID`, `QUERY`, `FLASHBACK_TIME`)
/// are single-quoted. An existing enclosing pair of quotes is replaced, not
/// nested; quotes inside the value are kept as they are.
pub fn generate_command(config: &ParfileConfig) -> String {
    let utility = config.operation.map_or("impdp", |operation| operation.utility());

    let body = generate_parfile_content(config);
    let tokens: Vec<String> = body
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(command_token)
        .collect();

    format!("nohup {} {} &", utility, tokens.join(" "))
}

/// Keys whose command-line value must be shielded from the shell.
const SHELL_QUOTED_KEYS: &[&str] = &["USERID", "QUERY", "FLASHBACK_TIME"];

fn command_token(line: &str) -> String {
    match line.split_once('=') {
        Some((key, value)) if SHELL_QUOTED_KEYS.contains(&key) => {
            format!("{}='{}'", key, strip_enclosing_quotes(value))
        }
        _ => line.to_string(),
    }
}

fn strip_enclosing_quotes(value: &str) -> &str {
    ['\'', '"']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

/// A single entry of a rule table.
enum Rule {
    /// Emits `key` when the formatter yields a value.
    Value {
        key: &'static str,
        value: fn(&ParfileConfig) -> Option<String>,
    },
    /// Emits `key` once per non-blank line of a multi-line field, trimmed.
    Lines {
        key: &'static str,
        source: fn(&ParfileConfig) -> &str,
    },
    /// Emits whatever the mode view calls for.
    Dispatch(fn(&ParfileConfig) -> Vec<Parameter>),
}

impl Rule {
    fn apply(&self, config: &ParfileConfig, params: &mut Vec<Parameter>) {
        match self {
            Rule::Value { key, value } => {
                if let Some(value) = value(config) {
                    params.push(Parameter::new(*key, value));
                }
            }
            Rule::Lines { key, source } => {
                let key = *key;
                params.extend(
                    non_blank_lines(source(config)).map(|line| Parameter::new(key, line.trim())),
                );
            }
            Rule::Dispatch(expand) => params.extend(expand(config)),
        }
    }
}

/// `Some` for non-empty text.
fn text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// `Some(fixed)` when the flag is on.
fn flag(on: bool, fixed: &str) -> Option<String> {
    on.then(|| fixed.to_string())
}

fn quoted_when(value: &str, needs_quotes: impl Fn(char) -> bool) -> Option<String> {
    if value.is_empty() {
        None
    } else if value.contains(needs_quotes) {
        Some(format!("'{}'", value))
    } else {
        Some(value.to_string())
    }
}

fn stores_files(config: &ParfileConfig) -> bool {
    !config.is_network_import()
}

const COMMON_RULES: &[Rule] = &[
    Rule::Value {
        key: "USERID",
        value: |c| quoted_when(&c.userid, |ch| ch.is_whitespace() || ch == '/' || ch == '@'),
    },
    Rule::Value {
        key: "JOB_NAME",
        value: |c| text(&c.job_name),
    },
    Rule::Value {
        key: "METRICS",
        value: |c| flag(c.metrics, "Y"),
    },
    Rule::Value {
        key: "LOGTIME",
        value: |c| flag(c.logtime, "ALL"),
    },
    Rule::Value {
        key: "LOGTIME_TZ",
        value: |c| flag(c.logtime && c.logtime_tz, "Y"),
    },
    Rule::Value {
        key: "ABORT_STEP",
        value: |c| c.abort_step.filter(|&step| step > 0).map(|step| step.to_string()),
    },
    Rule::Value {
        key: "ACCESS_METHOD",
        value: |c| text(&c.access_method).filter(|method| method != "AUTOMATIC"),
    },
    Rule::Value {
        key: "KEEP_MASTER",
        value: |c| flag(c.keep_master, "Y"),
    },
    Rule::Value {
        key: "ENCRYPTION_ALGORITHM",
        value: |c| text(&c.encryption_algorithm).filter(|_| c.is_encrypted()),
    },
    Rule::Value {
        key: "ENCRYPTION_MODE",
        value: |c| text(&c.encryption_mode).filter(|_| c.is_encrypted()),
    },
    Rule::Value {
        key: "ENCRYPTION_PASSWORD",
        value: |c| {
            quoted_when(&c.encryption_password, char::is_whitespace)
                .filter(|_| c.is_encrypted() && c.encryption_mode != "TRANSPARENT")
        },
    },
    Rule::Value {
        key: "CREDENTIAL",
        value: |c| text(&c.credential).filter(|_| stores_files(c)),
    },
    Rule::Value {
        key: "DIRECTORY",
        value: |c| text(&c.directory).filter(|_| stores_files(c) && !c.is_cloud()),
    },
    Rule::Value {
        key: "DUMPFILE",
        value: |c| {
            quoted_when(&c.dumpfile, |ch| ch == '?' || ch == '&').filter(|_| stores_files(c))
        },
    },
    Rule::Value {
        key: "LOGFILE",
        value: |c| text(&c.logfile),
    },
    Rule::Value {
        key: "PARALLEL",
        value: |c| c.parallel.filter(|&workers| workers > 1).map(|workers| workers.to_string()),
    },
    Rule::Value {
        key: "VERSION",
        value: |c| text(&c.version),
    },
    Rule::Value {
        key: "CLUSTER",
        value: |c| flag(c.disable_cluster, "N"),
    },
    Rule::Value {
        key: "INCLUDE",
        value: |c| text(&c.include),
    },
    Rule::Value {
        key: "EXCLUDE",
        value: |c| text(&c.exclude),
    },
];

const EXPORT_RULES: &[Rule] = &[
    Rule::Dispatch(export_target),
    Rule::Value {
        key: "COMPRESSION",
        value: |c| text(&c.compression).filter(|compression| compression != "NONE"),
    },
    Rule::Value {
        key: "COMPRESSION_ALGORITHM",
        value: |c| {
            text(&c.compression_algorithm)
                .filter(|_| matches!(c.compression.as_str(), "ALL" | "DATA_ONLY"))
        },
    },
    Rule::Value {
        key: "CONTENT",
        value: |c| c.content.map(|content| content.to_string()),
    },
    Rule::Value {
        key: "QUERY",
        value: |c| text(&c.query),
    },
    Rule::Value {
        key: "SAMPLE",
        value: |c| text(&c.sample),
    },
    Rule::Value {
        key: "FLASHBACK_TIME",
        value: |c| text(&c.flashback_time).map(|time| format!("\"{}\"", time)),
    },
    Rule::Value {
        key: "FLASHBACK_SCN",
        value: |c| text(&c.flashback_scn).filter(|_| c.flashback_time.is_empty()),
    },
    Rule::Value {
        key: "ESTIMATE_ONLY",
        value: |c| flag(c.estimate_only == "YES", "YES"),
    },
    Rule::Value {
        key: "ESTIMATE",
        value: |c| text(&c.estimate).filter(|_| c.estimate_only == "YES"),
    },
    Rule::Value {
        key: "REUSE_DUMPFILES",
        value: |c| flag(c.reuse_dumpfiles == "Y", "Y"),
    },
    Rule::Value {
        key: "FILESIZE",
        value: |c| text(&c.filesize),
    },
    Rule::Value {
        key: "TRANSPORT_FULL_CHECK",
        value: |c| {
            flag(
                c.transport_full_check
                    && c.export_mode == ExportMode::TransportableTablespaces,
                "Y",
            )
        },
    },
    Rule::Value {
        key: "SOURCE_EDITION",
        value: |c| text(&c.source_edition),
    },
    Rule::Lines {
        key: "VIEWS_AS_TABLES",
        source: views_as_tables,
    },
];

const IMPORT_RULES: &[Rule] = &[
    Rule::Value {
        key: "SCHEMAS",
        value: |c| text(&c.schemas),
    },
    Rule::Value {
        key: "TABLE_EXISTS_ACTION",
        value: |c| text(&c.table_exists_action),
    },
    Rule::Value {
        key: "DATA_OPTIONS",
        value: data_options,
    },
    Rule::Value {
        key: "PARTITION_OPTIONS",
        value: |c| text(&c.partition_options),
    },
    Rule::Value {
        key: "SKIP_UNUSABLE_INDEXES",
        value: |c| flag(c.skip_unusable_indexes, "Y"),
    },
    Rule::Value {
        key: "STREAMS_CONFIGURATION",
        value: |c| flag(c.disable_streams_configuration, "N"),
    },
    Rule::Value {
        key: "MASTER_ONLY",
        value: |c| flag(c.master_only, "Y"),
    },
    Rule::Value {
        key: "SQLFILE",
        value: |c| text(&c.sqlfile),
    },
    Rule::Value {
        key: "TRANSFORM",
        value: |c| text(&c.transform),
    },
    Rule::Value {
        key: "REMAP_DATA",
        value: |c| text(&c.remap_data),
    },
    Rule::Value {
        key: "NETWORK_LINK",
        value: |c| text(&c.network_link),
    },
    Rule::Dispatch(import_remaps),
];

fn export_target(config: &ParfileConfig) -> Vec<Parameter> {
    config
        .export_target()
        .map(|target| Parameter::new(target.key(), target.value()))
        .into_iter()
        .collect()
}

fn views_as_tables(config: &ParfileConfig) -> &str {
    &config.views_as_tables
}

fn data_options(config: &ParfileConfig) -> Option<String> {
    let flags: Vec<&str> = config
        .data_options_skip_constraints
        .then_some("SKIP_CONSTRAINT_ERRORS")
        .into_iter()
        .chain(config.data_options_xml_validation.map(|xml| xml.data_option()))
        .collect();

    (!flags.is_empty()).then(|| flags.join(","))
}

/// Parameters for the pairs whose value is set, in order.
fn present(pairs: &[(&'static str, &str)]) -> Vec<Parameter> {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|&(key, value)| Parameter::new(key, value))
        .collect()
}

fn import_remaps(config: &ParfileConfig) -> Vec<Parameter> {
    match config.import_target() {
        ImportTarget::Transportable {
            transport_datafiles,
            remap_datafile,
        } => present(&[
            ("TRANSPORT_DATAFILES", transport_datafiles),
            ("REMAP_DATAFILE", remap_datafile),
        ]),
        ImportTarget::Standard {
            remap_schema,
            remap_tablespace,
            remap_container,
            remap_table,
        } => {
            let mut params = present(&[
                ("REMAP_SCHEMA", remap_schema),
                ("REMAP_TABLESPACE", remap_tablespace),
                ("REMAP_CONTAINER", remap_container),
            ]);
            params.extend(
                non_blank_lines(remap_table).map(|line| Parameter::new("REMAP_TABLE", line.trim())),
            );
            params
        }
    }
}
