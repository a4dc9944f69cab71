//! Job configuration model for Data Pump export and import jobs.
//!
//! [`ParfileConfig`] is the flat record a front end fills in field by field.
//! Every field is optional: empty strings, `false` and `None` all mean
//! "not set", so a partially filled form still deserializes and validates.
//!
//! The flat record carries fields that only matter for one operation or one
//! mode. [`ExportTarget`] and [`ImportTarget`] are the typed views over it:
//! one variant per mode, each borrowing only the fields that mode uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Direction of a Data Pump job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// `expdp`: database to dump files
    Export,
    /// `impdp`: dump files (or a database link) to database
    Import,
}

impl Operation {
    /// Name of the Data Pump client binary for this operation.
    pub fn utility(&self) -> &'static str {
        match self {
            Operation::Export => "expdp",
            Operation::Import => "impdp",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Export => write!(f, "EXPORT"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// Granularity of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportMode {
    /// `SCHEMAS=` list of schemas
    #[default]
    Schemas,
    /// `TABLES=` list of tables or partitions
    Tables,
    /// `TABLESPACES=` list of tablespaces
    Tablespaces,
    /// `TRANSPORTABLE_TABLESPACES=` metadata for plugging into another database
    TransportableTablespaces,
    /// Full transportable export of a pluggable database (`TRANSPORTABLE=ALWAYS`)
    TransportablePdb,
    /// `FULL=Y` database export
    Full,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Schemas => write!(f, "SCHEMAS"),
            ExportMode::Tables => write!(f, "TABLES"),
            ExportMode::Tablespaces => write!(f, "TABLESPACES"),
            ExportMode::TransportableTablespaces => write!(f, "TRANSPORTABLE_TABLESPACES"),
            ExportMode::TransportablePdb => write!(f, "TRANSPORTABLE_PDB"),
            ExportMode::Full => write!(f, "FULL"),
        }
    }
}

/// Import flavour: conventional row import or plugging in transported datafiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportMode {
    /// Rows and metadata from a dump file or database link
    #[default]
    Standard,
    /// Plug in datafiles listed in `TRANSPORT_DATAFILES`
    Transportable,
}

/// `CONTENT` parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Content {
    /// Rows and metadata
    All,
    /// Rows only
    DataOnly,
    /// Object definitions only
    MetadataOnly,
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::All => write!(f, "ALL"),
            Content::DataOnly => write!(f, "DATA_ONLY"),
            Content::MetadataOnly => write!(f, "METADATA_ONLY"),
        }
    }
}

/// XML validation choice folded into the import `DATA_OPTIONS` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum XmlValidation {
    /// `DATA_OPTIONS=XML_VALIDATE`
    Validate,
    /// `DATA_OPTIONS=DISABLE_XML_VALIDATE`
    Disable,
}

impl XmlValidation {
    /// The `DATA_OPTIONS` flag this choice contributes.
    pub fn data_option(&self) -> &'static str {
        match self {
            XmlValidation::Validate => "XML_VALIDATE",
            XmlValidation::Disable => "DISABLE_XML_VALIDATE",
        }
    }
}

/// One export or import job, as collected from the operator.
///
/// Multi-line fields (`views_as_tables`, `remap_table`) hold one entry per
/// line; blank lines are ignored everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParfileConfig {
    // Identity and connection
    /// Export or import; nothing mode-specific is meaningful until this is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    /// Connect string, e.g. `hr/secret@orcl`
    pub userid: String,
    /// Cloud object-store credential; replaces `directory`
    pub credential: String,
    /// Database directory object for dump and log files
    pub directory: String,
    /// Dump file name, or object-store URL for cloud jobs
    pub dumpfile: String,
    /// Log file name
    pub logfile: String,

    // Execution controls
    /// Worker count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<i64>,
    /// Job name (letters, digits, underscores)
    pub job_name: String,
    /// Emit `METRICS=Y`
    pub metrics: bool,
    /// Emit `LOGTIME=ALL`
    pub logtime: bool,
    /// Emit `LOGTIME_TZ=Y` (only together with `logtime`)
    pub logtime_tz: bool,
    /// Debugging aid: stop the job after this many steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_step: Option<i64>,
    /// `AUTOMATIC`, `DIRECT_PATH`, `EXTERNAL_TABLE`, ...
    pub access_method: String,
    /// Keep the master table after the job completes
    pub keep_master: bool,
    /// Target compatibility version (`COMPATIBLE`, `LATEST`, `19.0`, ...)
    pub version: String,
    /// Object filter, e.g. `TABLE:"IN ('EMP')"`
    pub include: String,
    /// Object filter, e.g. `STATISTICS`
    pub exclude: String,
    /// Emit `CLUSTER=N`
    pub disable_cluster: bool,

    // Export only
    /// Export granularity
    pub export_mode: ExportMode,
    /// Comma-separated schema list
    pub schemas: String,
    /// Comma-separated table list
    pub tables: String,
    /// Comma-separated tablespace list
    pub tablespaces: String,
    /// `ALL`, `DATA_ONLY`, `METADATA_ONLY`, `NONE`, or an `ENCRYPTED` variant
    pub compression: String,
    /// `BASIC`, `LOW`, `MEDIUM`, `HIGH`
    pub compression_algorithm: String,
    /// `PASSWORD`, `TRANSPARENT` or `DUAL`
    pub encryption_mode: String,
    /// `AES128`, `AES192`, `AES256`
    pub encryption_algorithm: String,
    /// Required for `PASSWORD` and `DUAL` encryption
    pub encryption_password: String,
    /// What to unload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Row filter, e.g. `HR.EMPLOYEES:"WHERE SALARY>1000"`
    pub query: String,
    /// Row sampling, e.g. `HR.EMPLOYEES:20`
    pub sample: String,
    /// Split size per dump file, e.g. `500M`
    pub filesize: String,
    /// Consistent point in time, typically a `TO_TIMESTAMP(...)` expression
    pub flashback_time: String,
    /// Consistent SCN; ignored when `flashback_time` is set
    pub flashback_scn: String,
    /// `YES` to only estimate the dump size
    pub estimate_only: String,
    /// `BLOCKS` or `STATISTICS`
    pub estimate: String,
    /// `Y` to overwrite existing dump files
    pub reuse_dumpfiles: String,
    /// Edition to export from
    pub source_edition: String,
    /// One `view:table` entry per line
    pub views_as_tables: String,
    /// Verify the transportable set is self-contained
    pub transport_full_check: bool,

    // Import only
    /// Import flavour
    pub import_mode: ImportMode,
    /// `SKIP`, `APPEND`, `TRUNCATE` or `REPLACE`
    pub table_exists_action: String,
    /// `NONE`, `DEPARTITION` or `MERGE`
    pub partition_options: String,
    /// Emit `SKIP_UNUSABLE_INDEXES=Y`
    pub skip_unusable_indexes: bool,
    /// Emit `STREAMS_CONFIGURATION=N`
    pub disable_streams_configuration: bool,
    /// Add `SKIP_CONSTRAINT_ERRORS` to `DATA_OPTIONS`
    pub data_options_skip_constraints: bool,
    /// XML validation flag for `DATA_OPTIONS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_options_xml_validation: Option<XmlValidation>,
    /// `schema.table.column:package.function`
    pub remap_data: String,
    /// `source_pdb:target_pdb`
    pub remap_container: String,
    /// One `source:target` entry per line
    pub remap_table: String,
    /// `source:target`
    pub remap_schema: String,
    /// `source:target`
    pub remap_tablespace: String,
    /// `source:target`
    pub remap_datafile: String,
    /// Comma-separated single-quoted datafile paths
    pub transport_datafiles: String,
    /// Write DDL to this file instead of importing
    pub sqlfile: String,
    /// e.g. `SEGMENT_ATTRIBUTES:N`
    pub transform: String,
    /// Database link to import over; no dump file is involved
    pub network_link: String,
    /// Emit `MASTER_ONLY=Y`
    pub master_only: bool,
}

/// Typed view of the export mode and the one target field it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget<'a> {
    /// Schema list
    Schemas(&'a str),
    /// Table list
    Tables(&'a str),
    /// Tablespace list
    Tablespaces(&'a str),
    /// Tablespaces to transport
    TransportableTablespaces(&'a str),
    /// Whole pluggable database; no target field
    TransportablePdb,
    /// Whole database; no target field
    Full,
}

impl ExportTarget<'_> {
    /// Parameter key naming the mode.
    pub fn key(&self) -> &'static str {
        match self {
            ExportTarget::Schemas(_) => "SCHEMAS",
            ExportTarget::Tables(_) => "TABLES",
            ExportTarget::Tablespaces(_) => "TABLESPACES",
            ExportTarget::TransportableTablespaces(_) => "TRANSPORTABLE_TABLESPACES",
            ExportTarget::TransportablePdb => "TRANSPORTABLE",
            ExportTarget::Full => "FULL",
        }
    }

    /// Parameter value for the mode line.
    pub fn value(&self) -> &str {
        match self {
            ExportTarget::Schemas(list)
            | ExportTarget::Tables(list)
            | ExportTarget::Tablespaces(list)
            | ExportTarget::TransportableTablespaces(list) => list,
            ExportTarget::TransportablePdb => "ALWAYS",
            ExportTarget::Full => "Y",
        }
    }
}

/// Typed view of the import mode and the remapping fields it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTarget<'a> {
    /// Conventional import with object remapping
    Standard {
        /// `REMAP_SCHEMA` value
        remap_schema: &'a str,
        /// `REMAP_TABLESPACE` value
        remap_tablespace: &'a str,
        /// `REMAP_CONTAINER` value
        remap_container: &'a str,
        /// One `REMAP_TABLE` entry per line
        remap_table: &'a str,
    },
    /// Transportable import with datafile remapping
    Transportable {
        /// `TRANSPORT_DATAFILES` value
        transport_datafiles: &'a str,
        /// `REMAP_DATAFILE` value
        remap_datafile: &'a str,
    },
}

impl ParfileConfig {
    /// Creates an empty configuration for the given operation.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation: Some(operation),
            ..Self::default()
        }
    }

    /// Starter export job: schema mode, on-premises directory, split dump files.
    pub fn export_template() -> Self {
        Self {
            userid: "system".to_string(),
            directory: "DATA_PUMP_DIR".to_string(),
            dumpfile: "export_%U.dmp".to_string(),
            logfile: "export.log".to_string(),
            schemas: "HR".to_string(),
            ..Self::new(Operation::Export)
        }
    }

    /// Starter import job: standard mode, skip tables that already exist.
    pub fn import_template() -> Self {
        Self {
            userid: "system".to_string(),
            directory: "DATA_PUMP_DIR".to_string(),
            dumpfile: "export_%U.dmp".to_string(),
            logfile: "import.log".to_string(),
            schemas: "HR".to_string(),
            table_exists_action: "SKIP".to_string(),
            ..Self::new(Operation::Import)
        }
    }

    /// Returns true for export jobs.
    pub fn is_export(&self) -> bool {
        self.operation == Some(Operation::Export)
    }

    /// Returns true for import jobs.
    pub fn is_import(&self) -> bool {
        self.operation == Some(Operation::Import)
    }

    /// An import that pulls straight from a remote database; it has no dump
    /// file and no storage destination.
    pub fn is_network_import(&self) -> bool {
        self.is_import() && !self.network_link.is_empty()
    }

    /// Dump files live in an object store rather than a directory object.
    pub fn is_cloud(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Returns true when either flashback marker is set.
    pub fn has_flashback(&self) -> bool {
        !self.flashback_time.is_empty() || !self.flashback_scn.is_empty()
    }

    /// Returns true when the compression setting asks for encryption.
    pub fn is_encrypted(&self) -> bool {
        self.compression.contains("ENCRYPTED")
    }

    /// Switches the export mode.
    ///
    /// `transport_full_check` only applies to transportable tablespaces, so
    /// it is cleared when moving to any other mode.
    pub fn set_export_mode(&mut self, mode: ExportMode) {
        self.export_mode = mode;
        if mode != ExportMode::TransportableTablespaces {
            self.transport_full_check = false;
        }
    }

    /// Builder method to set the export mode (see [`Self::set_export_mode`]).
    pub fn with_export_mode(mut self, mode: ExportMode) -> Self {
        self.set_export_mode(mode);
        self
    }

    /// The export target for the current mode.
    ///
    /// Returns `None` when the mode needs a target list that is empty.
    pub fn export_target(&self) -> Option<ExportTarget<'_>> {
        match self.export_mode {
            ExportMode::Schemas if !self.schemas.is_empty() => {
                Some(ExportTarget::Schemas(&self.schemas))
            }
            ExportMode::Tables if !self.tables.is_empty() => Some(ExportTarget::Tables(&self.tables)),
            ExportMode::Tablespaces if !self.tablespaces.is_empty() => {
                Some(ExportTarget::Tablespaces(&self.tablespaces))
            }
            ExportMode::TransportableTablespaces if !self.tablespaces.is_empty() => {
                Some(ExportTarget::TransportableTablespaces(&self.tablespaces))
            }
            ExportMode::TransportablePdb => Some(ExportTarget::TransportablePdb),
            ExportMode::Full => Some(ExportTarget::Full),
            _ => None,
        }
    }

    /// The import target for the current mode.
    pub fn import_target(&self) -> ImportTarget<'_> {
        match self.import_mode {
            ImportMode::Standard => ImportTarget::Standard {
                remap_schema: &self.remap_schema,
                remap_tablespace: &self.remap_tablespace,
                remap_container: &self.remap_container,
                remap_table: &self.remap_table,
            },
            ImportMode::Transportable => ImportTarget::Transportable {
                transport_datafiles: &self.transport_datafiles,
                remap_datafile: &self.remap_datafile,
            },
        }
    }

    /// Wipes the connect string and encryption password from memory.
    ///
    /// Call once the generated text has been handed off.
    pub fn clear_secrets(&mut self) {
        self.userid.zeroize();
        self.encryption_password.zeroize();
    }
}

/// Iterates over the non-blank lines of a multi-line field, untrimmed.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
