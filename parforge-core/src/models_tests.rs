//! Tests for the job configuration model.

use super::*;

#[test]
fn test_default_config_is_unset() {
    let config = ParfileConfig::default();
    assert_eq!(config.operation, None);
    assert_eq!(config.export_mode, ExportMode::Schemas);
    assert_eq!(config.import_mode, ImportMode::Standard);
    assert!(config.userid.is_empty());
    assert!(config.parallel.is_none());
    assert!(!config.is_export());
    assert!(!config.is_import());
}

#[test]
fn test_operation_utility_and_display() {
    assert_eq!(Operation::Export.utility(), "expdp");
    assert_eq!(Operation::Import.utility(), "impdp");
    assert_eq!(Operation::Export.to_string(), "EXPORT");
    assert_eq!(Operation::Import.to_string(), "IMPORT");
}

#[test]
fn test_export_mode_display_matches_wire_names() {
    let modes = [
        (ExportMode::Schemas, "SCHEMAS"),
        (ExportMode::Tables, "TABLES"),
        (ExportMode::Tablespaces, "TABLESPACES"),
        (ExportMode::TransportableTablespaces, "TRANSPORTABLE_TABLESPACES"),
        (ExportMode::TransportablePdb, "TRANSPORTABLE_PDB"),
        (ExportMode::Full, "FULL"),
    ];

    for (mode, name) in modes {
        assert_eq!(mode.to_string(), name);
        let json = serde_json::to_string(&mode).expect("serialize");
        assert_eq!(json, format!("\"{}\"", name));
    }
}

#[test]
fn test_network_import_detection() {
    let mut config = ParfileConfig::new(Operation::Import);
    assert!(!config.is_network_import());

    config.network_link = "SOURCE_DB".to_string();
    assert!(config.is_network_import());

    // A network link on an export is not a network import
    config.operation = Some(Operation::Export);
    assert!(!config.is_network_import());
}

#[test]
fn test_export_target_requires_list_for_list_modes() {
    let mut config = ParfileConfig::new(Operation::Export);
    assert_eq!(config.export_target(), None);

    config.schemas = "HR,SCOTT".to_string();
    assert_eq!(config.export_target(), Some(ExportTarget::Schemas("HR,SCOTT")));

    config.set_export_mode(ExportMode::Tables);
    assert_eq!(config.export_target(), None);

    config.tables = "HR.EMPLOYEES".to_string();
    let target = config.export_target().expect("tables target");
    assert_eq!(target.key(), "TABLES");
    assert_eq!(target.value(), "HR.EMPLOYEES");
}

#[test]
fn test_export_target_for_modes_without_lists() {
    let config = ParfileConfig::new(Operation::Export).with_export_mode(ExportMode::Full);
    let target = config.export_target().expect("full target");
    assert_eq!(target, ExportTarget::Full);
    assert_eq!((target.key(), target.value()), ("FULL", "Y"));

    let config =
        ParfileConfig::new(Operation::Export).with_export_mode(ExportMode::TransportablePdb);
    let target = config.export_target().expect("pdb target");
    assert_eq!((target.key(), target.value()), ("TRANSPORTABLE", "ALWAYS"));
}

#[test]
fn test_tablespace_modes_share_the_tablespaces_field() {
    let mut config = ParfileConfig::new(Operation::Export);
    config.tablespaces = "USERS".to_string();

    config.set_export_mode(ExportMode::Tablespaces);
    assert_eq!(config.export_target(), Some(ExportTarget::Tablespaces("USERS")));

    config.set_export_mode(ExportMode::TransportableTablespaces);
    assert_eq!(
        config.export_target(),
        Some(ExportTarget::TransportableTablespaces("USERS"))
    );
}

#[test]
fn test_mode_change_clears_transport_full_check() {
    let mut config = ParfileConfig::new(Operation::Export)
        .with_export_mode(ExportMode::TransportableTablespaces);
    config.transport_full_check = true;

    config.set_export_mode(ExportMode::TransportableTablespaces);
    assert!(config.transport_full_check);

    config.set_export_mode(ExportMode::Schemas);
    assert!(!config.transport_full_check);
}

#[test]
fn test_import_target_views() {
    let mut config = ParfileConfig::new(Operation::Import);
    config.remap_schema = "HR:HR_COPY".to_string();
    config.transport_datafiles = "'/u01/users01.dbf'".to_string();

    assert!(matches!(
        config.import_target(),
        ImportTarget::Standard {
            remap_schema: "HR:HR_COPY",
            ..
        }
    ));

    config.import_mode = ImportMode::Transportable;
    assert_eq!(
        config.import_target(),
        ImportTarget::Transportable {
            transport_datafiles: "'/u01/users01.dbf'",
            remap_datafile: "",
        }
    );
}

#[test]
fn test_non_blank_lines_skips_whitespace_only_lines() {
    let lines: Vec<&str> = non_blank_lines("HR.V1:T1\n\n   \nHR.V2:T2 \n").collect();
    assert_eq!(lines, vec!["HR.V1:T1", "HR.V2:T2 "]);
}

#[test]
fn test_clear_secrets() {
    let mut config = ParfileConfig::new(Operation::Export);
    config.userid = "hr/secret@orcl".to_string();
    config.encryption_password = "hunter2".to_string();
    config.directory = "DATA_PUMP_DIR".to_string();

    config.clear_secrets();

    assert!(config.userid.is_empty());
    assert!(config.encryption_password.is_empty());
    assert_eq!(config.directory, "DATA_PUMP_DIR");
}

#[test]
fn test_partial_json_deserializes_with_defaults() {
    let config: ParfileConfig = serde_json::from_str(
        r#"{"operation": "EXPORT", "export_mode": "TRANSPORTABLE_PDB", "parallel": 4}"#,
    )
    .expect("deserialize");

    assert!(config.is_export());
    assert_eq!(config.export_mode, ExportMode::TransportablePdb);
    assert_eq!(config.parallel, Some(4));
    assert!(config.dumpfile.is_empty());
    assert_eq!(config.content, None);
}

#[test]
fn test_templates_serde_roundtrip() {
    for template in [
        ParfileConfig::export_template(),
        ParfileConfig::import_template(),
    ] {
        let json = serde_json::to_string(&template).expect("serialize");
        assert!(!json.contains("null"));
        let deserialized: ParfileConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized, template);
    }
}
