//! End-to-end tests for the configuration pipeline: YAML text in,
//! validated polling descriptors out.

use std::fs;
use std::path::PathBuf;

use oidpoll_agent::config::{AgentConfig, AgentKind, ConfigError};

fn parse(yaml: &str) -> AgentConfig {
    AgentConfig::new(AgentKind::Snmpd, serde_yaml::from_str(yaml).unwrap())
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("oidpoll-test-{}-{}", std::process::id(), name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const FULL_DOCUMENT: &str = r#"
polling_interval: 60

auth_groups:
  - snmp_version: 2
    snmp_community: corelab
    ip_targets: ["10.1.0.1", "10.1.0.2"]
  - snmp_version: 4
    ip_targets: ["10.1.0.3"]
  - snmp_version: 3
    snmp_secname: operator
    snmp_authprotocol: sha
    snmp_authpassword: s3cret
    ip_targets: ["10.1.0.4"]

polling_groups:
  - ip_targets: ["10.1.0.1", "10.1.0.4"]
    oids: ["1.3.6.1.2.1.1.3.0"]
  - ip_targets: ["10.1.0.1"]
    oids: ["1.3.6.1.2.1.2.2.1.10", "1.3.6.1.2.1.1.3.0"]
  - ip_targets: ["10.1.0.9"]
    oids: []
"#;

#[test]
fn test_full_document_variables() {
    let config = parse(FULL_DOCUMENT);
    let variables = config.snmpvariables();

    // The version-4 group is dropped; the others contribute one
    // variable per target, in document order.
    assert_eq!(variables.len(), 3);
    assert_eq!(variables[0].ip_target, "10.1.0.1");
    assert_eq!(variables[1].ip_target, "10.1.0.2");
    assert_eq!(variables[2].ip_target, "10.1.0.4");

    assert_eq!(variables[0].auth.community.reveal(), "corelab");
    assert_eq!(variables[0].auth.version, 2);
    assert!(std::sync::Arc::ptr_eq(
        &variables[0].auth,
        &variables[1].auth
    ));

    assert_eq!(variables[2].auth.version, 3);
    assert_eq!(variables[2].auth.secname.as_deref(), Some("operator"));
    assert_eq!(variables[2].auth.community.reveal(), "public");
}

#[test]
fn test_full_document_polling_points() {
    let config = parse(FULL_DOCUMENT);
    let points = config.target_polling_points();

    // 10.1.0.9 carried no OIDs and is excluded; 10.1.0.1 unions the
    // OIDs of both groups that list it.
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].ip_target, "10.1.0.1");
    assert_eq!(
        points[0].oids,
        vec!["1.3.6.1.2.1.1.3.0", "1.3.6.1.2.1.2.2.1.10"]
    );
    assert_eq!(points[1].ip_target, "10.1.0.4");
    assert_eq!(points[1].oids, vec!["1.3.6.1.2.1.1.3.0"]);

    for point in &points {
        assert!(point.valid());
    }
}

#[test]
fn test_full_document_interval() {
    assert_eq!(parse(FULL_DOCUMENT).polling_interval(), 60);
}

#[test]
fn test_document_without_sections() {
    let config = parse("polling_interval: 10");
    assert!(config.snmpvariables().is_empty());
    assert!(config.target_polling_points().is_empty());
}

#[test]
fn test_repeated_reads_are_equal() {
    let config = parse(FULL_DOCUMENT);
    assert_eq!(config.snmpvariables(), config.snmpvariables());
    assert_eq!(
        config.target_polling_points(),
        config.target_polling_points()
    );
}

#[test]
fn test_load_reads_agent_file() {
    let dir = scratch_dir("load");
    fs::write(
        dir.join("snmpd.yaml"),
        "polling_interval: -50\npolling_groups:\n  - ip_targets: [\"10.0.0.1\"]\n    oids: [\"1.3.6.1\"]\n",
    )
    .unwrap();

    let config = AgentConfig::load(&dir, AgentKind::Snmpd).unwrap();
    assert_eq!(config.kind(), AgentKind::Snmpd);
    assert_eq!(config.polling_interval(), 50);
    assert_eq!(config.target_polling_points().len(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = scratch_dir("missing");
    let result = AgentConfig::load(&dir, AgentKind::IfMibd);
    assert!(matches!(result, Err(ConfigError::Io { .. })));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_invalid_yaml_is_parse_error() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("snmpd.yaml"), "auth_groups: [unterminated").unwrap();

    let result = AgentConfig::load(&dir, AgentKind::Snmpd);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));

    fs::remove_dir_all(&dir).unwrap();
}
